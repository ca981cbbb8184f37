// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI argument definitions

use clap::{Parser, ValueEnum};
use cypher_client::DEFAULT_PORT;

/// Values accepted by `--log-level`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    /// Statements and policy decisions
    Debug,
    /// Also driver internals
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        use log::LevelFilter;

        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

/// neo4j-client - Cypher shell for Neo4j
///
/// Reads statements from the terminal, or from standard input when it is a
/// pipe. Directives: :begin, :commit, :rollback, :dump, :exit.
#[derive(Parser, Debug)]
#[command(name = "neo4j-client")]
#[command(about = "Interactive and batch Cypher client for Neo4j")]
#[command(version)]
pub struct Cli {
    /// Server host name or address
    pub host: String,

    /// Username for authentication (prompted on a terminal if omitted)
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// Password for authentication (prompted without echo if omitted)
    #[arg(short = 'p', long = "password")]
    pub password: Option<String>,

    /// Bolt port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Run a single statement in autocommit mode and exit
    #[arg(long)]
    pub query: Option<String>,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.to_level_filter()),
            (None, true) => Some(log::LevelFilter::Debug),
            (None, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["neo4j-client", "localhost"]).unwrap();
        assert_eq!(cli.host, "localhost");
        assert_eq!(cli.port, 7687);
        assert!(cli.user.is_none());
        assert!(cli.password.is_none());
        assert!(cli.query.is_none());
        assert_eq!(cli.level_filter(), None);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "neo4j-client",
            "-u",
            "neo4j",
            "-p",
            "secret",
            "--port",
            "7688",
            "--query",
            "MATCH (n) RETURN count(n)",
            "db.example.com",
        ])
        .unwrap();
        assert_eq!(cli.host, "db.example.com");
        assert_eq!(cli.user.as_deref(), Some("neo4j"));
        assert_eq!(cli.password.as_deref(), Some("secret"));
        assert_eq!(cli.port, 7688);
        assert_eq!(cli.query.as_deref(), Some("MATCH (n) RETURN count(n)"));
    }

    #[test]
    fn test_host_is_required() {
        assert!(Cli::try_parse_from(["neo4j-client"]).is_err());
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::try_parse_from(["neo4j-client", "-v", "localhost"]).unwrap();
        assert_eq!(cli.level_filter(), Some(log::LevelFilter::Debug));

        let cli =
            Cli::try_parse_from(["neo4j-client", "-v", "-l", "trace", "localhost"]).unwrap();
        assert_eq!(cli.level_filter(), Some(log::LevelFilter::Trace));
    }
}
