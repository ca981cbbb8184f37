// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! neo4j-client binary entry point

mod cli;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use cypher_client::OperatingMode;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.level_filter());

    let mode = OperatingMode::detect(io::stdin().is_terminal());

    // no process::exit below this point: the history guard saves on drop
    match cli::run(cli, mode) {
        Ok(termination) => termination.into(),
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; an explicit level wins over `RUST_LOG`, default is warn.
fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}
