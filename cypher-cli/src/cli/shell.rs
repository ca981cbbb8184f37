// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shell handlers: one-shot query, interactive console, piped batch

use std::io::{self, BufRead, Write};

use colored::Colorize;
use cypher_client::{
    run_once, BoltConnector, Connection, ConnectionConfig, Connector, Controller, Flow,
    OperatingMode, Session, Termination,
};
use log::{debug, info, warn};
use rustyline::error::ReadlineError;

use super::commands::Cli;
use super::error::CliError;
use super::history::{history_path, HistoryGuard};

/// Connect, then run the mode selected by the arguments and the terminal.
pub fn run(cli: Cli, mode: OperatingMode) -> Result<Termination, CliError> {
    let config = connection_config(&cli, mode)?;
    let connection = BoltConnector.connect(&config)?;

    if let Some(query) = cli.query.as_deref() {
        return Ok(handle_query(connection, query));
    }

    let session = Session::new(connection, mode);
    info!("starting {:?} session against {}", mode, config.uri());
    match mode {
        OperatingMode::Interactive => handle_interactive(session),
        OperatingMode::Batch => Ok(handle_batch(session, io::stdin().lock())),
    }
}

/// Handle the one-shot `--query` mode
fn handle_query<C: Connection>(mut connection: C, query: &str) -> Termination {
    let termination = run_once(
        &mut connection,
        query,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    if let Err(e) = connection.close() {
        warn!("failed to close session: {}", e);
    }
    termination
}

/// Handle the interactive console
fn handle_interactive<C: Connection>(session: Session<C>) -> Result<Termination, CliError> {
    let mut editor = HistoryGuard::open(history_path())?;

    eprintln!("{}", "Connected.".bold().green());
    eprintln!(
        "{}",
        "Directives: :begin :commit :rollback :dump :exit".cyan()
    );

    let mut controller = Controller::new(session, io::stdout(), io::stderr());

    let termination = loop {
        let line = match editor.readline(controller.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break Termination::Success,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break Termination::Failure;
            }
        };

        if !line.trim().is_empty() {
            if let Err(e) = editor.add_history_entry(line.as_str()) {
                debug!("history entry dropped: {}", e);
            }
        }

        if let Flow::Exit(termination) = controller.process_line(&line) {
            break termination;
        }
    };

    close(controller);
    Ok(termination)
}

/// Handle statements piped on standard input
fn handle_batch<C: Connection, R: BufRead>(session: Session<C>, input: R) -> Termination {
    let mut controller = Controller::new(session, io::stdout().lock(), io::stderr().lock());
    let termination = controller.run_batch(input);
    debug!(
        "batch finished after {} lines: {:?}",
        controller.line_no(),
        termination
    );
    close(controller);
    termination
}

fn close<C: Connection, O: Write, D: Write>(controller: Controller<C, O, D>) {
    if let Err(e) = controller.close() {
        warn!("failed to close session: {}", e);
    }
}

/// Build the connection settings, prompting for what is missing.
fn connection_config(cli: &Cli, mode: OperatingMode) -> Result<ConnectionConfig, CliError> {
    let user = match (&cli.user, mode) {
        (Some(user), _) => user.clone(),
        (None, OperatingMode::Interactive) => prompt_line("user:")?,
        (None, OperatingMode::Batch) => return Err(CliError::MissingUser),
    };

    let password = match &cli.password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password("password:").map_err(CliError::Prompt)?,
    };

    Ok(ConnectionConfig::new(&cli.host, user, password).with_port(cli.port))
}

fn prompt_line(prompt: &str) -> Result<String, CliError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(CliError::Prompt)?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(CliError::Prompt)?;
    Ok(input.trim().to_string())
}
