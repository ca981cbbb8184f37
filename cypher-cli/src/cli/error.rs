// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Errors that end the CLI before or outside the line loop

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Connection, authentication or session failure
    #[error(transparent)]
    Client(#[from] cypher_client::Error),

    /// Reading the user name or password failed
    #[error("Failed to read credentials: {0}")]
    Prompt(#[source] std::io::Error),

    /// No user name and no terminal to ask on
    #[error("--user is required when statements are piped on standard input")]
    MissingUser,

    /// Line editor could not be set up
    #[error("Line editor error: {0}")]
    Editor(#[from] ReadlineError),
}
