// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for the Cypher client
//!
//! Provides argument parsing, credential prompting, the interactive console
//! with persisted history, piped batch execution and one-shot queries.

pub mod commands;
pub mod completion;
pub mod error;
pub mod history;
pub mod shell;

pub use commands::Cli;
pub use shell::run;
