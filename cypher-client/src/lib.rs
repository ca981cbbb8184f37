// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cypher Client - session and transaction core of an interactive / batch
//! shell for Neo4j
//!
//! # Module Organization
//!
//! - [`directive`] - classifies input lines (blank, `:begin`-style directive, statement)
//! - [`state`] - transaction state machine as an explicit transition table
//! - [`pipeline`] - executes the chosen action and streams records as JSON lines
//! - [`session`] - couples the state machine with the pipeline
//! - [`controller`] - interactive / batch error policy and the line loop
//! - [`connection`] - connection provider traits
//! - [`bolt`] - Bolt provider backed by `neo4rs` (feature `bolt`)
//!
//! ```text
//! line ─► Input::classify ─► Session::dispatch ─► state::transition
//!                                   │
//!                                   ▼
//!                           Pipeline ─► Connection ─► records ─► stdout
//!                                   │
//!                        errors ─► controller::policy ─► report / rollback / exit
//! ```

pub mod config;
pub mod connection;
pub mod controller;
pub mod directive;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod session;
pub mod state;

#[cfg(feature = "bolt")]
pub mod bolt;

pub use config::{ConnectionConfig, DEFAULT_PORT};
pub use connection::{Connection, Connector, RecordStream, Transaction};
pub use controller::{policy, run_once, Controller, Flow, Policy, Termination};
pub use directive::{Directive, Input, DUMP_STATEMENT};
pub use error::{Error, ErrorKind, Result};
pub use record::Record;
pub use session::{Outcome, Session};
pub use state::{ClientState, IllegalTransition, OperatingMode, Trigger};

#[cfg(feature = "bolt")]
pub use bolt::BoltConnector;
