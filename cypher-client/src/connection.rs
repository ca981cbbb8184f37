// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection provider seam
//!
//! The pipeline only talks to the server through these traits. The Bolt
//! implementation lives in [`crate::bolt`]; tests use a scripted in-memory
//! connection.

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::record::Record;

/// Records returned by one statement, in server order.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// Opens sessions against a server
pub trait Connector {
    type Connection: Connection;

    /// Authenticate and open a session. Fails with
    /// [`crate::Error::Authentication`] or [`crate::Error::ServiceUnavailable`].
    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Connection>;
}

/// A live session
pub trait Connection {
    type Transaction: Transaction;

    /// Run a statement outside of any explicit transaction.
    fn run_autocommit(&mut self, statement: &str) -> Result<RecordStream<'_>>;

    fn begin_transaction(&mut self) -> Result<Self::Transaction>;

    fn close(self) -> Result<()>;
}

/// An open explicit transaction
pub trait Transaction {
    fn run(&mut self, statement: &str) -> Result<RecordStream<'_>>;

    /// Make all writes since begin durable.
    fn commit(self) -> Result<()>;

    /// Discard all writes since begin.
    fn rollback(self) -> Result<()>;
}
