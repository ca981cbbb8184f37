// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution pipeline
//!
//! Carries out the actions chosen by the state machine against the
//! connection and streams each result record to the output as a JSON line.
//! The pipeline owns the connection and the optional transaction handle;
//! it does not trust the state machine and checks the handle itself.

use std::io::Write;

use log::{debug, warn};

use crate::connection::{Connection, RecordStream, Transaction};
use crate::error::{Error, Result};

pub struct Pipeline<C: Connection> {
    connection: C,
    transaction: Option<C::Transaction>,
    pending: Option<String>,
}

impl<C: Connection> Pipeline<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            transaction: None,
            pending: None,
        }
    }

    pub fn has_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Statement waiting for the next run action
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn set_pending(&mut self, statement: impl Into<String>) {
        self.pending = Some(statement.into());
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Run the pending statement in autocommit mode. Returns the number of
    /// records written.
    pub fn run_autocommit(&mut self, out: &mut dyn Write) -> Result<usize> {
        let statement = self.take_pending()?;
        debug!("autocommit: {}", statement);
        let stream = self.connection.run_autocommit(&statement)?;
        emit(stream, out)
    }

    /// Run the pending statement inside the open transaction.
    pub fn run_in_transaction(&mut self, out: &mut dyn Write) -> Result<usize> {
        let statement = self.take_pending()?;
        let transaction = self
            .transaction
            .as_mut()
            .ok_or_else(|| Error::InvalidOperation("no open transaction".to_string()))?;
        debug!("in transaction: {}", statement);
        let stream = transaction.run(&statement)?;
        emit(stream, out)
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.transaction.is_some() {
            return Err(Error::InvalidOperation(
                "a transaction is already open".to_string(),
            ));
        }
        self.transaction = Some(self.connection.begin_transaction()?);
        Ok(())
    }

    /// Commit and release the handle. The handle is released even when the
    /// server rejects the commit.
    pub fn commit(&mut self) -> Result<()> {
        self.take_transaction()?.commit()
    }

    /// Roll back and release the handle, whatever the server answers.
    pub fn rollback(&mut self) -> Result<()> {
        self.take_transaction()?.rollback()
    }

    /// Roll back anything still open and close the session.
    pub fn close(mut self) -> Result<()> {
        if let Some(transaction) = self.transaction.take() {
            warn!("closing session with an open transaction, rolling back");
            if let Err(e) = transaction.rollback() {
                warn!("rollback on close failed: {}", e);
            }
        }
        self.connection.close()
    }

    fn take_pending(&mut self) -> Result<String> {
        self.pending
            .take()
            .ok_or_else(|| Error::InvalidOperation("no pending statement".to_string()))
    }

    fn take_transaction(&mut self) -> Result<C::Transaction> {
        self.transaction
            .take()
            .ok_or_else(|| Error::InvalidOperation("no open transaction".to_string()))
    }
}

/// Write every record of `stream` as one JSON line.
pub(crate) fn emit(stream: RecordStream<'_>, out: &mut dyn Write) -> Result<usize> {
    let mut count = 0;
    for record in stream {
        let line = record?.to_json_line()?;
        writeln!(out, "{}", line)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
