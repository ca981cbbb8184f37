// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Input-mode controller
//!
//! Feeds lines to the session and applies the error policy. The policy is a
//! table from `(ErrorKind, OperatingMode)` to what to do with a caught error:
//! report it, reconcile the transaction by rolling back, stop the run.

use std::io::{BufRead, Write};

use log::{debug, warn};

use crate::connection::Connection;
use crate::directive::Input;
use crate::error::{Error, ErrorKind};
use crate::pipeline::emit;
use crate::session::{Outcome, Session};
use crate::state::{OperatingMode, Trigger};

/// What to do with one caught error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Print a `[N] message` diagnostic
    pub report: bool,
    /// Fire the batch-only statement-error trigger
    pub rollback: bool,
    /// Stop processing and exit 1
    pub fatal: bool,
}

impl Policy {
    const fn new(report: bool, rollback: bool, fatal: bool) -> Self {
        Self {
            report,
            rollback,
            fatal,
        }
    }
}

/// Error policy lookup
pub fn policy(kind: ErrorKind, mode: OperatingMode) -> Policy {
    use ErrorKind::*;
    use OperatingMode::*;

    match (kind, mode) {
        (Authentication | ServiceUnavailable | Client, _) => Policy::new(true, false, true),

        (StatementSyntax, Interactive) => Policy::new(true, false, false),
        (ConstraintViolation, Interactive) => Policy::new(true, false, false),
        (GeneralDatabase, Interactive) => Policy::new(true, false, false),
        (IllegalTransition, Interactive) => Policy::new(false, false, false),

        (StatementSyntax, Batch) => Policy::new(true, true, false),
        (ConstraintViolation, Batch) => Policy::new(true, true, true),
        (GeneralDatabase, Batch) => Policy::new(true, true, false),
        (IllegalTransition, Batch) => Policy::new(true, false, true),
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Success,
    Failure,
}

impl Termination {
    pub fn code(self) -> u8 {
        match self {
            Termination::Success => 0,
            Termination::Failure => 1,
        }
    }
}

impl From<Termination> for std::process::ExitCode {
    fn from(termination: Termination) -> Self {
        std::process::ExitCode::from(termination.code())
    }
}

/// Whether the line loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(Termination),
}

/// Drives a [`Session`] line by line. `O` receives records, `D` receives
/// diagnostics.
pub struct Controller<C: Connection, O: Write, D: Write> {
    session: Session<C>,
    out: O,
    diagnostics: D,
    line_no: usize,
}

impl<C: Connection, O: Write, D: Write> Controller<C, O, D> {
    pub fn new(session: Session<C>, out: O, diagnostics: D) -> Self {
        Self {
            session,
            out,
            diagnostics,
            line_no: 0,
        }
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn prompt(&self) -> &'static str {
        self.session.prompt()
    }

    /// Number of lines processed so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn output(&self) -> &O {
        &self.out
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Classify and dispatch one input line.
    pub fn process_line(&mut self, line: &str) -> Flow {
        self.line_no += 1;
        match self.session.dispatch(Input::classify(line), &mut self.out) {
            Ok(Outcome::Continue) => Flow::Continue,
            Ok(Outcome::Exit) => Flow::Exit(Termination::Success),
            Err(error) => self.handle_error(error),
        }
    }

    /// Process every line of `input` until it is exhausted or a fatal
    /// condition stops the run.
    pub fn run_batch<R: BufRead>(&mut self, input: R) -> Termination {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.report(&Error::from(e));
                    return Termination::Failure;
                }
            };
            if let Flow::Exit(termination) = self.process_line(&line) {
                return termination;
            }
        }
        Termination::Success
    }

    /// Close the underlying session.
    pub fn close(self) -> crate::Result<()> {
        self.session.close()
    }

    fn handle_error(&mut self, error: Error) -> Flow {
        let policy = policy(error.kind(), self.session.mode());
        debug!("line {}: {:?} -> {:?}", self.line_no, error.kind(), policy);

        if policy.rollback {
            if let Err(e) = self.session.fire(Trigger::StatementError, &mut self.out) {
                warn!("implicit rollback failed: {}", e);
            }
        }
        if policy.report {
            self.report(&error);
        }
        if policy.fatal {
            Flow::Exit(Termination::Failure)
        } else {
            Flow::Continue
        }
    }

    fn report(&mut self, error: &Error) {
        report(&mut self.diagnostics, self.line_no, error);
    }
}

/// Write a `[N] message` diagnostic. Line 0 stands for a statement that did
/// not come from an input line.
fn report(diagnostics: &mut dyn Write, line_no: usize, error: &Error) {
    if let Err(e) = writeln!(diagnostics, "[{}] {}", line_no, error) {
        warn!("could not write diagnostic: {}", e);
    }
}

/// Run a single autocommit statement outside the state machine. A failure is
/// reported against line 0.
pub fn run_once<C: Connection>(
    connection: &mut C,
    statement: &str,
    out: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> Termination {
    let result = connection
        .run_autocommit(statement)
        .and_then(|stream| emit(stream, out));

    match result {
        Ok(_) => Termination::Success,
        Err(e) => {
            report(diagnostics, 0, &e);
            Termination::Failure
        }
    }
}
