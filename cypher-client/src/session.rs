// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session driver: couples the transition table with the pipeline
//!
//! The client state is derived from whether the pipeline holds a transaction
//! handle, so "handle exists iff `InTransaction`" holds by construction.

use std::io::Write;

use log::debug;

use crate::connection::Connection;
use crate::directive::{Directive, Input, DUMP_STATEMENT};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::state::{self, Action, ClientState, OperatingMode, Trigger};

/// What the caller should do after a dispatched line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

pub struct Session<C: Connection> {
    pipeline: Pipeline<C>,
    mode: OperatingMode,
}

impl<C: Connection> Session<C> {
    pub fn new(connection: C, mode: OperatingMode) -> Self {
        Self {
            pipeline: Pipeline::new(connection),
            mode,
        }
    }

    pub fn state(&self) -> ClientState {
        if self.pipeline.has_transaction() {
            ClientState::InTransaction
        } else {
            ClientState::Idle
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn prompt(&self) -> &'static str {
        self.state().prompt()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pipeline.pending()
    }

    /// Dispatch one classified input line.
    pub fn dispatch(&mut self, input: Input, out: &mut dyn Write) -> Result<Outcome> {
        let trigger = match input {
            Input::Blank => return Ok(Outcome::Continue),
            Input::Directive(Directive::Exit) => return Ok(Outcome::Exit),
            Input::Directive(Directive::Begin) => Trigger::Begin,
            Input::Directive(Directive::Commit) => Trigger::Commit,
            Input::Directive(Directive::Rollback) => Trigger::Rollback,
            Input::Directive(Directive::Dump) => {
                self.pipeline.set_pending(DUMP_STATEMENT);
                Trigger::Statement
            }
            Input::Statement(text) => {
                self.pipeline.set_pending(text);
                Trigger::Statement
            }
        };

        let result = self.fire(trigger, out);
        // a statement is never re-sent, whatever happened to it
        self.pipeline.clear_pending();
        result.map(|_| Outcome::Continue)
    }

    /// Fire a trigger: look up the transition, then run its action.
    /// Returns the state after the action.
    pub fn fire(&mut self, trigger: Trigger, out: &mut dyn Write) -> Result<ClientState> {
        let transition = state::transition(self.state(), trigger, self.mode)?;
        debug!(
            "{:?} --{:?}--> {:?} ({:?})",
            transition.from, trigger, transition.to, transition.action
        );

        let result = match transition.action {
            Action::RunAutocommit => self.pipeline.run_autocommit(out).map(|_| ()),
            Action::RunInTransaction => self.pipeline.run_in_transaction(out).map(|_| ()),
            Action::BeginTransaction => self.pipeline.begin(),
            Action::Commit => self.pipeline.commit(),
            Action::Rollback => self.pipeline.rollback(),
            Action::Nothing => Ok(()),
        };

        debug_assert!(result.is_err() || self.state() == transition.to);
        result.map(|_| self.state())
    }

    /// Close the session, rolling back an open transaction first.
    pub fn close(self) -> Result<()> {
        self.pipeline.close()
    }
}
