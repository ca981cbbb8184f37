// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session transaction state machine
//!
//! The client is either `Idle` (statements run in autocommit) or
//! `InTransaction` (statements run inside an explicit transaction). Legal
//! moves are listed in a single table keyed by `(state, trigger, mode)`;
//! anything not in the table is returned as an [`IllegalTransition`] value.
//!
//! Batch mode carries two extra rows for [`Trigger::StatementError`], which
//! the error policy fires when a failed statement must be reconciled locally:
//! an open transaction is rolled back, an idle client stays idle.

use std::fmt;

use thiserror::Error;

/// Whether a transaction is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientState {
    /// No transaction; statements are autocommitted
    #[default]
    Idle,
    /// A transaction handle is open
    InTransaction,
}

impl ClientState {
    /// Prompt shown by the interactive shell
    pub fn prompt(self) -> &'static str {
        match self {
            ClientState::Idle => ">",
            ClientState::InTransaction => "tx>",
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientState::Idle => write!(f, "idle"),
            ClientState::InTransaction => write!(f, "in a transaction"),
        }
    }
}

/// How input reaches the client, fixed for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// A human at a terminal
    Interactive,
    /// A script piped on standard input
    Batch,
}

impl OperatingMode {
    /// Interactive when standard input is a terminal
    pub fn detect(stdin_is_terminal: bool) -> Self {
        if stdin_is_terminal {
            OperatingMode::Interactive
        } else {
            OperatingMode::Batch
        }
    }
}

/// Events that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Statement,
    Begin,
    Commit,
    Rollback,
    /// A statement failed and the error policy asked for local reconciliation
    StatementError,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Statement => write!(f, "run a statement"),
            Trigger::Begin => write!(f, "begin"),
            Trigger::Commit => write!(f, "commit"),
            Trigger::Rollback => write!(f, "rollback"),
            Trigger::StatementError => write!(f, "recover from a statement error"),
        }
    }
}

/// Work the execution pipeline performs for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RunAutocommit,
    BeginTransaction,
    RunInTransaction,
    Commit,
    Rollback,
    /// Legal transition with nothing to do
    Nothing,
}

/// Outcome of a legal lookup in the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ClientState,
    pub to: ClientState,
    pub action: Action,
}

/// A trigger the table has no row for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal transition: cannot {trigger} while {state}")]
pub struct IllegalTransition {
    pub state: ClientState,
    pub trigger: Trigger,
    pub mode: OperatingMode,
}

/// Operating modes a table row applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modes {
    All,
    BatchOnly,
}

impl Modes {
    fn includes(self, mode: OperatingMode) -> bool {
        match self {
            Modes::All => true,
            Modes::BatchOnly => mode == OperatingMode::Batch,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    from: ClientState,
    trigger: Trigger,
    modes: Modes,
    to: ClientState,
    action: Action,
}

const fn rule(
    from: ClientState,
    trigger: Trigger,
    modes: Modes,
    to: ClientState,
    action: Action,
) -> Rule {
    Rule {
        from,
        trigger,
        modes,
        to,
        action,
    }
}

use ClientState::{Idle, InTransaction};

const TRANSITIONS: &[Rule] = &[
    rule(Idle, Trigger::Statement, Modes::All, Idle, Action::RunAutocommit),
    rule(Idle, Trigger::Begin, Modes::All, InTransaction, Action::BeginTransaction),
    rule(InTransaction, Trigger::Statement, Modes::All, InTransaction, Action::RunInTransaction),
    rule(InTransaction, Trigger::Commit, Modes::All, Idle, Action::Commit),
    rule(InTransaction, Trigger::Rollback, Modes::All, Idle, Action::Rollback),
    rule(InTransaction, Trigger::StatementError, Modes::BatchOnly, Idle, Action::Rollback),
    rule(Idle, Trigger::StatementError, Modes::BatchOnly, Idle, Action::Nothing),
];

/// Look up the transition for `trigger` fired in `state` under `mode`.
pub fn transition(
    state: ClientState,
    trigger: Trigger,
    mode: OperatingMode,
) -> Result<Transition, IllegalTransition> {
    TRANSITIONS
        .iter()
        .find(|r| r.from == state && r.trigger == trigger && r.modes.includes(mode))
        .map(|r| Transition {
            from: state,
            to: r.to,
            action: r.action,
        })
        .ok_or(IllegalTransition {
            state,
            trigger,
            mode,
        })
}
