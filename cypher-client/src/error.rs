// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the Cypher client

use thiserror::Error;

use crate::state::IllegalTransition;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Status codes the server uses for statement syntax errors.
const SYNTAX_CODES: &[&str] = &[
    "Neo.ClientError.Statement.SyntaxError",
    "Neo.ClientError.Statement.InvalidSyntax",
];

/// Status codes the server uses for constraint violations.
const CONSTRAINT_CODES: &[&str] = &[
    "Neo.ClientError.Schema.ConstraintValidationFailed",
    "Neo.ClientError.Schema.ConstraintViolation",
    "Neo.ClientError.Statement.ConstraintVerificationFailed",
    "Neo.ClientError.Statement.ConstraintViolation",
];

const UNAUTHORIZED_CODE: &str = "Neo.ClientError.Security.Unauthorized";

/// Coarse classification of an [`Error`], used to look up the error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials rejected
    Authentication,
    /// Server cannot be reached, or the connection dropped
    ServiceUnavailable,
    /// Server rejected the statement grammar
    StatementSyntax,
    /// A data constraint was violated
    ConstraintViolation,
    /// Any other server-side execution error
    GeneralDatabase,
    /// Trigger not allowed from the current state
    IllegalTransition,
    /// Local failure: writing output, decoding a record
    Client,
}

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials rejected by the server
    #[error("{0}")]
    Authentication(String),

    /// Server unreachable
    #[error("ServiceUnavailable: {0}")]
    ServiceUnavailable(String),

    /// Statement grammar rejected
    #[error("{message}")]
    StatementSyntax { code: String, message: String },

    /// Constraint violated while executing a statement
    #[error("{message}")]
    ConstraintViolation { code: String, message: String },

    /// Any other server-side failure
    #[error("{message}")]
    Database { code: String, message: String },

    /// Trigger rejected by the transition table
    #[error("{0}")]
    IllegalTransition(#[from] IllegalTransition),

    /// Pipeline invoked in a state it cannot serve
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A record could not be converted into JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an error from a server status code and message.
    ///
    /// Unknown codes, including an empty one, are general database errors.
    pub fn from_server(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let message = message.into();

        if code == UNAUTHORIZED_CODE {
            Error::Authentication(message)
        } else if SYNTAX_CODES.contains(&code.as_str()) {
            Error::StatementSyntax { code, message }
        } else if CONSTRAINT_CODES.contains(&code.as_str()) {
            Error::ConstraintViolation { code, message }
        } else {
            Error::Database { code, message }
        }
    }

    /// Classification used by the error policy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Error::StatementSyntax { .. } => ErrorKind::StatementSyntax,
            Error::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Error::Database { .. } => ErrorKind::GeneralDatabase,
            Error::IllegalTransition(_) | Error::InvalidOperation(_) => {
                ErrorKind::IllegalTransition
            }
            Error::Decode(_) | Error::Serialization(_) | Error::Io(_) => ErrorKind::Client,
        }
    }

    /// Server status code, when the error came from the server
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::StatementSyntax { code, .. }
            | Error::ConstraintViolation { code, .. }
            | Error::Database { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ClientState, OperatingMode, Trigger};

    #[test]
    fn test_syntax_code_classification() {
        let error = Error::from_server(
            "Neo.ClientError.Statement.SyntaxError",
            "Invalid input 'MATC'",
        );
        assert_eq!(error.kind(), ErrorKind::StatementSyntax);
        assert_eq!(error.to_string(), "Invalid input 'MATC'");
        assert_eq!(error.code(), Some("Neo.ClientError.Statement.SyntaxError"));
    }

    #[test]
    fn test_constraint_codes_classification() {
        for code in CONSTRAINT_CODES {
            let error = Error::from_server(*code, "already exists");
            assert_eq!(error.kind(), ErrorKind::ConstraintViolation, "{}", code);
        }
    }

    #[test]
    fn test_unauthorized_is_authentication() {
        let error = Error::from_server(UNAUTHORIZED_CODE, "bad credentials");
        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.code(), None);
    }

    #[test]
    fn test_unknown_code_is_general_database_error() {
        let error = Error::from_server("Neo.TransientError.General.OutOfMemoryError", "oom");
        assert_eq!(error.kind(), ErrorKind::GeneralDatabase);

        let error = Error::from_server("", "something failed");
        assert_eq!(error.kind(), ErrorKind::GeneralDatabase);
    }

    #[test]
    fn test_illegal_transition_kind() {
        let error: Error = IllegalTransition {
            state: ClientState::Idle,
            trigger: Trigger::Commit,
            mode: OperatingMode::Batch,
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::IllegalTransition);
        assert_eq!(error.to_string(), "illegal transition: cannot commit while idle");
    }

    #[test]
    fn test_io_error_is_client_kind() {
        let error: Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(error.kind(), ErrorKind::Client);
    }
}
