// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for filter expression parsing.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The class of grammar violation that aborted a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A byte matches no valid transition from the current state.
    UnexpectedByte,
    /// Input ended while a token or clause was incomplete.
    TruncatedInput,
    /// A `(` without a matching `)`, or a `)` with no open group.
    UnmatchedGrouping,
    /// A value run contains a byte inconsistent with its literal kind.
    InvalidLiteral,
    /// A [`ParserConfig`](crate::ParserConfig) limit was hit.
    LimitExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::UnexpectedByte => "unexpected byte",
            ErrorKind::TruncatedInput => "truncated input",
            ErrorKind::UnmatchedGrouping => "unmatched parenthesis",
            ErrorKind::InvalidLiteral => "invalid literal",
            ErrorKind::LimitExceeded => "limit exceeded",
        };
        write!(f, "{}", s)
    }
}

/// The parser state a [`MalformedQuery`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Start of a clause: a key or `(` is expected.
    Start,
    /// Inside a key.
    Key,
    /// After a subject: an operator is expected.
    KeyParsed,
    /// Inside a `.name(args)` function call.
    Function,
    /// Inside a parenthesized group.
    Grouped,
    /// After an operator: a value is expected.
    Operation,
    /// Between clauses: a connector or the end of input is expected.
    Connector,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StateKind::Start => "clause",
            StateKind::Key => "key",
            StateKind::KeyParsed => "operator",
            StateKind::Function => "function call",
            StateKind::Grouped => "group",
            StateKind::Operation => "value",
            StateKind::Connector => "connector",
        };
        write!(f, "{}", s)
    }
}

/// A grammar violation. Parsing is all-or-nothing, so this is the only
/// outcome besides a complete [`Query`](crate::Query).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at offset {offset} while parsing {state}\n  hint: {expected}")]
pub struct MalformedQuery {
    /// Class of the violation.
    pub kind: ErrorKind,
    /// Byte offset into the original input.
    pub offset: usize,
    /// State the parser was in.
    pub state: StateKind,
    /// What would have been valid at `offset`.
    pub expected: &'static str,
}

impl MalformedQuery {
    pub(crate) fn new(
        kind: ErrorKind,
        offset: usize,
        state: StateKind,
        expected: &'static str,
    ) -> Self {
        MalformedQuery {
            kind,
            offset,
            state,
            expected,
        }
    }

    /// Human-readable description of the state the error occurred in.
    pub fn state_description(&self) -> String {
        self.state.to_string()
    }
}

/// Errors from the library surface outside of parsing itself.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Malformed(#[from] MalformedQuery),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config: {0}\n  hint: limits must be greater than zero")]
    InvalidConfig(String),
}

/// A specialized Result type for filterq operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
