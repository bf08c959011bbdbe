//! Errors raised while loading spec source
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::issue::{codes, Issue};
use std::fmt;
use thiserror::Error;

/// A location in spec source (1-based line and column, byte offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Why spec source could not produce a root rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// Lexer or parser rejected the source
    #[error("Syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    /// The program parsed but failed while evaluating
    #[error("Spec evaluation failed at {position}: {message}")]
    Eval { message: String, position: Position },

    /// The interpreter itself panicked
    #[error("Spec evaluation crashed: {message}")]
    Crash { message: String },

    /// No statements at all
    #[error("Spec is empty")]
    Empty,

    /// Statements ran but none produced a root rule
    #[error("Spec did not produce a root rule")]
    NoRoot,
}

pub type Result<T> = std::result::Result<T, SpecError>;

impl SpecError {
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn eval(message: impl Into<String>, position: Position) -> Self {
        Self::Eval {
            message: message.into(),
            position,
        }
    }

    /// Stable issue code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            SpecError::Syntax { .. } => codes::SPEC_SYNTAX_ERROR,
            SpecError::Eval { .. } | SpecError::Crash { .. } => codes::SPEC_CRASH,
            SpecError::Empty => codes::SPEC_EMPTY,
            SpecError::NoRoot => codes::SPEC_NO_ROOT,
        }
    }

    /// The single issue a run reports for this failure
    pub fn to_issue(&self) -> Issue {
        Issue::error(self.code(), self.to_string(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let pos = Position::start();
        assert_eq!(SpecError::syntax("x", pos).code(), "spec.syntax_error");
        assert_eq!(SpecError::eval("x", pos).code(), "spec.crash");
        assert_eq!(SpecError::Empty.code(), "spec.empty");
        assert_eq!(SpecError::NoRoot.code(), "spec.no_root");
    }

    #[test]
    fn test_syntax_message_has_location() {
        let err = SpecError::syntax(
            "Unexpected ')'",
            Position {
                offset: 9,
                line: 2,
                column: 4,
            },
        );
        assert_eq!(err.to_string(), "Syntax error at line 2, column 4: Unexpected ')'");
    }
}
