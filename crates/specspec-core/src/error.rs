//! Error types for the SpecSpec core library
//!
//! Validation failures are never errors: they are issues recorded on the
//! context. The types here cover the conditions that make a run meaningless,
//! a misconfigured engine or a broken rule tree, and are normalized into a
//! single synthetic issue at the run boundary.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// A descriptor kind was dispatched but no validator is registered for it
    #[error("No validator registered for descriptor kind '{kind}'")]
    UnregisteredKind { kind: String },

    /// A validator was handed a descriptor of a different kind
    #[error("Validator for '{expected}' received a '{found}' descriptor")]
    DescriptorMismatch { expected: String, found: String },

    /// A base operation that a rule kind must provide was invoked directly
    #[error("{kind} must implement {operation}")]
    NotImplemented {
        kind: String,
        operation: &'static str,
    },

    /// A lazily produced rule group could not be built
    #[error("Spec group for '{kind}' failed: {message}")]
    SpecGroup { kind: String, message: String },

    /// A rule was constructed with arguments it cannot use
    #[error("Invalid argument for {kind}: {message}")]
    InvalidArgument { kind: String, message: String },

    /// A host-registered validator failed with its own error
    #[error("Validator '{kind}' failed: {source}")]
    Validator {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unregistered-kind error
    pub fn unregistered(kind: impl Into<String>) -> Self {
        Self::UnregisteredKind { kind: kind.into() }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error raised by a host validator
    pub fn validator(kind: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Validator {
            kind: kind.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_kind() {
        let err = Error::unregistered("Archive");
        assert_eq!(
            err.to_string(),
            "No validator registered for descriptor kind 'Archive'"
        );
    }

    #[test]
    fn test_validator_error_keeps_source() {
        let err = Error::validator("Url", anyhow::anyhow!("backend offline"));
        assert!(err.to_string().contains("backend offline"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
