//! Command handlers for CLI subcommands
//!
//! Each handler returns an [`Outcome`] when it ran to completion; errors are
//! reserved for failures that kept it from producing a result.

pub mod check;
pub mod completions;
pub mod config;
pub mod kinds;
pub mod lint;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use kinds::handle_kinds;
pub use lint::handle_lint;

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// How a command that ran to completion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ValidationFailed,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::ValidationFailed => crate::error::VALIDATION_FAILED,
        }
    }
}

/// Read a spec file's source text
pub(crate) fn read_spec(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}
