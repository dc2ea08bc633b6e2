//! Error types for the gitolite crate.

use thiserror::Error;

/// Errors that can occur while building or parsing a gitolite configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfError {
    /// The requested group or repository was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A line of the configuration document could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input text.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Unknown permission spec.
    #[error("invalid permission: '{0}'")]
    InvalidPermission(String),
}

impl ConfError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for gitolite configuration operations.
pub type Result<T> = std::result::Result<T, ConfError>;
