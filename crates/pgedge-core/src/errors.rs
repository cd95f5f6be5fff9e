//! Error types shared by the pgedgecli crates.
//!
//! Every variant carries enough context to identify the offending field or
//! file so that the operator can fix the condition and re-run the command.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type PgEdgeResult<T> = Result<T, PgEdgeError>;

#[derive(Debug, Error)]
pub enum PgEdgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported json_version: expected {expected}, got {actual}")]
    SchemaVersionMismatch { expected: String, actual: String },

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid database configuration: databases[{index}].{field} must not be empty")]
    InvalidDatabaseCredential { index: usize, field: &'static str },

    #[error("cluster file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode cluster json: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl PgEdgeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn version_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::SchemaVersionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
