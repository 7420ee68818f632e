//! Error types for rule file loading.

use std::path::PathBuf;

use thiserror::Error;

/// Why an inference rule file could not be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleFileError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read rule file: {source}")]
    Read {
        #[from]
        source: csv::Error,
    },

    #[error("line {line}: {message}")]
    InvalidRule { line: u64, message: String },
}

/// Result type for rule file loading.
pub type Result<T> = std::result::Result<T, RuleFileError>;
