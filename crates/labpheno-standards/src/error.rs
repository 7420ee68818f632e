//! Error types for reference data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading a reference file.
///
/// Row-level defects (malformed codes, unknown terms) are logged and
/// skipped by the loaders; only failures to read the data end up here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tab-separated stream could not be read.
    #[error("failed to read tab-separated data: {source}")]
    Read {
        #[source]
        source: csv::Error,
    },

    /// A line-based stream could not be read.
    #[error("failed to read line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl StandardsError {
    pub(crate) fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for StandardsError {
    fn from(source: csv::Error) -> Self {
        Self::Read { source }
    }
}

/// Result type for reference data loading.
pub type Result<T> = std::result::Result<T, StandardsError>;
