//! Error types for model value construction.

use thiserror::Error;

/// Errors raised when raw text does not form a valid model value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Text is not shaped like a LOINC code (`<digits>-<check digit>`).
    #[error("malformed LOINC code: '{0}'")]
    MalformedLoincId(String),

    /// Scale code is not one of the known LOINC scales.
    #[error("unknown LOINC scale: '{0}'")]
    UnknownScale(String),

    /// Internal outcome code is not one of the canonical categories.
    #[error("unknown outcome category code: '{0}'")]
    UnknownCategory(String),

    /// Term identifier is not in `PREFIX:LOCAL` form.
    #[error("malformed term id: '{0}'")]
    MalformedTermId(String),
}

/// Result type for model value construction.
pub type Result<T> = std::result::Result<T, ModelError>;
