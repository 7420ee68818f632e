//! Error types for interpretation normalization and annotation lookup.

use labpheno_model::{LoincId, OutcomeCategory};
use thiserror::Error;

/// Why a set of coded values could not be reduced to one category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NormalizationError {
    /// No coding resolved to a category. `codes` lists the `system|code`
    /// pairs that were offered.
    #[error("no recognized interpretation code among [{}]", join_codes(.codes))]
    Unmapped { codes: Vec<String> },

    /// Codings resolved to more than one distinct category.
    #[error("conflicting interpretation codes: {}", join_categories(.categories))]
    Conflicting { categories: Vec<OutcomeCategory> },
}

fn join_codes(codes: &[String]) -> String {
    codes.join(", ")
}

fn join_categories(categories: &[OutcomeCategory]) -> String {
    categories
        .iter()
        .map(OutcomeCategory::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a coded result could not be turned into a term assertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The LOINC code has no annotation record.
    #[error("LOINC {loinc_id} is not annotated")]
    NotAnnotated { loinc_id: LoincId },

    /// The result codes could not be normalized.
    #[error("LOINC {loinc_id}: {source}")]
    Normalization {
        loinc_id: LoincId,
        #[source]
        source: NormalizationError,
    },
}

impl ResolveError {
    /// The LOINC code the failure concerns.
    pub fn loinc_id(&self) -> &LoincId {
        match self {
            ResolveError::NotAnnotated { loinc_id } => loinc_id,
            ResolveError::Normalization { loinc_id, .. } => loinc_id,
        }
    }
}

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, NormalizationError>;
