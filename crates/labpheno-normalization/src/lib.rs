//! Interpretation normalization and annotation lookup.
//!
//! Lab results report their interpretation as one or more `(system, code)`
//! codings. The [`Normalizer`] reduces them to a single
//! [`OutcomeCategory`](labpheno_model::OutcomeCategory), and the
//! [`AnnotationResolver`] turns that category into the phenotype term
//! assertion the test is annotated with.
//!
//! # Example
//!
//! ```rust,ignore
//! use labpheno_normalization::{AnnotationResolver, HL7_V2_0078_SYSTEM};
//!
//! let resolver = AnnotationResolver::new(&table);
//! let assertion = resolver.resolve(&loinc_id, [(HL7_V2_0078_SYSTEM, "HH")])?;
//! ```

pub mod error;
pub mod interpretation;
pub mod options;
pub mod resolve;

pub use error::{NormalizationError, ResolveError, Result};
pub use interpretation::{
    CodeSystem, HL7_V2_0078_SYSTEM, HL7_V3_INTERPRETATION_SYSTEM, INTERNAL_SYSTEM, Normalizer,
    builtin_code_systems, normalize,
};
pub use options::NormalizerOptions;
pub use resolve::{AnnotationResolver, ObservationOutcome};
