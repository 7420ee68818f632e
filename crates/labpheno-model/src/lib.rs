//! Core types for translating lab results into phenotype assertions.
//!
//! - [`ids`]: validated LOINC and ontology term identifiers
//! - [`enums`]: LOINC scales and canonical outcome categories
//! - [`term`]: term metadata and term assertions
//! - [`annotation`]: per-test annotation records and the annotation table
//! - [`observation`]: the normalized observation handed in by record readers

pub mod annotation;
pub mod enums;
pub mod error;
pub mod ids;
pub mod observation;
pub mod term;

pub use annotation::{AnnotationDraft, AnnotationRecord, AnnotationTable};
pub use enums::{LoincScale, OutcomeCategory};
pub use error::{ModelError, Result};
pub use ids::{LoincId, TermId};
pub use observation::{
    CodeableConcept, Coding, Effective, LOINC_SYSTEM, Observation, ObservationComponent,
    ObservationPeriod,
};
pub use term::{Term, TermAssertion};
