//! Reference data loaders.
//!
//! This crate provides:
//!
//! - **Annotation table**: the LOINC-to-phenotype annotation dataset,
//!   parsed into an immutable [`AnnotationTable`](labpheno_model::AnnotationTable)
//! - **Term directory**: phenotype ontology terms from an OBO file, used to
//!   check that annotated terms exist
//! - **Paths**: default reference data locations
//!
//! # Data Directory Structure
//!
//! ```text
//! data/
//! ├── loinc2hpo-annotations.tsv   # LOINC annotation table
//! ├── hp.obo                      # Human Phenotype Ontology
//! └── inference-rules.tsv         # Inference rules
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use labpheno_standards::{load_annotations, load_terms, paths};
//!
//! let terms = load_terms(&paths::ontology_path())?;
//! let table = load_annotations(&paths::annotations_path(), &terms)?;
//! println!("{} annotated LOINC codes", table.len());
//! ```

pub mod annotation;
pub mod error;
pub mod ontology;
pub mod paths;

// Error types
pub use error::{Result, StandardsError};

// Annotation table
pub use annotation::{
    ANNOTATION_FIELD_COUNT, AnnotationLoadSummary, AnnotationTableBuilder, HEADER_MARKER,
    load_annotations, load_annotations_from_str, load_annotations_with_summary,
    parse_annotations, parse_annotations_with_summary,
};

// Ontology terms
pub use ontology::{TermDirectory, TermLookup, load_terms, load_terms_from_str, parse_terms};

// Path utilities
pub use paths::{ANNOTATIONS_FILE, DATA_ENV_VAR, ONTOLOGY_FILE, RULES_FILE, data_root};
