//! Reference data path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the reference data directory.
pub const DATA_ENV_VAR: &str = "LABPHENO_DATA_DIR";

/// File name of the LOINC-to-HPO annotation table.
pub const ANNOTATIONS_FILE: &str = "loinc2hpo-annotations.tsv";

/// File name of the phenotype ontology.
pub const ONTOLOGY_FILE: &str = "hp.obo";

/// File name of the inference rule table.
pub const RULES_FILE: &str = "inference-rules.tsv";

/// Get the reference data root directory.
///
/// Resolution order:
/// 1. `LABPHENO_DATA_DIR` environment variable
/// 2. `data/` directory relative to workspace root
pub fn data_root() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Default annotation table path.
pub fn annotations_path() -> PathBuf {
    data_root().join(ANNOTATIONS_FILE)
}

/// Default ontology path.
pub fn ontology_path() -> PathBuf {
    data_root().join(ONTOLOGY_FILE)
}

/// Default inference rule table path.
pub fn rules_path() -> PathBuf {
    data_root().join(RULES_FILE)
}
