//! Inference rules loaded from tab-separated files.
//!
//! The default rule file lives at `data/inference-rules.tsv` (see
//! `labpheno_standards::paths::rules_path`).

mod loader;

pub use loader::{
    RULE_FIELD_COUNT, load_rules, load_rules_from_str, parse_assertion, parse_rule, parse_rules,
};
