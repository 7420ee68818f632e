//! Inference over phenotype term assertions.
//!
//! An [`InferenceRule`] derives a consequent assertion from two antecedents
//! with `AND` or `OR`. A [`RuleSet`] runs its rules against one
//! observation's working set; [`RuleSet::saturate`] repeats passes until
//! nothing new follows.
//!
//! # Example
//!
//! ```rust,ignore
//! use labpheno_inference::rules::load_rules;
//!
//! let rules = load_rules(&labpheno_standards::paths::rules_path())?;
//! let mut working_set = outcome.assertions;
//! let added = rules.saturate(&mut working_set);
//! ```

pub mod engine;
pub mod error;
pub mod rule;
pub mod rules;

pub use engine::RuleSet;
pub use error::{Result, RuleFileError};
pub use rule::InferenceRule;
