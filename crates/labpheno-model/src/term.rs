//! Ontology terms and term assertions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::TermId;

/// Metadata for one ontology term, as loaded from the term directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Primary identifier (e.g. `HP:0002153`).
    pub id: TermId,

    /// Term label (e.g. "Hyperkalemia").
    pub name: String,

    /// Textual definition, without the trailing cross-references.
    pub definition: Option<String>,

    /// Alternate identifiers that resolve to this term.
    pub alt_ids: Vec<TermId>,

    /// Whether the term is marked obsolete.
    pub obsolete: bool,
}

impl Term {
    /// Create a term with only an id and a name.
    pub fn new(id: TermId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            definition: None,
            alt_ids: Vec::new(),
            obsolete: false,
        }
    }
}

/// An ontology term asserted present, or explicitly asserted absent.
///
/// Two assertions are equal only when both the term and the negation flag
/// match, so `HP:0002153` and `NOT HP:0002153` are distinct set members.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermAssertion {
    term: TermId,
    negated: bool,
}

impl TermAssertion {
    pub fn new(term: TermId, negated: bool) -> Self {
        Self { term, negated }
    }

    /// The subject exhibits `term`.
    pub fn present(term: TermId) -> Self {
        Self::new(term, false)
    }

    /// The subject explicitly does not exhibit `term`.
    pub fn negated(term: TermId) -> Self {
        Self::new(term, true)
    }

    pub fn term(&self) -> &TermId {
        &self.term
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The assertion with the opposite negation flag.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self::new(self.term.clone(), !self.negated)
    }
}

impl fmt::Display for TermAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT {}", self.term)
        } else {
            write!(f, "{}", self.term)
        }
    }
}
