//! Inference rules over term assertions.

use std::collections::BTreeSet;
use std::fmt;

use labpheno_model::TermAssertion;

/// A rule deriving one assertion from two others.
///
/// Antecedents match by assertion equality, so `NOT HP:x` in a rule only
/// matches a negated assertion of `HP:x` in the working set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InferenceRule {
    /// `h3` holds when both `h1` and `h2` hold.
    And {
        h1: TermAssertion,
        h2: TermAssertion,
        h3: TermAssertion,
    },
    /// `h3` holds when either `h1` or `h2` holds.
    Or {
        h1: TermAssertion,
        h2: TermAssertion,
        h3: TermAssertion,
    },
}

impl InferenceRule {
    pub fn and(h1: TermAssertion, h2: TermAssertion, h3: TermAssertion) -> Self {
        Self::And { h1, h2, h3 }
    }

    pub fn or(h1: TermAssertion, h2: TermAssertion, h3: TermAssertion) -> Self {
        Self::Or { h1, h2, h3 }
    }

    /// Connective keyword, as written in rule files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::And { .. } => "AND",
            Self::Or { .. } => "OR",
        }
    }

    pub fn antecedents(&self) -> (&TermAssertion, &TermAssertion) {
        match self {
            Self::And { h1, h2, .. } | Self::Or { h1, h2, .. } => (h1, h2),
        }
    }

    pub fn consequent(&self) -> &TermAssertion {
        match self {
            Self::And { h3, .. } | Self::Or { h3, .. } => h3,
        }
    }

    /// The consequent, if the working set satisfies the antecedents.
    pub fn evaluate(&self, working_set: &BTreeSet<TermAssertion>) -> Option<&TermAssertion> {
        let fires = match self {
            Self::And { h1, h2, .. } => working_set.contains(h1) && working_set.contains(h2),
            Self::Or { h1, h2, .. } => working_set.contains(h1) || working_set.contains(h2),
        };
        fires.then(|| self.consequent())
    }

    /// Human-readable form, e.g. `HP:1 AND NOT HP:2 INFERS HP:3`.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h1, h2) = self.antecedents();
        write!(
            f,
            "{h1} {} {h2} INFERS {}",
            self.keyword(),
            self.consequent()
        )
    }
}
