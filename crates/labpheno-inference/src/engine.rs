//! Rule set evaluation.

use std::collections::BTreeSet;

use labpheno_model::TermAssertion;

use crate::rule::InferenceRule;

/// An ordered collection of inference rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<InferenceRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<InferenceRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: InferenceRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InferenceRule> {
        self.rules.iter()
    }

    /// Run every rule once against `working_set`.
    ///
    /// Returns the consequents that are not already in the working set.
    /// Consequents produced in this pass are not visible to other rules of
    /// the same pass.
    pub fn apply(&self, working_set: &BTreeSet<TermAssertion>) -> BTreeSet<TermAssertion> {
        let inferred: BTreeSet<TermAssertion> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(working_set))
            .filter(|consequent| !working_set.contains(*consequent))
            .cloned()
            .collect();
        tracing::trace!(
            rules = self.rules.len(),
            known = working_set.len(),
            inferred = inferred.len(),
            "Inference pass"
        );
        inferred
    }

    /// Apply passes until nothing new is inferred, folding each pass into
    /// `working_set`. Returns the number of assertions added.
    pub fn saturate(&self, working_set: &mut BTreeSet<TermAssertion>) -> usize {
        let mut added = 0;
        let mut passes = 0;
        loop {
            let inferred = self.apply(working_set);
            if inferred.is_empty() {
                break;
            }
            passes += 1;
            added += inferred.len();
            working_set.extend(inferred);
        }
        tracing::debug!(passes, added, "Inference saturated");
        added
    }
}

impl FromIterator<InferenceRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = InferenceRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<InferenceRule> for RuleSet {
    fn extend<I: IntoIterator<Item = InferenceRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a InferenceRule;
    type IntoIter = std::slice::Iter<'a, InferenceRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use labpheno_model::TermId;

    use super::*;

    fn present(id: &str) -> TermAssertion {
        TermAssertion::present(TermId::new(id).unwrap())
    }

    #[test]
    fn test_apply_skips_known_consequents() {
        let rules = RuleSet::from_iter([InferenceRule::or(
            present("HP:1"),
            present("HP:2"),
            present("HP:3"),
        )]);
        let working: BTreeSet<_> = [present("HP:1"), present("HP:3")].into_iter().collect();
        assert!(rules.apply(&working).is_empty());
    }

    #[test]
    fn test_single_pass_does_not_chain() {
        let rules = RuleSet::from_iter([
            InferenceRule::or(present("HP:1"), present("HP:1"), present("HP:2")),
            InferenceRule::or(present("HP:2"), present("HP:2"), present("HP:3")),
        ]);
        let working: BTreeSet<_> = [present("HP:1")].into_iter().collect();
        let inferred = rules.apply(&working);
        assert_eq!(inferred.len(), 1);
        assert!(inferred.contains(&present("HP:2")));
    }

    #[test]
    fn test_iter_is_double_ended() {
        let first = InferenceRule::or(present("HP:1"), present("HP:1"), present("HP:2"));
        let last = InferenceRule::and(present("HP:2"), present("HP:3"), present("HP:4"));
        let rules = RuleSet::from_rules(vec![first.clone(), last.clone()]);
        let reversed: Vec<_> = rules.iter().rev().collect();
        assert_eq!(reversed, [&last, &first]);
        assert_eq!(rules.iter().len(), 2);
    }
}
