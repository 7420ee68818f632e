//! Annotation lookup for coded results.
//!
//! Runs the per-result pipeline: LOINC code -> annotation record ->
//! normalized outcome category -> term assertion.

use std::collections::BTreeSet;

use labpheno_model::{
    AnnotationRecord, AnnotationTable, CodeableConcept, LoincId, Observation, TermAssertion,
};

use crate::error::ResolveError;
use crate::interpretation::Normalizer;

/// Assertions and failures collected for one observation.
#[derive(Debug, Clone, Default)]
pub struct ObservationOutcome {
    /// Identifier of the source observation.
    pub observation_id: String,
    /// Working set of assertions established by this observation.
    pub assertions: BTreeSet<TermAssertion>,
    /// Per-LOINC failures, in the order they were met.
    pub failures: Vec<ResolveError>,
}

impl ObservationOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Resolves coded results against an annotation table.
#[derive(Debug, Clone)]
pub struct AnnotationResolver<'a> {
    table: &'a AnnotationTable,
    normalizer: Normalizer,
}

impl<'a> AnnotationResolver<'a> {
    /// A resolver using the built-in code systems.
    pub fn new(table: &'a AnnotationTable) -> Self {
        Self::with_normalizer(table, Normalizer::new())
    }

    pub fn with_normalizer(table: &'a AnnotationTable, normalizer: Normalizer) -> Self {
        Self { table, normalizer }
    }

    pub fn table(&self) -> &'a AnnotationTable {
        self.table
    }

    /// Resolve one result value for `loinc_id`.
    ///
    /// Returns `Ok(None)` when the result normalizes to a category the test
    /// is not annotated for.
    pub fn resolve<'p, I>(
        &self,
        loinc_id: &LoincId,
        pairs: I,
    ) -> Result<Option<&'a TermAssertion>, ResolveError>
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        let record = self.record(loinc_id)?;
        let category = self
            .normalizer
            .normalize(pairs, record.scale())
            .map_err(|source| ResolveError::Normalization {
                loinc_id: loinc_id.clone(),
                source,
            })?;
        let assertion = record.assertion_for(category);
        tracing::debug!(
            loinc = %loinc_id,
            category = %category,
            assertion = ?assertion.map(ToString::to_string),
            "Resolved result"
        );
        Ok(assertion)
    }

    /// Resolve the observation code and every component.
    ///
    /// The observation's own LOINC codes use its interpretation; component
    /// codes use the component's interpretation. A missing interpretation
    /// counts as no codings.
    pub fn resolve_observation(&self, observation: &Observation) -> ObservationOutcome {
        let mut outcome = ObservationOutcome {
            observation_id: observation.id.clone(),
            ..ObservationOutcome::default()
        };

        for loinc_id in observation.code_loinc_ids() {
            self.collect(&loinc_id, observation.interpretation.as_ref(), &mut outcome);
        }
        for (loinc_id, component) in observation.component_loinc_ids() {
            self.collect(&loinc_id, component.interpretation.as_ref(), &mut outcome);
        }

        if outcome.has_failures() {
            tracing::debug!(
                observation = %outcome.observation_id,
                assertions = outcome.assertions.len(),
                failures = outcome.failures.len(),
                "Observation resolved with failures"
            );
        }
        outcome
    }

    fn collect(
        &self,
        loinc_id: &LoincId,
        interpretation: Option<&CodeableConcept>,
        outcome: &mut ObservationOutcome,
    ) {
        let pairs = interpretation.into_iter().flat_map(CodeableConcept::pairs);
        match self.resolve(loinc_id, pairs) {
            Ok(Some(assertion)) => {
                outcome.assertions.insert(assertion.clone());
            }
            Ok(None) => {}
            Err(error) => outcome.failures.push(error),
        }
    }

    fn record(&self, loinc_id: &LoincId) -> Result<&'a AnnotationRecord, ResolveError> {
        self.table
            .get(loinc_id)
            .ok_or_else(|| ResolveError::NotAnnotated {
                loinc_id: loinc_id.clone(),
            })
    }
}
