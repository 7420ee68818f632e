//! Per-test annotation records.
//!
//! An annotation record says, for one LOINC test, which term assertion each
//! canonical outcome category implies:
//!
//! ```text
//! 2823-3 (Potassium, Qn)
//!   L -> HP:0002900 (Hypokalemia)
//!   N -> NOT HP:0011042 (Abnormal blood potassium concentration)
//!   H -> HP:0002153 (Hyperkalemia)
//! ```
//!
//! Records are accumulated as [`AnnotationDraft`]s while the reference
//! dataset is scanned and frozen into [`AnnotationRecord`]s once the scan
//! is complete. The resulting [`AnnotationTable`] is read-only.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::enums::{LoincScale, OutcomeCategory};
use crate::ids::LoincId;
use crate::term::TermAssertion;

/// Mutable accumulator for one LOINC test's annotation.
///
/// The scale is fixed by the first dataset row seen for the test.
#[derive(Debug, Clone)]
pub struct AnnotationDraft {
    loinc_id: LoincId,
    scale: LoincScale,
    mappings: BTreeMap<OutcomeCategory, TermAssertion>,
}

impl AnnotationDraft {
    pub fn new(loinc_id: LoincId, scale: LoincScale) -> Self {
        Self {
            loinc_id,
            scale,
            mappings: BTreeMap::new(),
        }
    }

    pub fn loinc_id(&self) -> &LoincId {
        &self.loinc_id
    }

    pub fn scale(&self) -> LoincScale {
        self.scale
    }

    /// Map a category to an assertion. The last mapping for a category wins;
    /// the replaced assertion is returned.
    pub fn add_mapping(
        &mut self,
        category: OutcomeCategory,
        assertion: TermAssertion,
    ) -> Option<TermAssertion> {
        self.mappings.insert(category, assertion)
    }

    /// Freeze the draft.
    pub fn build(self) -> AnnotationRecord {
        AnnotationRecord {
            loinc_id: self.loinc_id,
            scale: self.scale,
            mappings: self.mappings,
        }
    }
}

/// Immutable annotation for one LOINC test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    loinc_id: LoincId,
    scale: LoincScale,
    mappings: BTreeMap<OutcomeCategory, TermAssertion>,
}

impl AnnotationRecord {
    pub fn loinc_id(&self) -> &LoincId {
        &self.loinc_id
    }

    pub fn scale(&self) -> LoincScale {
        self.scale
    }

    /// The assertion implied by `category`, if the test is annotated for it.
    pub fn assertion_for(&self, category: OutcomeCategory) -> Option<&TermAssertion> {
        self.mappings.get(&category)
    }

    /// All category mappings, ordered by category.
    pub fn mappings(&self) -> &BTreeMap<OutcomeCategory, TermAssertion> {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Annotation records keyed by LOINC code, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    records: Vec<AnnotationRecord>,
    index: HashMap<LoincId, usize>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records; a later record for the same code
    /// replaces the earlier one in place.
    pub fn from_records(records: impl IntoIterator<Item = AnnotationRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.insert(record);
        }
        table
    }

    fn insert(&mut self, record: AnnotationRecord) {
        match self.index.get(record.loinc_id()) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index
                    .insert(record.loinc_id().clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, loinc_id: &LoincId) -> Option<&AnnotationRecord> {
        self.index.get(loinc_id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, loinc_id: &LoincId) -> bool {
        self.index.contains_key(loinc_id)
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationRecord> {
        self.records.iter()
    }

    /// LOINC codes in first-seen order.
    pub fn loinc_ids(&self) -> impl Iterator<Item = &LoincId> {
        self.records.iter().map(AnnotationRecord::loinc_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of category mappings across all records.
    pub fn mapping_count(&self) -> usize {
        self.records.iter().map(|r| r.mappings.len()).sum()
    }
}

impl<'a> IntoIterator for &'a AnnotationTable {
    type Item = &'a AnnotationRecord;
    type IntoIter = std::slice::Iter<'a, AnnotationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TermId;

    fn loinc(id: &str) -> LoincId {
        LoincId::new(id).unwrap()
    }

    fn present(id: &str) -> TermAssertion {
        TermAssertion::present(TermId::new(id).unwrap())
    }

    #[test]
    fn test_draft_last_mapping_wins() {
        let mut draft = AnnotationDraft::new(loinc("2823-3"), LoincScale::Quantitative);
        assert!(
            draft
                .add_mapping(OutcomeCategory::High, present("HP:0002153"))
                .is_none()
        );
        let replaced = draft.add_mapping(OutcomeCategory::High, present("HP:0011042"));
        assert_eq!(replaced, Some(present("HP:0002153")));

        let record = draft.build();
        assert_eq!(
            record.assertion_for(OutcomeCategory::High),
            Some(&present("HP:0011042"))
        );
        assert_eq!(record.mappings().len(), 1);
    }

    #[test]
    fn test_table_preserves_insertion_order() {
        let table = AnnotationTable::from_records([
            AnnotationDraft::new(loinc("6298-4"), LoincScale::Quantitative).build(),
            AnnotationDraft::new(loinc("2823-3"), LoincScale::Quantitative).build(),
            AnnotationDraft::new(loinc("10000-8"), LoincScale::Ordinal).build(),
        ]);
        let ids: Vec<&str> = table.loinc_ids().map(LoincId::as_str).collect();
        assert_eq!(ids, vec!["6298-4", "2823-3", "10000-8"]);
        assert!(table.contains(&loinc("2823-3")));
        assert_eq!(
            table.get(&loinc("10000-8")).map(AnnotationRecord::scale),
            Some(LoincScale::Ordinal)
        );
        assert!(table.get(&loinc("1-1")).is_none());
    }

    #[test]
    fn test_table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnnotationTable>();
    }
}
