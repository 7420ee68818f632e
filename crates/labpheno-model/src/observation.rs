//! Normalized observation input.
//!
//! These types carry what the upstream record reader has already
//! extracted from a clinical observation: the coded test, its
//! interpretation codes, any components, and when it was effective.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ids::LoincId;

/// Code system URI for LOINC codings.
pub const LOINC_SYSTEM: &str = "http://loinc.org";

/// One coded value: a code within a code system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: None,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// `(system, code)` when both are present.
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.system.as_deref()?, self.code.as_deref()?))
    }
}

/// A concept expressed through one or more codings plus optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub text: Option<String>,
    pub codings: Vec<Coding>,
}

impl CodeableConcept {
    pub fn new(codings: Vec<Coding>) -> Self {
        Self {
            text: None,
            codings,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// LOINC codes among the codings. Codings that claim the LOINC system
    /// but carry a malformed code are skipped.
    pub fn loinc_ids(&self) -> BTreeSet<LoincId> {
        self.codings
            .iter()
            .filter(|coding| coding.system.as_deref() == Some(LOINC_SYSTEM))
            .filter_map(|coding| coding.code.as_deref())
            .filter_map(|code| LoincId::new(code).ok())
            .collect()
    }

    /// Text if present, otherwise the first coding display.
    pub fn description(&self) -> Option<&str> {
        if let Some(text) = self.text.as_deref() {
            return Some(text);
        }
        self.codings
            .iter()
            .find_map(|coding| coding.display.as_deref())
    }

    /// `(system, code)` pairs of all complete codings.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codings.iter().filter_map(Coding::pair)
    }
}

/// A sub-result reported alongside the main observation, e.g. the systolic
/// part of a blood pressure reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    pub interpretation: Option<CodeableConcept>,
}

/// When an observation applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effective {
    /// A single point in time.
    Instant(NaiveDateTime),
    /// A time span; either end may be open.
    Period {
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    },
}

/// Start and end of an observation. Both are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationPeriod {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl From<Option<Effective>> for ObservationPeriod {
    fn from(effective: Option<Effective>) -> Self {
        match effective {
            Some(Effective::Instant(at)) => Self {
                start: Some(at),
                end: Some(at),
            },
            Some(Effective::Period { start, end }) => Self { start, end },
            None => Self::default(),
        }
    }
}

/// A normalized lab observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Identifier of the source record.
    pub id: String,
    /// What was measured.
    pub code: CodeableConcept,
    /// Interpretation codes for the main result.
    pub interpretation: Option<CodeableConcept>,
    pub components: Vec<ObservationComponent>,
    pub effective: Option<Effective>,
}

impl Observation {
    /// LOINC codes in the observation's own code.
    pub fn code_loinc_ids(&self) -> BTreeSet<LoincId> {
        self.code.loinc_ids()
    }

    /// LOINC codes of the components, each mapped to its component. A
    /// component coded with several LOINC codes appears once per code.
    pub fn component_loinc_ids(&self) -> BTreeMap<LoincId, &ObservationComponent> {
        let mut loincs = BTreeMap::new();
        for component in &self.components {
            for loinc_id in component.code.loinc_ids() {
                loincs.insert(loinc_id, component);
            }
        }
        loincs
    }

    /// Every LOINC code in the observation and its components.
    pub fn all_loinc_ids(&self) -> BTreeSet<LoincId> {
        let mut ids = self.code_loinc_ids();
        ids.extend(self.component_loinc_ids().into_keys());
        ids
    }

    /// Description of what was measured.
    pub fn description(&self) -> Option<&str> {
        self.code.description()
    }

    pub fn period(&self) -> ObservationPeriod {
        ObservationPeriod::from(self.effective)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_loinc_ids_skip_other_systems_and_bad_codes() {
        let concept = CodeableConcept::new(vec![
            Coding::new(LOINC_SYSTEM, "2823-3"),
            Coding::new(LOINC_SYSTEM, "not-a-loinc"),
            Coding::new("http://snomed.info/sct", "59573005"),
            Coding {
                system: None,
                code: Some("6298-4".to_string()),
                display: None,
            },
        ]);
        let ids: Vec<String> = concept.loinc_ids().iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["2823-3"]);
    }

    #[test]
    fn test_description_prefers_text() {
        let concept = CodeableConcept::new(vec![
            Coding::new(LOINC_SYSTEM, "2823-3"),
            Coding::new(LOINC_SYSTEM, "6298-4").with_display("Potassium [Moles/volume] in Blood"),
        ]);
        assert_eq!(
            concept.description(),
            Some("Potassium [Moles/volume] in Blood")
        );
        let concept = concept.with_text("Potassium");
        assert_eq!(concept.description(), Some("Potassium"));
        assert_eq!(CodeableConcept::default().description(), None);
    }

    #[test]
    fn test_period_from_instant_sets_both_ends() {
        let observation = Observation {
            effective: Some(Effective::Instant(at(4))),
            ..Observation::default()
        };
        let period = observation.period();
        assert_eq!(period.start, Some(at(4)));
        assert_eq!(period.end, Some(at(4)));
    }

    #[test]
    fn test_period_keeps_open_ends() {
        let observation = Observation {
            effective: Some(Effective::Period {
                start: Some(at(1)),
                end: None,
            }),
            ..Observation::default()
        };
        assert_eq!(
            observation.period(),
            ObservationPeriod {
                start: Some(at(1)),
                end: None
            }
        );
        assert_eq!(Observation::default().period(), ObservationPeriod::default());
    }

    #[test]
    fn test_component_loinc_ids() {
        let systolic = ObservationComponent {
            code: CodeableConcept::new(vec![
                Coding::new(LOINC_SYSTEM, "8480-6"),
                Coding::new(LOINC_SYSTEM, "8459-0"),
            ]),
            interpretation: None,
        };
        let observation = Observation {
            code: CodeableConcept::new(vec![Coding::new(LOINC_SYSTEM, "85354-9")]),
            components: vec![systolic],
            ..Observation::default()
        };
        let components = observation.component_loinc_ids();
        assert_eq!(components.len(), 2);
        assert_eq!(observation.all_loinc_ids().len(), 3);
    }
}
