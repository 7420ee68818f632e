//! Type-safe enumerations for LOINC scales and canonical outcome categories.
//!
//! Both are represented as short codes in reference files (`Qn`, `Ord`,
//! `H`, `NEG` ...). Parsing is case-insensitive and rejects anything outside
//! the closed set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// LOINC scale type: how result values for a test are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoincScale {
    /// Quantitative (`Qn`): numeric result with a reference range.
    Quantitative,
    /// Ordinal (`Ord`): ranked categories such as positive/negative.
    Ordinal,
    /// Ordinal or quantitative (`OrdQn`).
    OrdinalQuantitative,
    /// Nominal (`Nom`): unranked categories.
    Nominal,
    /// Narrative (`Nar`): free text.
    Narrative,
    /// Multi (`Multi`): several values.
    Multi,
    /// Document (`Doc`).
    Document,
    /// Set (`Set`): a panel of other tests.
    Set,
}

impl LoincScale {
    /// Returns the LOINC scale code.
    pub fn as_code(&self) -> &'static str {
        match self {
            LoincScale::Quantitative => "Qn",
            LoincScale::Ordinal => "Ord",
            LoincScale::OrdinalQuantitative => "OrdQn",
            LoincScale::Nominal => "Nom",
            LoincScale::Narrative => "Nar",
            LoincScale::Multi => "Multi",
            LoincScale::Document => "Doc",
            LoincScale::Set => "Set",
        }
    }

    /// All scales, in declaration order.
    pub const fn all() -> &'static [LoincScale] {
        &[
            LoincScale::Quantitative,
            LoincScale::Ordinal,
            LoincScale::OrdinalQuantitative,
            LoincScale::Nominal,
            LoincScale::Narrative,
            LoincScale::Multi,
            LoincScale::Document,
            LoincScale::Set,
        ]
    }

    /// Returns true if results on this scale are reported as interpretation codes.
    pub fn is_interpretable(&self) -> bool {
        matches!(
            self,
            LoincScale::Quantitative
                | LoincScale::Ordinal
                | LoincScale::OrdinalQuantitative
                | LoincScale::Nominal
        )
    }
}

impl fmt::Display for LoincScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for LoincScale {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "QN" => Ok(LoincScale::Quantitative),
            "ORD" => Ok(LoincScale::Ordinal),
            "ORDQN" => Ok(LoincScale::OrdinalQuantitative),
            "NOM" => Ok(LoincScale::Nominal),
            "NAR" => Ok(LoincScale::Narrative),
            "MULTI" => Ok(LoincScale::Multi),
            "DOC" => Ok(LoincScale::Document),
            "SET" => Ok(LoincScale::Set),
            _ => Err(ModelError::UnknownScale(s.to_string())),
        }
    }
}

/// Canonical outcome category every external code must normalize to
/// before annotation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    /// Below the reference range (`L`).
    Low,
    /// Within the reference range (`N`).
    Normal,
    /// Above the reference range (`H`).
    High,
    /// Abnormal without direction (`A`).
    Abnormal,
    /// Detected / present (`POS`).
    Positive,
    /// Not detected / absent (`NEG`).
    Negative,
}

impl OutcomeCategory {
    /// Returns the internal code used in the annotation dataset.
    pub fn as_code(&self) -> &'static str {
        match self {
            OutcomeCategory::Low => "L",
            OutcomeCategory::Normal => "N",
            OutcomeCategory::High => "H",
            OutcomeCategory::Abnormal => "A",
            OutcomeCategory::Positive => "POS",
            OutcomeCategory::Negative => "NEG",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeCategory::Low => "Low",
            OutcomeCategory::Normal => "Normal",
            OutcomeCategory::High => "High",
            OutcomeCategory::Abnormal => "Abnormal",
            OutcomeCategory::Positive => "Positive",
            OutcomeCategory::Negative => "Negative",
        }
    }

    pub const fn all() -> &'static [OutcomeCategory] {
        &[
            OutcomeCategory::Low,
            OutcomeCategory::Normal,
            OutcomeCategory::High,
            OutcomeCategory::Abnormal,
            OutcomeCategory::Positive,
            OutcomeCategory::Negative,
        ]
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutcomeCategory {
    type Err = ModelError;

    /// Parse an internal outcome code (`L`, `N`, `H`, `A`, `POS`, `NEG`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "L" => Ok(OutcomeCategory::Low),
            "N" => Ok(OutcomeCategory::Normal),
            "H" => Ok(OutcomeCategory::High),
            "A" => Ok(OutcomeCategory::Abnormal),
            "POS" => Ok(OutcomeCategory::Positive),
            "NEG" => Ok(OutcomeCategory::Negative),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_from_str() {
        assert_eq!("Qn".parse::<LoincScale>().unwrap(), LoincScale::Quantitative);
        assert_eq!("ord".parse::<LoincScale>().unwrap(), LoincScale::Ordinal);
        assert_eq!(
            "ORDQN".parse::<LoincScale>().unwrap(),
            LoincScale::OrdinalQuantitative
        );
        assert!(matches!(
            "Ratio".parse::<LoincScale>(),
            Err(ModelError::UnknownScale(_))
        ));
    }

    #[test]
    fn test_scale_codes_parse_back() {
        for scale in LoincScale::all() {
            assert_eq!(scale.as_code().parse::<LoincScale>().unwrap(), *scale);
        }
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("h".parse::<OutcomeCategory>().unwrap(), OutcomeCategory::High);
        assert_eq!(
            "NEG".parse::<OutcomeCategory>().unwrap(),
            OutcomeCategory::Negative
        );
        assert!(matches!(
            "HH".parse::<OutcomeCategory>(),
            Err(ModelError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_interpretable_scales() {
        assert!(LoincScale::Quantitative.is_interpretable());
        assert!(LoincScale::Nominal.is_interpretable());
        assert!(!LoincScale::Narrative.is_interpretable());
        assert!(!LoincScale::Set.is_interpretable());
    }
}
