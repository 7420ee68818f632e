//! Interpretation code normalization.
//!
//! A lab result's interpretation may be reported with several codings, from
//! one or more code systems. Each recognized code maps to one
//! [`OutcomeCategory`]; the result normalizes only when every recognized
//! code agrees.
//!
//! | code system                          | codes                          | category |
//! |--------------------------------------|--------------------------------|----------|
//! | HL7 v2 table 0078 / v3 interpretation | `LL`, `L`, `LU`, `<`           | Low      |
//! |                                      | `N`                            | Normal   |
//! |                                      | `HH`, `H`, `HU`, `>`           | High     |
//! |                                      | `A`, `AA`                      | Abnormal |
//! |                                      | `POS`, `DET`                   | Positive |
//! |                                      | `NEG`, `ND`                    | Negative |
//! | internal                             | `L`, `N`, `H`, `A`, `POS`, `NEG` | as named |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use labpheno_model::{CodeableConcept, LoincScale, OutcomeCategory};

use crate::error::{NormalizationError, Result};
use crate::options::NormalizerOptions;

/// HL7 v2 table 0078 (abnormal flags).
pub const HL7_V2_0078_SYSTEM: &str = "http://hl7.org/fhir/v2/0078";

/// HL7 v3 ObservationInterpretation code system.
pub const HL7_V3_INTERPRETATION_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/v3-ObservationInterpretation";

/// Internal outcome codes, accepted verbatim.
pub const INTERNAL_SYSTEM: &str = "http://jax.org/loinc2hpo";

const HL7_INTERPRETATION_CODES: &[(&str, OutcomeCategory)] = &[
    ("LL", OutcomeCategory::Low),
    ("L", OutcomeCategory::Low),
    ("LU", OutcomeCategory::Low),
    ("<", OutcomeCategory::Low),
    ("N", OutcomeCategory::Normal),
    ("HH", OutcomeCategory::High),
    ("H", OutcomeCategory::High),
    ("HU", OutcomeCategory::High),
    (">", OutcomeCategory::High),
    ("A", OutcomeCategory::Abnormal),
    ("AA", OutcomeCategory::Abnormal),
    ("POS", OutcomeCategory::Positive),
    ("DET", OutcomeCategory::Positive),
    ("NEG", OutcomeCategory::Negative),
    ("ND", OutcomeCategory::Negative),
];

const INTERPRETABLE_SCALES: &[LoincScale] = &[
    LoincScale::Quantitative,
    LoincScale::Ordinal,
    LoincScale::OrdinalQuantitative,
    LoincScale::Nominal,
];

/// A code system's code-to-category table and the scales it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystem {
    system: String,
    scales: BTreeSet<LoincScale>,
    codes: BTreeMap<String, OutcomeCategory>,
}

impl CodeSystem {
    /// A code system that applies to every scale.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            scales: LoincScale::all().iter().copied().collect(),
            codes: BTreeMap::new(),
        }
    }

    /// Restrict the code system to the given scales.
    #[must_use]
    pub fn for_scales(mut self, scales: &[LoincScale]) -> Self {
        self.scales = scales.iter().copied().collect();
        self
    }

    /// Map `code` to `category`.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>, category: OutcomeCategory) -> Self {
        self.codes.insert(code.into(), category);
        self
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn applies_to(&self, scale: LoincScale) -> bool {
        self.scales.contains(&scale)
    }

    /// Category for a code of this system. Codes match exactly after trimming.
    pub fn category(&self, code: &str) -> Option<OutcomeCategory> {
        self.codes.get(code.trim()).copied()
    }
}

/// The code systems recognized without any configuration.
pub fn builtin_code_systems() -> Vec<CodeSystem> {
    let hl7 = |system: &str| {
        HL7_INTERPRETATION_CODES
            .iter()
            .fold(CodeSystem::new(system), |table, (code, category)| {
                table.with_code(*code, *category)
            })
            .for_scales(INTERPRETABLE_SCALES)
    };
    let internal = OutcomeCategory::all()
        .iter()
        .fold(CodeSystem::new(INTERNAL_SYSTEM), |table, category| {
            table.with_code(category.as_code(), *category)
        });

    vec![
        hl7(HL7_V2_0078_SYSTEM),
        hl7(HL7_V3_INTERPRETATION_SYSTEM),
        internal,
    ]
}

/// Reduces `(system, code)` pairs to a single outcome category.
#[derive(Debug, Clone)]
pub struct Normalizer {
    systems: Vec<CodeSystem>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// A normalizer with the built-in code systems.
    pub fn new() -> Self {
        Self::with_options(NormalizerOptions::default())
    }

    pub fn with_options(options: NormalizerOptions) -> Self {
        let mut systems = options.code_systems;
        if options.include_builtin {
            systems.extend(builtin_code_systems());
        }
        Self { systems }
    }

    /// Code systems consulted, in lookup order.
    pub fn code_systems(&self) -> &[CodeSystem] {
        &self.systems
    }

    /// Category for one coding, if its system is recognized for `scale`
    /// and the code is known.
    pub fn lookup(&self, system: &str, code: &str, scale: LoincScale) -> Option<OutcomeCategory> {
        let system = system.trim();
        self.systems
            .iter()
            .filter(|table| table.system == system && table.applies_to(scale))
            .find_map(|table| table.category(code))
    }

    /// Normalize all codings of one result value.
    ///
    /// Pairs from unrecognized systems and unknown codes are ignored.
    /// Repeated or synonymous codes collapse to one category.
    pub fn normalize<'a, I>(&self, pairs: I, scale: LoincScale) -> Result<OutcomeCategory>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut offered = Vec::new();
        let mut categories = BTreeSet::new();

        for (system, code) in pairs {
            let category = self.lookup(system, code, scale);
            tracing::trace!(system, code, scale = %scale, ?category, "Interpretation lookup");
            if let Some(category) = category {
                categories.insert(category);
            }
            offered.push(format!("{system}|{code}"));
        }

        let mut found = categories.into_iter();
        match (found.next(), found.next()) {
            (None, _) => Err(NormalizationError::Unmapped { codes: offered }),
            (Some(category), None) => Ok(category),
            (Some(first), Some(second)) => {
                let mut categories = vec![first, second];
                categories.extend(found);
                Err(NormalizationError::Conflicting { categories })
            }
        }
    }

    /// Normalize the codings of a codeable concept.
    pub fn normalize_concept(
        &self,
        concept: &CodeableConcept,
        scale: LoincScale,
    ) -> Result<OutcomeCategory> {
        self.normalize(concept.pairs(), scale)
    }
}

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::new);

/// Normalize with the built-in code systems.
pub fn normalize<'a, I>(pairs: I, scale: LoincScale) -> Result<OutcomeCategory>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    DEFAULT_NORMALIZER.normalize(pairs, scale)
}
