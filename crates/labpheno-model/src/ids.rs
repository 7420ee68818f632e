#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A LOINC code identifying one kind of laboratory test.
///
/// The shape is `<digits>-<check digit>`, e.g. `2823-3`. Only the shape is
/// validated; the check digit is not recomputed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoincId(String);

impl LoincId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_loinc_shape(trimmed) {
            return Err(ModelError::MalformedLoincId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part before the hyphen.
    pub fn number(&self) -> &str {
        self.0.split_once('-').map_or("", |(number, _)| number)
    }

    /// The trailing check digit.
    pub fn check_digit(&self) -> char {
        self.0.chars().last().unwrap_or('0')
    }
}

fn is_loinc_shape(value: &str) -> bool {
    let Some((number, check)) = value.split_once('-') else {
        return false;
    };
    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && check.len() == 1
        && check.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for LoincId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LoincId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LoincId> for String {
    fn from(value: LoincId) -> Self {
        value.0
    }
}

impl fmt::Display for LoincId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ontology term identifier in prefixed form, e.g. `HP:0001943`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId {
    value: String,
    colon: usize,
}

impl TermId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        match trimmed.find(':') {
            Some(colon) if colon > 0 && colon + 1 < trimmed.len() => Ok(Self {
                value: trimmed.to_string(),
                colon,
            }),
            _ => Err(ModelError::MalformedTermId(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Ontology prefix, e.g. `HP`.
    pub fn prefix(&self) -> &str {
        &self.value[..self.colon]
    }

    /// Local identifier after the prefix, e.g. `0001943`.
    pub fn local_id(&self) -> &str {
        &self.value[self.colon + 1..]
    }
}

impl FromStr for TermId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TermId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TermId> for String {
    fn from(value: TermId) -> Self {
        value.value
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
