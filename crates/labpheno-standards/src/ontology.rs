//! Phenotype ontology term directory.
//!
//! Loads term metadata from an OBO 1.4 flat file (`hp.obo`). Only `[Term]`
//! stanzas are read, and within them only the tags the annotation builder
//! and the CLI need:
//!
//! ```text
//! [Term]
//! id: HP:0002153
//! name: Hyperkalemia
//! alt_id: HP:0004373
//! def: "An abnormally increased potassium concentration in the blood." [HPO:probinson]
//! is_a: HP:0011042 ! Abnormal blood potassium concentration
//! ```
//!
//! Stanzas without a usable `id` are skipped with a warning.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use labpheno_model::{Term, TermId};

use crate::error::{Result, StandardsError};

/// Read access to term metadata by identifier.
pub trait TermLookup {
    /// The term for `id`, if known.
    fn term(&self, id: &TermId) -> Option<&Term>;
}

impl TermLookup for BTreeMap<TermId, Term> {
    fn term(&self, id: &TermId) -> Option<&Term> {
        self.get(id)
    }
}

impl TermLookup for HashMap<TermId, Term> {
    fn term(&self, id: &TermId) -> Option<&Term> {
        self.get(id)
    }
}

/// Terms by primary id, with alternate ids resolved to their primary term.
#[derive(Debug, Clone, Default)]
pub struct TermDirectory {
    terms: BTreeMap<TermId, Term>,
    alt_ids: BTreeMap<TermId, TermId>,
}

impl TermDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term and register its alternate ids.
    pub fn insert(&mut self, term: Term) {
        for alt in &term.alt_ids {
            self.alt_ids.insert(alt.clone(), term.id.clone());
        }
        self.terms.insert(term.id.clone(), term);
    }

    /// Resolve a primary or alternate id.
    pub fn get(&self, id: &TermId) -> Option<&Term> {
        self.terms.get(id).or_else(|| {
            self.alt_ids
                .get(id)
                .and_then(|primary| self.terms.get(primary))
        })
    }

    /// Terms ordered by primary id.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermLookup for TermDirectory {
    fn term(&self, id: &TermId) -> Option<&Term> {
        self.get(id)
    }
}

impl FromIterator<Term> for TermDirectory {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut directory = Self::new();
        for term in iter {
            directory.insert(term);
        }
        directory
    }
}

/// Load a term directory from an OBO file.
pub fn load_terms(path: &Path) -> Result<TermDirectory> {
    let file = File::open(path).map_err(|e| StandardsError::file_read(path, e))?;
    let directory = parse_terms(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        terms = directory.len(),
        "Loaded ontology terms"
    );
    Ok(directory)
}

/// Load a term directory from OBO text.
pub fn load_terms_from_str(content: &str) -> Result<TermDirectory> {
    parse_terms(content.as_bytes())
}

/// Parse OBO text from any buffered reader.
pub fn parse_terms<R: BufRead>(reader: R) -> Result<TermDirectory> {
    let mut directory = TermDirectory::new();
    let mut stanza: Option<TermStanza> = None;
    let mut in_term = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| StandardsError::Line {
            line: line_no,
            source,
        })?;
        let line = line.trim();

        if line.starts_with('[') {
            if let Some(finished) = stanza.take() {
                finished.finish(&mut directory);
            }
            in_term = line == "[Term]";
            if in_term {
                stanza = Some(TermStanza::new(line_no));
            }
            continue;
        }

        if !in_term || line.is_empty() || line.starts_with('!') {
            continue;
        }
        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };
        if let Some(current) = stanza.as_mut() {
            current.apply(tag.trim(), value.trim());
        }
    }

    if let Some(finished) = stanza.take() {
        finished.finish(&mut directory);
    }

    Ok(directory)
}

/// Tag values collected for one `[Term]` stanza.
#[derive(Debug, Default)]
struct TermStanza {
    line: usize,
    id: Option<String>,
    name: Option<String>,
    definition: Option<String>,
    alt_ids: Vec<String>,
    obsolete: bool,
}

impl TermStanza {
    fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    fn apply(&mut self, tag: &str, value: &str) {
        match tag {
            "id" => self.id = Some(strip_comment(value).to_string()),
            "name" => self.name = Some(value.to_string()),
            "def" => self.definition = quoted_text(value),
            "alt_id" => self.alt_ids.push(strip_comment(value).to_string()),
            "is_obsolete" => self.obsolete = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    fn finish(self, directory: &mut TermDirectory) {
        let Some(raw_id) = self.id else {
            tracing::warn!(line = self.line, "Term stanza has no id");
            return;
        };
        let id = match TermId::new(raw_id.as_str()) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(line = self.line, %error, "Skipping term stanza");
                return;
            }
        };

        let alt_ids = self
            .alt_ids
            .iter()
            .filter_map(|raw| match TermId::new(raw.as_str()) {
                Ok(alt) => Some(alt),
                Err(error) => {
                    tracing::warn!(term = %id, %error, "Ignoring alternate id");
                    None
                }
            })
            .collect();

        directory.insert(Term {
            name: self.name.unwrap_or_default(),
            definition: self.definition,
            alt_ids,
            obsolete: self.obsolete,
            id,
        });
    }
}

/// Drop a trailing `! comment`.
fn strip_comment(value: &str) -> &str {
    value.split(" !").next().unwrap_or(value).trim()
}

/// Extract the text between the leading quote and the next unescaped quote.
fn quoted_text(value: &str) -> Option<String> {
    let rest = value.strip_prefix('"')?;
    let mut text = String::new();
    let mut chars = rest.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    text.push(escaped);
                }
            }
            '"' => return Some(text),
            _ => text.push(ch),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBO: &str = r#"format-version: 1.2
ontology: hp

[Term]
id: HP:0002153
name: Hyperkalemia
alt_id: HP:0004373
def: "An abnormally increased \"potassium\" concentration in the blood." [HPO:probinson]
is_a: HP:0011042 ! Abnormal blood potassium concentration

[Term]
id: HP:0011042
name: Abnormal blood potassium concentration

[Term]
name: Stanza without id

[Term]
id: HP:0000000
name: Retired term
is_obsolete: true

[Typedef]
id: part_of
name: part of
"#;

    #[test]
    fn test_parse_terms() {
        let directory = load_terms_from_str(OBO).unwrap();
        assert_eq!(directory.len(), 3);

        let hyperkalemia = directory
            .get(&TermId::new("HP:0002153").unwrap())
            .expect("term should be loaded");
        assert_eq!(hyperkalemia.name, "Hyperkalemia");
        assert_eq!(
            hyperkalemia.definition.as_deref(),
            Some("An abnormally increased \"potassium\" concentration in the blood.")
        );
        assert!(!hyperkalemia.obsolete);
    }

    #[test]
    fn test_alt_id_resolves_to_primary() {
        let directory = load_terms_from_str(OBO).unwrap();
        let term = directory
            .get(&TermId::new("HP:0004373").unwrap())
            .expect("alt id should resolve");
        assert_eq!(term.id.as_str(), "HP:0002153");
    }

    #[test]
    fn test_obsolete_flag_and_typedef_ignored() {
        let directory = load_terms_from_str(OBO).unwrap();
        let retired = directory.get(&TermId::new("HP:0000000").unwrap()).unwrap();
        assert!(retired.obsolete);
        assert!(directory.iter().all(|t| t.id.prefix() == "HP"));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("HP:0011042 ! Abnormal"), "HP:0011042");
        assert_eq!(strip_comment("HP:0011042"), "HP:0011042");
    }
}
