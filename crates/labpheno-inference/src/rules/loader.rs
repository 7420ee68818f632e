//! TSV loader for inference rules.
//!
//! One rule per line, four tab-separated fields:
//!
//! ```text
//! kind  h1          h2              h3
//! AND   HP:0002153  HP:0002900      HP:0011042
//! OR    HP:0001943  NOT HP:0003074  HP:0011015
//! ```
//!
//! `kind` is `AND` or `OR` (any case). Assertions are term ids, negated
//! with a `!` or `NOT ` prefix. Lines starting with `#` and blank lines are
//! ignored, and a line whose first field is `kind` is a header.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use labpheno_model::{TermAssertion, TermId};

use crate::engine::RuleSet;
use crate::error::{Result, RuleFileError};
use crate::rule::InferenceRule;

/// Fields per rule line.
pub const RULE_FIELD_COUNT: usize = 4;

const HEADER_MARKER: &str = "kind";

/// Load rules from a file.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let file = File::open(path).map_err(|source| RuleFileError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(file)?;
    tracing::debug!(path = %path.display(), rules = rules.len(), "Loaded inference rules");
    Ok(rules)
}

pub fn load_rules_from_str(content: &str) -> Result<RuleSet> {
    parse_rules(content.as_bytes())
}

/// Parse rules from a reader. Any malformed line fails the whole load.
pub fn parse_rules<R: Read>(reader: R) -> Result<RuleSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rules = RuleSet::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let fields: Vec<&str> = record.iter().map(str::trim).collect();

        if fields.iter().all(|field| field.is_empty()) {
            continue;
        }
        if fields[0].eq_ignore_ascii_case(HEADER_MARKER) {
            tracing::debug!(line, "Skipping rule file header");
            continue;
        }

        let rule = parse_rule(&fields).map_err(|message| RuleFileError::InvalidRule {
            line,
            message,
        })?;
        rules.push(rule);
    }
    Ok(rules)
}

/// Parse one rule from its fields.
pub fn parse_rule(fields: &[&str]) -> std::result::Result<InferenceRule, String> {
    let [kind, h1, h2, h3] = fields else {
        return Err(format!(
            "expected {RULE_FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    };
    let h1 = parse_assertion(h1)?;
    let h2 = parse_assertion(h2)?;
    let h3 = parse_assertion(h3)?;
    match kind.trim().to_uppercase().as_str() {
        "AND" => Ok(InferenceRule::and(h1, h2, h3)),
        "OR" => Ok(InferenceRule::or(h1, h2, h3)),
        other => Err(format!("unknown rule kind '{other}'")),
    }
}

/// Parse one assertion, e.g. `HP:0002153`, `!HP:0002153` or `NOT HP:0002153`.
pub fn parse_assertion(value: &str) -> std::result::Result<TermAssertion, String> {
    let value = value.trim();
    let (negated, id) = if let Some(rest) = value.strip_prefix('!') {
        (true, rest)
    } else if let Some(rest) = value.strip_prefix("NOT ") {
        (true, rest)
    } else {
        (false, value)
    };
    let term = TermId::new(id.trim()).map_err(|error| error.to_string())?;
    Ok(TermAssertion::new(term, negated))
}
