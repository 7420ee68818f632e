//! LOINC annotation table loading.
//!
//! Builds an [`AnnotationTable`] from the tab-separated annotation dataset.
//!
//! # Row layout
//!
//! Every data row has exactly 13 tab-separated fields. The ones read here:
//!
//! | index | content                                   |
//! |-------|-------------------------------------------|
//! | 0     | LOINC code (`loincId` on the header row)  |
//! | 1     | LOINC scale (`Qn`, `Ord`, `Nom` ...)      |
//! | 3     | internal outcome code (`L`, `N`, `H` ...) |
//! | 4     | term id (`HP:0002153`)                    |
//! | 5     | negation flag (`true` / `false`)          |
//! | 11    | finalized flag (`true` / `false`)         |
//!
//! # Row-level defects
//!
//! Defects in a single row never abort the load. Rows with the wrong field
//! count, unfinalized rows, malformed LOINC codes, and unknown scales are
//! skipped. Unknown or unresolvable terms and unknown outcome codes drop
//! only that category entry; the record for the LOINC code is kept. A later
//! row for a category that is already mapped replaces the earlier mapping.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::ops::Range;
use std::path::Path;

use labpheno_model::{
    AnnotationDraft, AnnotationTable, LoincId, LoincScale, OutcomeCategory, TermAssertion, TermId,
};

use crate::error::{Result, StandardsError};
use crate::ontology::TermLookup;

/// Number of fields in every annotation row.
pub const ANNOTATION_FIELD_COUNT: usize = 13;

/// Value of field 0 on the header row.
pub const HEADER_MARKER: &str = "loincId";

const IDX_LOINC: usize = 0;
const IDX_SCALE: usize = 1;
const IDX_CODE: usize = 3;
const IDX_TERM: usize = 4;
const IDX_NEGATED: usize = 5;
const IDX_FINALIZED: usize = 11;

/// Fields whose text the table reads.
const USED_FIELDS: [usize; 6] = [
    IDX_LOINC,
    IDX_SCALE,
    IDX_CODE,
    IDX_TERM,
    IDX_NEGATED,
    IDX_FINALIZED,
];

/// Counters describing what happened to each row of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationLoadSummary {
    /// Rows seen, including headers and skipped rows.
    pub rows_read: usize,
    pub header_rows: usize,
    pub wrong_field_count: usize,
    pub not_finalized: usize,
    pub malformed_loinc: usize,
    pub unknown_scale: usize,
    /// Rows with bytes that are not UTF-8 in a field the table reads.
    pub invalid_encoding: usize,
    /// Entries dropped because the term is malformed or not in the ontology.
    pub missing_term: usize,
    pub unknown_category: usize,
    /// Entries that replaced a different assertion for the same category.
    pub overwritten: usize,
    /// Category entries stored (including overwrites).
    pub mappings_added: usize,
}

impl AnnotationLoadSummary {
    /// Rows skipped entirely.
    pub fn skipped_rows(&self) -> usize {
        self.wrong_field_count
            + self.not_finalized
            + self.malformed_loinc
            + self.unknown_scale
            + self.invalid_encoding
    }

    /// Category entries dropped from otherwise valid rows.
    pub fn dropped_entries(&self) -> usize {
        self.missing_term + self.unknown_category
    }
}

/// Accumulates annotation rows into drafts and freezes them into a table.
pub struct AnnotationTableBuilder<'a, T: TermLookup + ?Sized> {
    terms: &'a T,
    drafts: Vec<AnnotationDraft>,
    index: HashMap<LoincId, usize>,
    summary: AnnotationLoadSummary,
}

impl<'a, T: TermLookup + ?Sized> AnnotationTableBuilder<'a, T> {
    /// Create a builder that validates term ids against `terms`.
    pub fn new(terms: &'a T) -> Self {
        Self {
            terms,
            drafts: Vec::new(),
            index: HashMap::new(),
            summary: AnnotationLoadSummary::default(),
        }
    }

    /// Process one row. `line` is only used for diagnostics.
    pub fn push_row(&mut self, line: u64, fields: &[&str]) {
        self.summary.rows_read += 1;

        if fields.len() != ANNOTATION_FIELD_COUNT {
            tracing::warn!(
                line,
                fields = fields.len(),
                expected = ANNOTATION_FIELD_COUNT,
                "Annotation row has wrong field count"
            );
            self.summary.wrong_field_count += 1;
            return;
        }
        if fields[IDX_LOINC].trim() == HEADER_MARKER {
            tracing::debug!(line, "Skipping annotation header row");
            self.summary.header_rows += 1;
            return;
        }
        if !parse_flag(fields[IDX_FINALIZED]) {
            self.summary.not_finalized += 1;
            return;
        }

        let loinc_id = match LoincId::new(fields[IDX_LOINC]) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(line, %error, "Skipping annotation row");
                self.summary.malformed_loinc += 1;
                return;
            }
        };
        let scale = match fields[IDX_SCALE].parse::<LoincScale>() {
            Ok(scale) => scale,
            Err(error) => {
                tracing::warn!(line, loinc = %loinc_id, %error, "Skipping annotation row");
                self.summary.unknown_scale += 1;
                return;
            }
        };

        let position = self.draft_position(loinc_id, scale);
        let loinc_id = self.drafts[position].loinc_id().clone();

        let category = match fields[IDX_CODE].parse::<OutcomeCategory>() {
            Ok(category) => category,
            Err(error) => {
                tracing::warn!(line, loinc = %loinc_id, %error, "Dropping annotation entry");
                self.summary.unknown_category += 1;
                return;
            }
        };
        let Some(term) = self.resolve_term(line, &loinc_id, fields[IDX_TERM]) else {
            self.summary.missing_term += 1;
            return;
        };

        let assertion = TermAssertion::new(term, parse_flag(fields[IDX_NEGATED]));
        let draft = &mut self.drafts[position];
        if let Some(previous) = draft.add_mapping(category, assertion.clone())
            && previous != assertion
        {
            tracing::warn!(
                line,
                loinc = %loinc_id,
                category = %category,
                previous = %previous,
                replacement = %assertion,
                "Annotation entry overwritten by a later row"
            );
            self.summary.overwritten += 1;
        }
        self.summary.mappings_added += 1;
    }

    /// Count each line in `lines` as an empty row.
    pub fn push_blank_lines(&mut self, lines: Range<u64>) {
        for line in lines {
            self.push_row(line, &[""]);
        }
    }

    /// Process one raw row, decoding each field as UTF-8.
    pub fn push_byte_row(&mut self, line: u64, record: &csv::ByteRecord) {
        if record.len() == ANNOTATION_FIELD_COUNT
            && let Some(index) = first_undecodable_field(record)
        {
            tracing::warn!(line, field = index, "Skipping annotation row with invalid UTF-8");
            self.summary.rows_read += 1;
            self.summary.invalid_encoding += 1;
            return;
        }
        let decoded: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        let fields: Vec<&str> = decoded.iter().map(|field| &**field).collect();
        self.push_row(line, &fields);
    }

    /// Index of the draft for `loinc_id`, creating it with `scale` if needed.
    fn draft_position(&mut self, loinc_id: LoincId, scale: LoincScale) -> usize {
        if let Some(&position) = self.index.get(&loinc_id) {
            let existing = self.drafts[position].scale();
            if existing != scale {
                tracing::debug!(
                    loinc = %loinc_id,
                    kept = %existing,
                    ignored = %scale,
                    "Scale differs from the first row for this code"
                );
            }
            return position;
        }
        let position = self.drafts.len();
        self.index.insert(loinc_id.clone(), position);
        self.drafts.push(AnnotationDraft::new(loinc_id, scale));
        position
    }

    /// Primary id of the referenced term, if it parses and is loaded.
    fn resolve_term(&self, line: u64, loinc_id: &LoincId, raw: &str) -> Option<TermId> {
        let id = match TermId::new(raw) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(line, loinc = %loinc_id, %error, "Dropping annotation entry");
                return None;
            }
        };
        match self.terms.term(&id) {
            Some(term) => Some(term.id.clone()),
            None => {
                tracing::warn!(
                    line,
                    loinc = %loinc_id,
                    term = %id,
                    "Term not found in ontology; dropping annotation entry"
                );
                None
            }
        }
    }

    pub fn summary(&self) -> &AnnotationLoadSummary {
        &self.summary
    }

    /// Freeze every draft and return the table with the load summary.
    pub fn finish(self) -> (AnnotationTable, AnnotationLoadSummary) {
        let records = self.drafts.into_iter().map(AnnotationDraft::build);
        let table = AnnotationTable::from_records(records);
        (table, self.summary)
    }
}

/// Parse annotation rows from `reader`.
pub fn parse_annotations<R, T>(reader: R, terms: &T) -> Result<AnnotationTable>
where
    R: Read,
    T: TermLookup + ?Sized,
{
    parse_annotations_with_summary(reader, terms).map(|(table, _)| table)
}

/// Parse annotation rows from `reader`, also returning per-reason counters.
///
/// Bytes that are not valid UTF-8 are tolerated in fields the table does
/// not read. A row with such bytes in a field it does read is skipped.
/// Blank lines count as rows with the wrong field count.
pub fn parse_annotations_with_summary<R, T>(
    reader: R,
    terms: &T,
) -> Result<(AnnotationTable, AnnotationLoadSummary)>
where
    R: Read,
    T: TermLookup + ?Sized,
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(InputEndTracker::new(reader));

    let mut builder = AnnotationTableBuilder::new(terms);
    let mut record = csv::ByteRecord::new();
    // First line not yet accounted for. The csv reader drops empty lines,
    // so any gap before a row's line is blank lines.
    let mut next_line = reader.position().line();
    while reader.read_byte_record(&mut record)? {
        let end_line = reader.position().line();
        let row_line = if reader.get_ref().ended_without_newline() {
            end_line
        } else {
            end_line.saturating_sub(1)
        }
        .max(next_line);
        builder.push_blank_lines(next_line..row_line);
        builder.push_byte_row(row_line, &record);
        next_line = row_line + 1;
    }
    let end_line = reader.position().line();
    if !reader.get_ref().ended_without_newline() {
        builder.push_blank_lines(next_line..end_line);
    }

    let (table, summary) = builder.finish();
    tracing::debug!(
        records = table.len(),
        mappings = table.mapping_count(),
        skipped_rows = summary.skipped_rows(),
        dropped_entries = summary.dropped_entries(),
        overwritten = summary.overwritten,
        "Built annotation table"
    );
    Ok((table, summary))
}

/// Remembers how the underlying input ended.
///
/// Only meaningful once the input is exhausted; before that
/// [`ended_without_newline`](Self::ended_without_newline) is false.
struct InputEndTracker<R> {
    inner: R,
    last_byte: Option<u8>,
    exhausted: bool,
}

impl<R> InputEndTracker<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            last_byte: None,
            exhausted: false,
        }
    }

    /// The input is exhausted and its final line has no terminator.
    fn ended_without_newline(&self) -> bool {
        self.exhausted && self.last_byte.is_some_and(|byte| byte != b'\n')
    }
}

impl<R: Read> Read for InputEndTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        match read.checked_sub(1).and_then(|last| buf.get(last)) {
            Some(&byte) => self.last_byte = Some(byte),
            None if !buf.is_empty() => self.exhausted = true,
            None => {}
        }
        Ok(read)
    }
}

/// Load the annotation table from a file.
pub fn load_annotations<T>(path: &Path, terms: &T) -> Result<AnnotationTable>
where
    T: TermLookup + ?Sized,
{
    load_annotations_with_summary(path, terms).map(|(table, _)| table)
}

/// Load the annotation table from a file, also returning per-reason counters.
pub fn load_annotations_with_summary<T>(
    path: &Path,
    terms: &T,
) -> Result<(AnnotationTable, AnnotationLoadSummary)>
where
    T: TermLookup + ?Sized,
{
    let file = File::open(path).map_err(|e| StandardsError::file_read(path, e))?;
    parse_annotations_with_summary(file, terms)
}

/// Load the annotation table from in-memory text.
pub fn load_annotations_from_str<T>(content: &str, terms: &T) -> Result<AnnotationTable>
where
    T: TermLookup + ?Sized,
{
    parse_annotations(content.as_bytes(), terms)
}

/// First read field of `record` that is not valid UTF-8.
fn first_undecodable_field(record: &csv::ByteRecord) -> Option<usize> {
    USED_FIELDS.into_iter().find(|&index| {
        record
            .get(index)
            .is_some_and(|field| str::from_utf8(field).is_err())
    })
}

/// `true` (any case) is true; everything else is false.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use labpheno_model::Term;
    use std::collections::BTreeMap;

    fn terms() -> BTreeMap<TermId, Term> {
        ["HP:0002153", "HP:0002900", "HP:0011042"]
            .into_iter()
            .map(|id| {
                let id = TermId::new(id).unwrap();
                (id.clone(), Term::new(id, "term"))
            })
            .collect()
    }

    fn row(loinc: &str, scale: &str, code: &str, term: &str, negated: &str, done: &str) -> String {
        [
            loinc, scale, "", code, term, negated, "", "", "", "", "", done, "",
        ]
        .join("\t")
    }

    #[test]
    fn test_builder_skips_header_and_counts() {
        let terms = terms();
        let mut builder = AnnotationTableBuilder::new(&terms);
        let header = [
            "loincId", "loincScale", "system", "code", "hpoTermId", "isNegated", "createdOn",
            "createdBy", "lastEditedOn", "lastEditedBy", "version", "isFinalized", "comment",
        ];
        builder.push_row(1, &header);
        let data = row("2823-3", "Qn", "H", "HP:0002153", "false", "true");
        let fields: Vec<&str> = data.split('\t').collect();
        builder.push_row(2, &fields);

        let (table, summary) = builder.finish();
        assert_eq!(summary.header_rows, 1);
        assert_eq!(summary.mappings_added, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_category_keeps_record() {
        let content = row("2823-3", "Qn", "HH", "HP:0002153", "false", "true");
        let (table, summary) =
            parse_annotations_with_summary(content.as_bytes(), &terms()).unwrap();
        assert_eq!(summary.unknown_category, 1);
        let record = table.get(&LoincId::new("2823-3").unwrap()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
