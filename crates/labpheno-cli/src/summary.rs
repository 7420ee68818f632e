//! Table rendering for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use labpheno_model::{AnnotationRecord, TermAssertion};
use labpheno_standards::AnnotationLoadSummary;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One row per (record, category) mapping. Records without mappings still
/// get a row so they remain visible.
pub fn annotation_table<'a>(records: impl IntoIterator<Item = &'a AnnotationRecord>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["LOINC", "Scale", "Category", "Assertion"]);
    apply_table_style(&mut table);
    for record in records {
        if record.is_empty() {
            table.add_row(vec![
                record.loinc_id().to_string(),
                record.scale().to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
            continue;
        }
        for (category, assertion) in record.mappings() {
            table.add_row(vec![
                record.loinc_id().to_string(),
                record.scale().to_string(),
                category.label().to_string(),
                assertion.to_string(),
            ]);
        }
    }
    table
}

pub fn load_summary_table(summary: &AnnotationLoadSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Annotation rows", "Count"]);
    apply_table_style(&mut table);
    let rows = [
        ("Rows read", summary.rows_read),
        ("Header rows", summary.header_rows),
        ("Wrong field count", summary.wrong_field_count),
        ("Invalid UTF-8", summary.invalid_encoding),
        ("Not finalized", summary.not_finalized),
        ("Malformed LOINC", summary.malformed_loinc),
        ("Unknown scale", summary.unknown_scale),
        ("Unknown term", summary.missing_term),
        ("Unknown category", summary.unknown_category),
        ("Overwritten", summary.overwritten),
        ("Mappings added", summary.mappings_added),
    ];
    for (label, count) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn assertion_table<'a>(
    known: impl IntoIterator<Item = &'a TermAssertion>,
    inferred: impl IntoIterator<Item = &'a TermAssertion>,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Assertion", "Source"]);
    apply_table_style(&mut table);
    for assertion in known {
        table.add_row(vec![assertion.to_string(), "given".to_string()]);
    }
    for assertion in inferred {
        table.add_row(vec![assertion.to_string(), "inferred".to_string()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use labpheno_model::{AnnotationDraft, LoincScale, OutcomeCategory, TermId};

    use super::*;

    #[test]
    fn test_annotation_table_rows() {
        let mut draft = AnnotationDraft::new("2823-3".parse().unwrap(), LoincScale::Quantitative);
        draft.add_mapping(
            OutcomeCategory::High,
            TermAssertion::present(TermId::new("HP:0002153").unwrap()),
        );
        let empty = AnnotationDraft::new("6298-4".parse().unwrap(), LoincScale::Ordinal).build();
        let records = [draft.build(), empty];

        let table = annotation_table(&records);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("HP:0002153"));
        assert!(rendered.contains("6298-4"));
    }

    #[test]
    fn test_load_summary_lists_every_counter() {
        let summary = AnnotationLoadSummary {
            rows_read: 4,
            invalid_encoding: 1,
            ..AnnotationLoadSummary::default()
        };
        let table = load_summary_table(&summary);
        assert_eq!(table.row_count(), 11);
        let rendered = table.to_string();
        assert!(rendered.contains("Invalid UTF-8"));
    }
}
