//! End-to-end run over the bundled reference data.

use std::collections::BTreeSet;
use std::path::PathBuf;

use labpheno_inference::rules::load_rules;
use labpheno_model::{
    CodeableConcept, Coding, LOINC_SYSTEM, LoincId, Observation, ObservationComponent,
    TermAssertion, TermId,
};
use labpheno_normalization::{AnnotationResolver, HL7_V2_0078_SYSTEM};
use labpheno_standards::{
    ANNOTATIONS_FILE, ONTOLOGY_FILE, RULES_FILE, load_annotations_with_summary, load_terms,
};

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(name)
}

fn hp(id: &str) -> TermAssertion {
    TermAssertion::present(TermId::new(id).unwrap())
}

fn interpretation(code: &str) -> Option<CodeableConcept> {
    Some(CodeableConcept::new(vec![Coding::new(HL7_V2_0078_SYSTEM, code)]))
}

#[test]
fn bundled_annotations_load_cleanly() {
    let terms = load_terms(&data_file(ONTOLOGY_FILE)).unwrap();
    let (table, summary) =
        load_annotations_with_summary(&data_file(ANNOTATIONS_FILE), &terms).unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(summary.header_rows, 1);
    assert_eq!(summary.not_finalized, 1);
    assert_eq!(summary.missing_term, 0);
    assert!(table.contains(&LoincId::new("14600-1").unwrap()));
}

#[test]
fn observation_to_inferred_phenotypes() {
    let terms = load_terms(&data_file(ONTOLOGY_FILE)).unwrap();
    let (table, _) = load_annotations_with_summary(&data_file(ANNOTATIONS_FILE), &terms).unwrap();
    let rules = load_rules(&data_file(RULES_FILE)).unwrap();
    let resolver = AnnotationResolver::new(&table);

    let observation = Observation {
        id: "panel-1".to_string(),
        code: CodeableConcept::new(vec![Coding::new(LOINC_SYSTEM, "2823-3")]),
        interpretation: interpretation("HH"),
        components: vec![ObservationComponent {
            code: CodeableConcept::new(vec![Coding::new(LOINC_SYSTEM, "2345-7")]),
            interpretation: interpretation("L"),
        }],
        effective: None,
    };

    let outcome = resolver.resolve_observation(&observation);
    assert!(!outcome.has_failures());
    let expected: BTreeSet<_> = [hp("HP:0002153"), hp("HP:0001943")].into_iter().collect();
    assert_eq!(outcome.assertions, expected);

    let mut working_set = outcome.assertions;
    let added = rules.saturate(&mut working_set);
    assert_eq!(added, 3);
    assert!(working_set.contains(&hp("HP:0011042")));
    assert!(working_set.contains(&hp("HP:0011015")));
    assert!(working_set.contains(&hp("HP:0001939")));
}
