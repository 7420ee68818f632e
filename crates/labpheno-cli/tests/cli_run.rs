//! Runs the `labpheno` binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

fn labpheno(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_labpheno"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn data_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(name)
        .display()
        .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn normalize_prints_category() {
    let output = labpheno(&[
        "normalize",
        "--scale",
        "Qn",
        "http://hl7.org/fhir/v2/0078|HH",
        "http://hl7.org/fhir/v2/0078|H",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "High");
}

#[test]
fn normalize_conflict_exits_with_error() {
    let output = labpheno(&[
        "normalize",
        "--scale",
        "Qn",
        "http://hl7.org/fhir/v2/0078|LL",
        "http://hl7.org/fhir/v2/0078|HH",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("conflicting interpretation codes"), "{stderr}");
}

#[test]
fn annotations_lists_one_code() {
    let annotations = data_file("loinc2hpo-annotations.tsv");
    let terms = data_file("hp.obo");
    let output = labpheno(&[
        "annotations",
        "--annotations",
        &annotations,
        "--terms",
        &terms,
        "--loinc",
        "2823-3",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("HP:0002153"));
    assert!(text.contains("NOT HP:0011042"));
    assert!(!text.contains("HP:0003074"));
}

#[test]
fn infer_with_fixpoint_reads_rule_file() {
    let mut rules = tempfile::NamedTempFile::new().unwrap();
    writeln!(rules, "OR\tHP:0002153\tHP:0002900\tHP:0011042").unwrap();
    writeln!(rules, "AND\tHP:0011042\tHP:0003074\tHP:0001939").unwrap();
    let rules_path = rules.path().display().to_string();

    let single = labpheno(&["infer", "--rules", &rules_path, "HP:0002153", "HP:0003074"]);
    assert!(single.status.success());
    assert!(stdout(&single).contains("HP:0011042"));
    assert!(!stdout(&single).contains("HP:0001939"));

    let fixpoint = labpheno(&[
        "infer",
        "--rules",
        &rules_path,
        "--fixpoint",
        "HP:0002153",
        "HP:0003074",
    ]);
    assert!(fixpoint.status.success());
    assert!(stdout(&fixpoint).contains("HP:0001939"));
}

#[test]
fn infer_with_missing_rule_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.tsv").display().to_string();
    let output = labpheno(&["infer", "--rules", &missing, "HP:0002153"]);
    assert_eq!(output.status.code(), Some(1));
}
