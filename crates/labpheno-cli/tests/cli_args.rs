use clap::Parser;
use labpheno_cli::cli::{Cli, Command, LogFormatArg, parse_coding};
use labpheno_model::LoincScale;

#[test]
fn parses_normalize_codings() {
    let cli = Cli::try_parse_from([
        "labpheno",
        "normalize",
        "--scale",
        "qn",
        "http://hl7.org/fhir/v2/0078|HH",
        "http://hl7.org/fhir/v2/0078|H",
    ])
    .unwrap();

    let Command::Normalize(args) = cli.command else {
        panic!("expected normalize command");
    };
    assert_eq!(args.scale, LoincScale::Quantitative);
    assert_eq!(args.codings.len(), 2);
    assert_eq!(args.codings[0].0, "http://hl7.org/fhir/v2/0078");
    assert_eq!(args.codings[0].1, "HH");
}

#[test]
fn normalize_requires_codings() {
    assert!(Cli::try_parse_from(["labpheno", "normalize", "--scale", "Qn"]).is_err());
}

#[test]
fn rejects_unknown_scale() {
    let result = Cli::try_parse_from(["labpheno", "normalize", "--scale", "Ratio", "s|H"]);
    assert!(result.is_err());
}

#[test]
fn parses_infer_assertions() {
    let cli = Cli::try_parse_from([
        "labpheno",
        "--log-format",
        "json",
        "infer",
        "--fixpoint",
        "HP:0002153",
        "!HP:0011042",
    ])
    .unwrap();

    assert!(matches!(cli.log_format, LogFormatArg::Json));
    let Command::Infer(args) = cli.command else {
        panic!("expected infer command");
    };
    assert!(args.fixpoint);
    assert!(args.rules.is_none());
    assert_eq!(args.assertions.len(), 2);
    assert!(args.assertions[1].is_negated());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "labpheno",
        "annotations",
        "--loinc",
        "2823-3",
        "--log-level",
        "debug",
        "--log-timestamps",
    ])
    .unwrap();
    assert!(cli.log_level.is_some());
    assert!(cli.log_timestamps);
    let Command::Annotations(args) = cli.command else {
        panic!("expected annotations command");
    };
    assert_eq!(args.loinc.as_deref(), Some("2823-3"));
}

#[test]
fn coding_splits_on_last_bar() {
    assert_eq!(
        parse_coding("urn:a|b|POS"),
        Ok(("urn:a|b".to_string(), "POS".to_string()))
    );
    assert!(parse_coding("H").is_err());
    assert!(parse_coding("system|").is_err());
}
