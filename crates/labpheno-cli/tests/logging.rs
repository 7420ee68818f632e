//! Logging setup. Installs the global subscriber, so this file holds a
//! single test.

use labpheno_cli::logging::{LogConfig, LogFormat, default_directives, init_logging};
use tracing::level_filters::LevelFilter;

#[test]
fn json_logs_go_to_file_at_configured_level() {
    insta::assert_snapshot!(
        default_directives(LevelFilter::INFO),
        @"warn,labpheno=info,labpheno_cli=info,labpheno_inference=info,labpheno_model=info,labpheno_normalization=info,labpheno_standards=info"
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labpheno.log");
    let config = LogConfig::default()
        .with_level_filter(LevelFilter::INFO)
        .with_env_filter(false)
        .with_format(LogFormat::Json)
        .with_ansi(false)
        .with_log_file(Some(path.clone()));
    init_logging(&config).unwrap();

    tracing::info!(target: "labpheno_standards", records = 3, "Built annotation table");
    tracing::debug!(target: "labpheno_standards", "Skipping annotation header row");
    tracing::info!(target: "other_crate", "Not ours");

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1, "{contents}");
    assert!(lines[0].contains("Built annotation table"));
    assert!(lines[0].contains("\"records\":3"));
}
