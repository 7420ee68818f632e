//! Compact logs with timestamps. Separate from `logging.rs` because each
//! test binary can install only one global subscriber.

use labpheno_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

#[test]
fn compact_lines_start_with_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labpheno.log");
    let config = LogConfig::default()
        .with_level_filter(LevelFilter::DEBUG)
        .with_env_filter(false)
        .with_timestamps(true)
        .with_format(LogFormat::Compact)
        .with_ansi(false)
        .with_log_file(Some(path.clone()));
    init_logging(&config).unwrap();

    tracing::debug!(target: "labpheno_inference", rules = 2, "Loaded inference rules");

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    assert!(line.starts_with(|c: char| c.is_ascii_digit()), "{line}");
    assert!(line.contains("Loaded inference rules"));
    assert!(line.contains("rules=2"));
}
