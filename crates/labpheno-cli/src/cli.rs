//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use labpheno_inference::rules::parse_assertion;
use labpheno_model::{LoincScale, TermAssertion};

#[derive(Parser)]
#[command(
    name = "labpheno",
    version,
    about = "Translate coded lab results into phenotype term assertions",
    long_about = "Translate coded lab results into phenotype term assertions.\n\n\
                  Loads the LOINC annotation table, normalizes HL7 interpretation codes,\n\
                  and applies inference rules over the resulting assertions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the annotation table and print its mappings.
    Annotations(AnnotationsArgs),

    /// Normalize interpretation codes for one result.
    Normalize(NormalizeArgs),

    /// Apply inference rules to a set of assertions.
    Infer(InferArgs),
}

#[derive(Args)]
pub struct AnnotationsArgs {
    /// Annotation table (default: <data>/loinc2hpo-annotations.tsv).
    #[arg(long = "annotations", value_name = "PATH")]
    pub annotations: Option<PathBuf>,

    /// Ontology OBO file (default: <data>/hp.obo).
    #[arg(long = "terms", value_name = "PATH")]
    pub terms: Option<PathBuf>,

    /// Only show this LOINC code.
    #[arg(long = "loinc", value_name = "ID")]
    pub loinc: Option<String>,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// LOINC scale of the test (Qn, Ord, OrdQn, Nom, ...).
    #[arg(long = "scale", value_parser = parse_scale)]
    pub scale: LoincScale,

    /// Codings as SYSTEM|CODE.
    #[arg(value_name = "SYSTEM|CODE", required = true, value_parser = parse_coding)]
    pub codings: Vec<(String, String)>,
}

#[derive(Args)]
pub struct InferArgs {
    /// Rule file (default: <data>/inference-rules.tsv).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Repeat passes until nothing new is inferred.
    #[arg(long = "fixpoint")]
    pub fixpoint: bool,

    /// Known assertions, e.g. HP:0002153 or !HP:0011042.
    #[arg(value_name = "ASSERTION", value_parser = parse_assertion)]
    pub assertions: Vec<TermAssertion>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_scale(value: &str) -> Result<LoincScale, String> {
    value.parse().map_err(|error: labpheno_model::ModelError| error.to_string())
}

/// Split `SYSTEM|CODE` at the last `|`.
pub fn parse_coding(value: &str) -> Result<(String, String), String> {
    match value.rsplit_once('|') {
        Some((system, code)) if !system.trim().is_empty() && !code.trim().is_empty() => {
            Ok((system.trim().to_string(), code.trim().to_string()))
        }
        _ => Err(format!("expected SYSTEM|CODE, got '{value}'")),
    }
}
