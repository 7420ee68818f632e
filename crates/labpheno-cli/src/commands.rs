use std::collections::BTreeSet;

use anyhow::{Context, Result};
use labpheno_cli::cli::{AnnotationsArgs, InferArgs, NormalizeArgs};
use labpheno_cli::summary::{annotation_table, assertion_table, load_summary_table};
use labpheno_inference::rules::load_rules;
use labpheno_model::LoincId;
use labpheno_normalization::Normalizer;
use labpheno_standards::{load_annotations_with_summary, load_terms, paths};
use tracing::{info, info_span};

pub fn run_annotations(args: &AnnotationsArgs) -> Result<()> {
    let terms_path = args.terms.clone().unwrap_or_else(paths::ontology_path);
    let annotations_path = args
        .annotations
        .clone()
        .unwrap_or_else(paths::annotations_path);
    let span = info_span!("annotations", path = %annotations_path.display());
    let _guard = span.enter();

    let terms = load_terms(&terms_path)
        .with_context(|| format!("load terms from {}", terms_path.display()))?;
    info!(terms = terms.len(), "Loaded ontology terms");
    let (table, summary) = load_annotations_with_summary(&annotations_path, &terms)
        .with_context(|| format!("load annotations from {}", annotations_path.display()))?;
    info!(
        records = table.len(),
        mappings = table.mapping_count(),
        skipped = summary.skipped_rows(),
        "Built annotation table"
    );

    match &args.loinc {
        Some(loinc) => {
            let loinc_id = LoincId::new(loinc.as_str()).context("parse --loinc")?;
            let record = table
                .get(&loinc_id)
                .with_context(|| format!("LOINC {loinc_id} is not annotated"))?;
            println!("{}", annotation_table([record]));
        }
        None => println!("{}", annotation_table(&table)),
    }
    println!("{}", load_summary_table(&summary));
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let normalizer = Normalizer::new();
    let pairs = args
        .codings
        .iter()
        .map(|(system, code)| (system.as_str(), code.as_str()));
    let category = normalizer
        .normalize(pairs, args.scale)
        .with_context(|| format!("normalize {} codings", args.codings.len()))?;
    println!("{category}");
    Ok(())
}

pub fn run_infer(args: &InferArgs) -> Result<()> {
    let rules_path = args.rules.clone().unwrap_or_else(paths::rules_path);
    let rules = load_rules(&rules_path)
        .with_context(|| format!("load rules from {}", rules_path.display()))?;
    info!(rules = rules.len(), "Loaded inference rules");

    let given: BTreeSet<_> = args.assertions.iter().cloned().collect();
    let inferred = if args.fixpoint {
        let mut working_set = given.clone();
        rules.saturate(&mut working_set);
        working_set.difference(&given).cloned().collect()
    } else {
        rules.apply(&given)
    };
    info!(given = given.len(), inferred = inferred.len(), "Inference finished");

    println!("{}", assertion_table(&given, &inferred));
    Ok(())
}
