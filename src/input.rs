use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::scoring::WeightConfig;
use crate::store::{Evaluation, EvaluationStore};

/// Read a list of submissions from a JSON array or a YAML list.
///
/// The format is chosen by extension: `.json` is parsed as JSON, `.yaml` and
/// `.yml` as YAML. Anything else is rejected.
pub fn load_evaluations(path: &Path) -> Result<Vec<Evaluation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read evaluations from {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let evaluations: Vec<Evaluation> = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON evaluations in {}", path.display()))?,
        Some("yaml") | Some("yml") => {
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_saphyr::from_str(&content).with_context(|| {
                    format!("Failed to parse YAML evaluations in {}", path.display())
                })?
            }
        }
        _ => anyhow::bail!(
            "Unsupported input file {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    };

    tracing::debug!(path = %path.display(), count = evaluations.len(), "evaluations loaded");
    Ok(evaluations)
}

/// Submit every evaluation into a fresh session store.
///
/// Stops at the first rejected submission; the error names its 1-based
/// position in the input.
pub fn build_store(evaluations: Vec<Evaluation>, weights: &WeightConfig) -> Result<EvaluationStore> {
    let mut store = EvaluationStore::new();
    for (idx, evaluation) in evaluations.into_iter().enumerate() {
        store
            .submit(evaluation, weights)
            .with_context(|| format!("Evaluation #{} rejected", idx + 1))?;
    }
    Ok(store)
}
