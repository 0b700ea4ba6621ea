use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::model::Dataset;
use super::parse::parse_json_lines;

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;

    let (dataset, report) = parse_json_lines(&raw);
    tracing::info!(
        path = %path.display(),
        entities = report.entities,
        relations = report.relations,
        skipped_lines = report.skipped_lines,
        duplicate_entities = report.duplicate_entities,
        "loaded graph file"
    );

    if dataset.is_empty() {
        return Err(anyhow!(
            "no entity or relation records were found in {}",
            path.display()
        ));
    }

    Ok(dataset)
}
