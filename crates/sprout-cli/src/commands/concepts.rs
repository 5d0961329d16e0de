//! Concepts command - show the heuristic concept flags for a snippet

use anyhow::{Context, Result};
use sprout_runtime::ConceptSet;
use std::fs;

/// Print the concepts a snippet demonstrates
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snippet file: {}", file_path))?;

    let concepts = ConceptSet::detect(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&concepts)?);
        return Ok(());
    }

    if concepts.is_empty() {
        println!("no concepts demonstrated");
    } else {
        for concept in concepts.iter() {
            println!("{:<18} {}", concept.to_string(), concept.describe());
        }
    }

    Ok(())
}
