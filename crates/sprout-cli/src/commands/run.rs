//! Run command - interpret a snippet file

use super::engine_for_tier;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

/// Run a snippet file and print its output (or the learner-facing error)
pub fn run(file_path: &str, json: bool, tier: Option<u8>) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snippet file: {}", file_path))?;

    let report = engine_for_tier(tier).run(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
        return match report.output {
            Ok(_) => Ok(()),
            Err(_) => Err(anyhow::anyhow!("snippet failed")),
        };
    }

    match report.output {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.message().red());
            Err(anyhow::anyhow!("snippet failed"))
        }
    }
}

/// Shape the report for `--json` output
fn report_json(report: &sprout_runtime::RunReport) -> serde_json::Value {
    let concepts: Vec<String> = report.concepts.iter().map(|c| c.to_string()).collect();

    match &report.output {
        Ok(lines) => serde_json::json!({
            "ok": true,
            "output": lines,
            "concepts": concepts,
        }),
        Err(err) => serde_json::json!({
            "ok": false,
            "error": err.message(),
            "diagnostics": err.diagnostics(),
            "concepts": concepts,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snippet_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_valid_snippet() {
        let file = snippet_file("print('hi')\n");
        assert!(run(file.path().to_str().unwrap(), false, None).is_ok());
    }

    #[test]
    fn test_run_broken_snippet_fails() {
        let file = snippet_file("x = = 1\n");
        assert!(run(file.path().to_str().unwrap(), false, None).is_err());
    }

    #[test]
    fn test_run_missing_file_fails() {
        assert!(run("/no/such/file.spr", false, None).is_err());
    }

    #[test]
    fn test_tier_gates_run() {
        let file = snippet_file("if 1 == 1:\n    print('x')\n");
        assert!(run(file.path().to_str().unwrap(), false, Some(0)).is_err());
        assert!(run(file.path().to_str().unwrap(), false, Some(2)).is_ok());
    }

    #[test]
    fn test_json_report_shape() {
        let report = sprout_runtime::Engine::new().run("print('a')\n");
        let value = report_json(&report);
        assert_eq!(value["ok"], true);
        assert_eq!(value["output"][0], "a");
    }
}
