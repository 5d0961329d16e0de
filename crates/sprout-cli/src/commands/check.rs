//! Check command - validate a snippet without executing it

use super::engine_for_tier;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

/// Check a snippet file, printing internal diagnostics on failure
pub fn run(file_path: &str, tier: Option<u8>) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snippet file: {}", file_path))?;

    match engine_for_tier(tier).check(&source) {
        Ok(warnings) => {
            for diag in &warnings {
                print!("{}", diag.to_human_string());
            }
            if warnings.is_empty() {
                println!("{}: no problems found", file_path.green());
            } else {
                println!("{}: {} warning(s)", file_path.yellow(), warnings.len());
            }
            Ok(())
        }
        Err(err) => {
            for diag in err.diagnostics() {
                eprint!("{}", diag.to_human_string());
            }
            Err(anyhow::anyhow!("check failed"))
        }
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
    fn test_check_passes_clean_snippet() {
        let file = snippet_file("def f(x):\n    return x\n");
        assert!(run(file.path().to_str().unwrap(), None).is_ok());
    }

    #[test]
    fn test_check_does_not_execute() {
        // Undefined variable is a runtime failure, so checking succeeds
        let file = snippet_file("print(ghost)\n");
        assert!(run(file.path().to_str().unwrap(), None).is_ok());
    }

    #[test]
    fn test_check_passes_snippet_with_warnings() {
        let file = snippet_file("def f(x):\n    return x\n    print(x)\n");
        assert!(run(file.path().to_str().unwrap(), None).is_ok());
    }

    #[test]
    fn test_check_reports_locked_construct() {
        let file = snippet_file("for n in [1]:\n    print(n)\n");
        assert!(run(file.path().to_str().unwrap(), Some(0)).is_err());
    }
}
