//! Lessons command - list the lessons in a directory

use anyhow::{Context, Result};
use colored::Colorize;
use sprout_lessons::load_dir;
use std::path::Path;

/// List lessons with tier, challenge count, and reward
pub fn run(dir: &str) -> Result<()> {
    let lessons = load_dir(Path::new(dir))
        .with_context(|| format!("Failed to load lessons from: {}", dir))?;

    if lessons.is_empty() {
        println!("no lessons found in {}", dir);
        return Ok(());
    }

    for lesson in &lessons {
        println!(
            "{:>3}  {}  (tier {}, {} challenges, {} questions, {} xp / {} coins)",
            lesson.id,
            lesson.title.bold(),
            lesson.tier,
            lesson.challenges.len(),
            lesson.quiz.len(),
            lesson.reward.xp,
            lesson.reward.coins,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_lessons() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.toml"), "id = 1\ntitle = \"First\"\n").unwrap();
        assert!(run(dir.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_missing_directory_fails() {
        assert!(run("/no/such/lessons").is_err());
    }
}
