//! Play command - drive one lesson end to end
//!
//! Non-interactive walkthrough: run the starter snippet under the lesson's
//! capability tier, show the challenge checklist, answer the quiz with the
//! answer key, and grant the reward.

use anyhow::{Context, Result};
use colored::Colorize;
use sprout_lessons::{load_dir, MemoryProgress, Progress, QuizFlow, QuizState};
use sprout_runtime::Engine;
use std::path::Path;

/// Play a lesson from the given directory
pub fn run(dir: &str, lesson_id: u32) -> Result<()> {
    let lessons = load_dir(Path::new(dir))
        .with_context(|| format!("Failed to load lessons from: {}", dir))?;

    let lesson = lessons
        .iter()
        .find(|l| l.id == lesson_id)
        .with_context(|| format!("No lesson with id {} in {}", lesson_id, dir))?;

    println!("{}", format!("Lesson {}: {}", lesson.id, lesson.title).bold());
    if !lesson.blurb.is_empty() {
        println!("{}\n", lesson.blurb);
    }

    // Run the starter snippet under the lesson's tier
    let engine = Engine::new().with_capabilities(lesson.capabilities());
    let report = engine.run(&lesson.starter);

    println!("{}", "--- run ---".dimmed());
    match &report.output {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(err) => println!("{}", err.message().red()),
    }

    // Challenge checklist
    if !lesson.challenges.is_empty() {
        println!("\n{}", "--- challenges ---".dimmed());
        for status in lesson.check_challenges(&report.concepts) {
            let mark = if status.met {
                "x".green()
            } else {
                " ".normal()
            };
            println!("[{}] {}", mark, status.text);
        }
    }

    // Quiz, answered with the key
    let mut flow = QuizFlow::new(lesson);
    flow.begin();
    if !lesson.quiz.is_empty() {
        println!("\n{}", "--- quiz ---".dimmed());
        while let QuizState::Question(i) = flow.state() {
            let question = &lesson.quiz[i];
            println!("{}", question.prompt);
            println!("  -> {}", question.choices[question.correct].green());
            flow.answer(question.correct);
        }
    }

    // Grant
    let mut progress = MemoryProgress::new();
    if flow.grant(&mut progress, 0) {
        println!(
            "\n{} {} xp, {} coins ({} stars)",
            "earned:".bold(),
            progress.xp(),
            progress.coins(),
            flow.stars()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lesson_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let content = r#"
id = 1
title = "Hello Functions"
tier = 0
starter = "def hello():\n    print('hi')\n\nhello()\n"

[[challenges]]
text = "Define a function"
concept = "defines-function"

[[quiz]]
prompt = "What keyword defines a function?"
choices = ["def", "fun"]
correct = 0

[reward]
xp = 30
coins = 5
"#;
        fs::write(dir.path().join("hello.toml"), content).unwrap();
        dir
    }

    #[test]
    fn test_play_full_lesson() {
        let dir = lesson_dir();
        assert!(run(dir.path().to_str().unwrap(), 1).is_ok());
    }

    #[test]
    fn test_play_unknown_lesson_fails() {
        let dir = lesson_dir();
        assert!(run(dir.path().to_str().unwrap(), 99).is_err());
    }
}
