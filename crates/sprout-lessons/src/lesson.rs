//! Lesson definitions (lesson TOML files)
//!
//! A lesson bundles the narrative blurb, the capability tier, a starter
//! snippet for the code box, the challenge checklist, the quiz that gates
//! progression, and the reward granted on quiz success.

use crate::{LessonError, LessonResult};
use serde::{Deserialize, Serialize};
use sprout_runtime::{Capabilities, Concept, ConceptSet};
use std::path::Path;

/// One lesson, as stored in a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Lesson {
    /// Lesson id; lessons are ordered by id
    pub id: u32,

    /// Display title
    pub title: String,

    /// Narrative blurb shown above the code box
    #[serde(default)]
    pub blurb: String,

    /// Capability tier unlocked for this lesson (0 = starter)
    #[serde(default)]
    pub tier: u8,

    /// Snippet preloaded into the code box
    #[serde(default)]
    pub starter: String,

    /// Challenge checklist
    #[serde(default)]
    pub challenges: Vec<Challenge>,

    /// Quiz questions, asked in order
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,

    /// Reward granted once the quiz is passed
    #[serde(default)]
    pub reward: Reward,
}

/// One checklist entry: display text plus the concept that lights it up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Challenge {
    /// Display text
    pub text: String,

    /// Concept flag that satisfies this challenge
    pub concept: Concept,
}

/// A multiple-choice quiz question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QuizQuestion {
    /// Question prompt
    pub prompt: String,

    /// Answer choices
    pub choices: Vec<String>,

    /// Index of the correct choice
    pub correct: usize,
}

/// XP and coins granted on completion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Reward {
    pub xp: u32,
    pub coins: u32,
}

/// A challenge paired with whether the latest run satisfied it
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeStatus {
    pub text: String,
    pub concept: Concept,
    pub met: bool,
}

impl Lesson {
    /// The capability set this lesson unlocks
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::tier(self.tier)
    }

    /// Match a run's concept flags against the checklist
    pub fn check_challenges(&self, concepts: &ConceptSet) -> Vec<ChallengeStatus> {
        self.challenges
            .iter()
            .map(|c| ChallengeStatus {
                text: c.text.clone(),
                concept: c.concept,
                met: concepts.contains(c.concept),
            })
            .collect()
    }

    /// Validate internal consistency after deserialization
    pub fn validate(&self, file: &Path) -> LessonResult<()> {
        let invalid = |reason: String| LessonError::ValidationError {
            file: file.to_path_buf(),
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title must not be empty".to_string()));
        }

        for (i, question) in self.quiz.iter().enumerate() {
            if question.choices.len() < 2 {
                return Err(invalid(format!(
                    "quiz question {} needs at least 2 choices",
                    i + 1
                )));
            }
            if question.correct >= question.choices.len() {
                return Err(invalid(format!(
                    "quiz question {} marks choice {} correct but only has {} choices",
                    i + 1,
                    question.correct,
                    question.choices.len()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sprout_runtime::Engine;
    use std::path::PathBuf;

    fn sample_lesson() -> Lesson {
        toml::from_str(
            r#"
id = 3
title = "Return of the Value"
blurb = "Functions can hand a result back."
tier = 1
starter = "def double(n):\n    return n * 2\n\nprint(double(4))\n"

[[challenges]]
text = "Define a function"
concept = "defines-function"

[[challenges]]
text = "Return a value"
concept = "returns-value"

[[quiz]]
prompt = "What does return do?"
choices = ["Prints a value", "Hands a value back to the caller"]
correct = 1

[reward]
xp = 50
coins = 10
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lesson_roundtrip_from_toml() {
        let lesson = sample_lesson();
        assert_eq!(lesson.id, 3);
        assert_eq!(lesson.challenges.len(), 2);
        assert_eq!(lesson.quiz[0].correct, 1);
        assert_eq!(lesson.reward.xp, 50);
    }

    #[test]
    fn test_capabilities_follow_tier() {
        let lesson = sample_lesson();
        let caps = lesson.capabilities();
        assert!(caps.multi_param);
        assert!(!caps.conditionals);
    }

    #[test]
    fn test_starter_snippet_satisfies_challenges() {
        let lesson = sample_lesson();
        let report = Engine::new()
            .with_capabilities(lesson.capabilities())
            .run(&lesson.starter);
        assert!(report.output.is_ok());

        let statuses = lesson.check_challenges(&report.concepts);
        assert!(statuses.iter().all(|s| s.met));
    }

    #[test]
    fn test_unmet_challenge_reported() {
        let lesson = sample_lesson();
        let report = Engine::new().run("print('hi')\n");
        let statuses = lesson.check_challenges(&report.concepts);
        assert!(statuses.iter().all(|s| !s.met));
    }

    #[test]
    fn test_validate_rejects_out_of_range_answer() {
        let mut lesson = sample_lesson();
        lesson.quiz[0].correct = 5;
        let err = lesson.validate(&PathBuf::from("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("choice"));
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut lesson = sample_lesson();
        lesson.title = "  ".to_string();
        assert!(lesson.validate(&PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Lesson, _> = toml::from_str("id = 1\ntitle = \"x\"\nbogus = 2\n");
        assert!(result.is_err());
    }
}
