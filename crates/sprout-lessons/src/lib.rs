//! Sprout Lesson System
//!
//! Provides the lesson layer on top of the snippet engine:
//! - Lesson definitions loaded from TOML files
//! - Capability tiers selecting what each lesson unlocks
//! - Challenge checklists driven by concept flags
//! - Run and quiz state machines
//! - Progress accounting (XP, coins, lives, completed levels)
//!
//! # Example
//!
//! ```no_run
//! use sprout_lessons::load_dir;
//! use std::path::Path;
//!
//! let lessons = load_dir(Path::new("lessons")).unwrap();
//! for lesson in &lessons {
//!     println!("{}: {}", lesson.id, lesson.title);
//! }
//! ```

pub mod flow;
pub mod lesson;
pub mod loader;
pub mod progress;

use std::path::PathBuf;
use thiserror::Error;

/// Lesson loading and validation errors
#[derive(Error, Debug)]
pub enum LessonError {
    #[error("Lesson file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read lesson file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid lesson in {file}: {reason}")]
    ValidationError { file: PathBuf, reason: String },

    #[error("Duplicate lesson id {id} in {file}")]
    DuplicateId { id: u32, file: PathBuf },
}

/// Result type for lesson operations
pub type LessonResult<T> = Result<T, LessonError>;

// Re-export main types
pub use flow::{Answer, QuizFlow, QuizState, RunState};
pub use lesson::{Challenge, ChallengeStatus, Lesson, QuizQuestion, Reward};
pub use loader::{load_dir, load_file};
pub use progress::{CompletedLevel, MemoryProgress, Progress};
