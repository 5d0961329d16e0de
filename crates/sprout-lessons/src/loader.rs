//! Lesson loading
//!
//! Loads lesson TOML files from a directory, validates each one, and returns
//! them sorted by id.

use crate::lesson::Lesson;
use crate::{LessonError, LessonResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a single lesson file
pub fn load_file(path: &Path) -> LessonResult<Lesson> {
    if !path.exists() {
        return Err(LessonError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let lesson: Lesson =
        toml::from_str(&content).map_err(|error| LessonError::TomlParseError {
            file: path.to_path_buf(),
            error,
        })?;

    lesson.validate(path)?;
    Ok(lesson)
}

/// Load every `*.toml` lesson in a directory, sorted by id.
///
/// Duplicate ids are an error; non-TOML files are ignored.
pub fn load_dir(dir: &Path) -> LessonResult<Vec<Lesson>> {
    if !dir.is_dir() {
        return Err(LessonError::NotFound(dir.to_path_buf()));
    }

    let mut lessons = Vec::new();
    let mut seen = HashSet::new();

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        let lesson = load_file(&path)?;
        if !seen.insert(lesson.id) {
            return Err(LessonError::DuplicateId {
                id: lesson.id,
                file: path,
            });
        }
        lessons.push(lesson);
    }

    lessons.sort_by_key(|l| l.id);
    Ok(lessons)
}
