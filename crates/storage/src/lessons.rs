//! JSON lesson files used as tier sources.
//!
//! Each file holds an array of lesson records:
//!
//! ```json
//! [
//!   { "title": "Variables", "content": "...",
//!     "task": { "question": "...", "answer": "let", "wrongAnswers": ["var", "int"] } }
//! ]
//! ```

use std::path::{Path, PathBuf};

use tutor_core::catalog::{CatalogLoadError, TierSource};
use tutor_core::model::{Lesson, LessonDraft};

/// A tier whose lessons live in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonTierFile {
    name: String,
    path: PathBuf,
}

impl JsonTierFile {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TierSource for JsonTierFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<Lesson>, CatalogLoadError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogLoadError::Io(format!("{}: {e}", self.path.display())))?;
        parse_lessons(&raw)
    }
}

/// Parse and validate a JSON array of lesson records.
///
/// # Errors
///
/// Returns `CatalogLoadError::Malformed` for invalid JSON and
/// `CatalogLoadError::InvalidLesson` for the first record that fails validation.
pub fn parse_lessons(raw: &str) -> Result<Vec<Lesson>, CatalogLoadError> {
    let drafts: Vec<LessonDraft> =
        serde_json::from_str(raw).map_err(|e| CatalogLoadError::Malformed(e.to_string()))?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft
                .validate()
                .map_err(|source| CatalogLoadError::InvalidLesson { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tutor_core::model::LessonError;

    #[test]
    fn parses_lessons_in_file_order() {
        let raw = r#"[
            { "title": "One", "content": "a" },
            { "title": "Two", "content": "b",
              "task": { "question": "Q", "answer": "X", "wrongAnswers": ["Y", "Z"] } }
        ]"#;
        let lessons = parse_lessons(raw).unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].title(), "One");
        assert_eq!(lessons[1].task().unwrap().wrong_answers().len(), 2);
    }

    #[test]
    fn invalid_record_reports_its_index() {
        let raw = r#"[
            { "title": "One", "content": "a" },
            { "title": "Two", "content": "b",
              "task": { "question": "Q", "answer": "X", "wrongAnswers": ["X"] } }
        ]"#;
        let err = parse_lessons(raw).unwrap_err();
        assert!(matches!(
            err,
            CatalogLoadError::InvalidLesson {
                index: 1,
                source: LessonError::AnswerAmongDistractors(_)
            }
        ));
    }

    #[test]
    fn non_array_is_malformed() {
        let err = parse_lessons(r#"{ "title": "One" }"#).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Malformed(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = JsonTierFile::new("beginner", "/definitely/not/here.json");
        assert!(matches!(source.load(), Err(CatalogLoadError::Io(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{ "title": "Disk", "content": "c" }}]"#).unwrap();

        let source = JsonTierFile::new("beginner", file.path());
        let lessons = source.load().unwrap();
        assert_eq!(source.name(), "beginner");
        assert_eq!(lessons[0].title(), "Disk");
    }
}
