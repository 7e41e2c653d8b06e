use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("task question cannot be empty")]
    EmptyQuestion,

    #[error("task answer cannot be empty")]
    EmptyAnswer,

    #[error("task answer {0:?} is also listed as a wrong answer")]
    AnswerAmongDistractors(String),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Lesson as it appears in a tier source, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub task: Option<TaskDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub wrong_answers: Vec<String>,
}

impl LessonDraft {
    /// Validate the draft into an immutable [`Lesson`].
    ///
    /// # Errors
    ///
    /// Returns `LessonError` when the title is blank or the task is malformed.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        if self.title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        let task = self.task.map(TaskDraft::validate).transpose()?;
        Ok(Lesson {
            title: self.title,
            content: self.content,
            task,
        })
    }
}

impl TaskDraft {
    /// Validate the draft into a [`Task`].
    ///
    /// # Errors
    ///
    /// Returns `LessonError` when the question or answer is blank, or when the
    /// answer is repeated among the distractors.
    pub fn validate(self) -> Result<Task, LessonError> {
        if self.question.trim().is_empty() {
            return Err(LessonError::EmptyQuestion);
        }
        if self.answer.trim().is_empty() {
            return Err(LessonError::EmptyAnswer);
        }
        if self.wrong_answers.contains(&self.answer) {
            return Err(LessonError::AnswerAmongDistractors(self.answer));
        }
        Ok(Task {
            question: self.question,
            answer: self.answer,
            wrong_answers: self.wrong_answers,
        })
    }
}

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

/// One step of the curriculum. Its position inside the tier is its only locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    title: String,
    content: String,
    task: Option<Task>,
}

impl Lesson {
    /// Build a lesson from already-checked parts.
    ///
    /// # Errors
    ///
    /// Same rules as [`LessonDraft::validate`].
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        task: Option<Task>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        Ok(Self {
            title,
            content: content.into(),
            task,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    #[must_use]
    pub fn has_task(&self) -> bool {
        self.task.is_some()
    }
}

/// Multiple-choice question attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    question: String,
    answer: String,
    wrong_answers: Vec<String>,
}

impl Task {
    /// # Errors
    ///
    /// Same rules as [`TaskDraft::validate`].
    pub fn new<I, S>(
        question: impl Into<String>,
        answer: impl Into<String>,
        wrong_answers: I,
    ) -> Result<Self, LessonError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaskDraft {
            question: question.into(),
            answer: answer.into(),
            wrong_answers: wrong_answers.into_iter().map(Into::into).collect(),
        }
        .validate()
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn wrong_answers(&self) -> &[String] {
        &self.wrong_answers
    }

    /// Number of choices a quiz built from this task presents.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.wrong_answers.len() + 1
    }

    /// Choice at `index` in the task's fixed order: the answer first, then the
    /// distractors as listed.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.answer),
            n => self.wrong_answers.get(n - 1).map(String::as_str),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
