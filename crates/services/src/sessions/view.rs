use tutor_core::model::LessonHandle;

use crate::quiz::Choice;

/// Lesson body ready to show, plus the handle used to ask for its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView {
    pub handle: LessonHandle,
    /// 1-based position in the whole curriculum.
    pub number: usize,
    pub tier_name: String,
    pub title: String,
    pub content: String,
}

/// Outcome of asking for the lesson at the user's cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextLesson {
    Lesson(LessonView),
    Completed,
}

/// A question with its shuffled answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub handle: LessonHandle,
    pub question: String,
    pub answers: Vec<Choice>,
}

/// Outcome of asking for a lesson's task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPrompt {
    Task(TaskView),
    /// The lesson exists but has nothing to answer.
    NoTask(LessonHandle),
    /// Only produced by test mode, when the cursor is past the last lesson.
    Completed,
}

/// Result of checking a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// `advanced_to` is the new cursor when this answer moved the user forward.
    Correct { advanced_to: Option<u32> },
    Incorrect,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct { .. })
    }
}

/// Where a user currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub cursor: u32,
    pub total_lessons: usize,
    pub current: Option<TierPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPosition {
    pub tier_name: String,
    /// 1-based lesson number inside the tier.
    pub lesson_number: usize,
    pub tier_len: usize,
}
