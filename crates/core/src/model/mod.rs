mod handle;
mod ids;
mod lesson;

pub use handle::{LessonHandle, QuizMode};
pub use ids::{ChatId, ParseIdError, UserId};
pub use lesson::{Lesson, LessonDraft, LessonError, Task, TaskDraft};
