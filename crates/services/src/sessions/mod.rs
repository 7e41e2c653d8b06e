mod controller;
mod locks;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::SessionController;
pub use view::{
    AnswerOutcome, LessonView, NextLesson, ProgressView, TaskPrompt, TaskView, TierPosition,
};
