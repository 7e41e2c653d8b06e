#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod quiz;
mod render;
pub mod sessions;

pub use dispatch::Conversation;
pub use error::{DeliveryError, SessionError};
pub use gateway::{EventKind, InboundEvent, MessageGateway};
pub use sessions::{
    AnswerOutcome, LessonView, NextLesson, ProgressView, SessionController, TaskPrompt, TaskView,
    TierPosition,
};
