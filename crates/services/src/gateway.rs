use async_trait::async_trait;

use tutor_core::model::{ChatId, UserId};
use tutor_core::reply::Reply;

use crate::error::DeliveryError;

/// What the user did, as seen by the messaging boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Free text typed into the chat, normally a `/command`.
    Command(String),
    /// Token attached to the button the user pressed.
    ButtonPress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub first_name: Option<String>,
    pub kind: EventKind,
}

impl InboundEvent {
    #[must_use]
    pub fn command(user_id: UserId, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            first_name: None,
            kind: EventKind::Command(text.into()),
        }
    }

    #[must_use]
    pub fn button(user_id: UserId, chat_id: ChatId, token: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            first_name: None,
            kind: EventKind::ButtonPress(token.into()),
        }
    }

    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }
}

/// Outbound side of the messaging platform.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver `reply` to `chat_id`.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` when the platform refuses or cannot be reached.
    async fn deliver(&self, chat_id: ChatId, reply: &Reply) -> Result<(), DeliveryError>;
}
