//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use tutor_core::model::LessonHandle;

/// Errors emitted by the session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Handle does not point at an existing lesson, e.g. after a catalog reload.
    #[error("lesson {0} not found")]
    NotFound(LessonHandle),
    #[error("tier {0} does not exist")]
    UnknownTier(usize),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors reported by a messaging gateway when a reply cannot be delivered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeliveryError {
    /// The reply was refused before reaching the transport.
    #[error("reply rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}
