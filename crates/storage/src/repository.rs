use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tutor_core::model::UserId;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Per-user curriculum cursor store.
///
/// The store does not validate values and provides no cross-call atomicity;
/// callers serialise read-modify-write sequences per user.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Current cursor for `user`, `0` when the user has never been seen.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_progress(&self, user: UserId) -> Result<u32, StorageError>;

    /// Overwrite the cursor for `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_progress(&self, user: UserId, cursor: u32) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation; progress lives until process restart.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<UserId, u32>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Pre-populate cursors, e.g. for fixtures.
    #[must_use]
    pub fn with_progress(entries: impl IntoIterator<Item = (UserId, u32)>) -> Self {
        Self {
            progress: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, user: UserId) -> Result<u32, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user).copied().unwrap_or(0))
    }

    async fn set_progress(&self, user: UserId, cursor: u32) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(user, cursor);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
