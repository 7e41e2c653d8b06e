#![forbid(unsafe_code)]

pub mod lessons;
pub mod repository;
pub mod sqlite;

pub use lessons::JsonTierFile;
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
