use chrono::Utc;
use sqlx::Row;
use tutor_core::model::UserId;

use super::SqliteRepository;
use super::mapping::{cursor_from_i64, user_id_to_i64};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, user: UserId) -> Result<u32, StorageError> {
        let row = sqlx::query("SELECT cursor FROM user_progress WHERE user_id = ?1")
            .bind(user_id_to_i64(user)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(0);
        };
        let cursor: i64 = row
            .try_get("cursor")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        cursor_from_i64(cursor)
    }

    async fn set_progress(&self, user: UserId, cursor: u32) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_progress (user_id, cursor, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                cursor = excluded.cursor,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id_to_i64(user)?)
        .bind(i64::from(cursor))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
