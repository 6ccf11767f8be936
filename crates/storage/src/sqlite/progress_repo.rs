use tracker_core::model::{ProgressEntry, TopicId, UserId};

use super::SqliteRepository;
use super::mapping::{map_progress_row, topic_id_to_i64, write_error};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, topic_id, status, notes, updated_at
            FROM user_progress
            WHERE user_id = ?1
            ORDER BY topic_id ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(map_progress_row(&row)?);
        }
        Ok(entries)
    }

    async fn get_progress(
        &self,
        user_id: UserId,
        topic_id: TopicId,
    ) -> Result<Option<ProgressEntry>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, topic_id, status, notes, updated_at
            FROM user_progress
            WHERE user_id = ?1 AND topic_id = ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(topic_id_to_i64(topic_id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn update_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let row = sqlx::query(
            r"
            UPDATE user_progress
            SET status = ?3, notes = ?4, updated_at = ?5
            WHERE user_id = ?1 AND topic_id = ?2
            RETURNING user_id, topic_id, status, notes, updated_at
            ",
        )
        .bind(entry.user_id.to_string())
        .bind(topic_id_to_i64(entry.topic_id)?)
        .bind(entry.status.as_str())
        .bind(entry.notes.as_deref())
        .bind(entry.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        match row {
            Some(row) => map_progress_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn insert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let row = sqlx::query(
            r"
            INSERT INTO user_progress (user_id, topic_id, status, notes, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING user_id, topic_id, status, notes, updated_at
            ",
        )
        .bind(entry.user_id.to_string())
        .bind(topic_id_to_i64(entry.topic_id)?)
        .bind(entry.status.as_str())
        .bind(entry.notes.as_deref())
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        map_progress_row(&row)
    }

    async fn upsert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let row = sqlx::query(
            r"
            INSERT INTO user_progress (user_id, topic_id, status, notes, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, topic_id) DO UPDATE SET
                status = excluded.status,
                notes = excluded.notes,
                updated_at = excluded.updated_at
            RETURNING user_id, topic_id, status, notes, updated_at
            ",
        )
        .bind(entry.user_id.to_string())
        .bind(topic_id_to_i64(entry.topic_id)?)
        .bind(entry.status.as_str())
        .bind(entry.notes.as_deref())
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        map_progress_row(&row)
    }
}
