use tracker_core::model::Topic;

use super::SqliteRepository;
use super::mapping::{map_topic_row, topic_id_to_i64, write_error};
use crate::repository::{StorageError, TopicRepository};

#[async_trait::async_trait]
impl TopicRepository for SqliteRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, week_number, order_number
            FROM topics
            ORDER BY order_number ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in rows {
            topics.push(map_topic_row(&row)?);
        }
        Ok(topics)
    }
}

impl SqliteRepository {
    /// Insert or replace a catalog topic. The client never writes topics;
    /// this exists for seeding local databases.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO topics (id, name, description, week_number, order_number)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                week_number = excluded.week_number,
                order_number = excluded.order_number
            ",
        )
        .bind(topic_id_to_i64(topic.id())?)
        .bind(topic.name())
        .bind(topic.description())
        .bind(i64::from(topic.week_number()))
        .bind(topic.order_number())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(())
    }
}
