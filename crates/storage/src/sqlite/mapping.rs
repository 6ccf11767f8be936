use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracker_core::model::{ProgressEntry, ProgressStatus, Topic, TopicId, UserId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn topic_id_from_i64(v: i64) -> Result<TopicId, StorageError> {
    u64::try_from(v)
        .map(TopicId::new)
        .map_err(|_| StorageError::Serialization("topic_id sign overflow".into()))
}

pub(crate) fn topic_id_to_i64(id: TopicId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("topic_id overflow".into()))
}

pub(crate) fn map_topic_row(row: &SqliteRow) -> Result<Topic, StorageError> {
    let week_number = u32::try_from(row.try_get::<i64, _>("week_number").map_err(ser)?)
        .map_err(|_| StorageError::Serialization("week_number overflow".into()))?;

    Ok(Topic::from_catalog_row(
        topic_id_from_i64(row.try_get("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        week_number,
        row.try_get::<i64, _>("order_number").map_err(ser)?,
    ))
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressEntry, StorageError> {
    let user_id: UserId = row
        .try_get::<String, _>("user_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let status: ProgressStatus = row
        .try_get::<String, _>("status")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    Ok(ProgressEntry::new(
        user_id,
        topic_id_from_i64(row.try_get("topic_id").map_err(ser)?)?,
        status,
        row.try_get::<Option<String>, _>("notes").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

/// Maps write failures, keeping unique violations distinguishable.
pub(crate) fn write_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}
