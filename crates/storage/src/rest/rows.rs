//! Wire shapes of the hosted `topics` and `user_progress` tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::model::{ProgressEntry, ProgressStatus, Topic, TopicId, UserId};

#[derive(Debug, Deserialize)]
pub(crate) struct TopicRow {
    id: TopicId,
    name: String,
    description: Option<String>,
    week_number: u32,
    order_number: i64,
}

impl TopicRow {
    pub(crate) fn into_topic(self) -> Topic {
        Topic::from_catalog_row(
            self.id,
            self.name,
            self.description,
            self.week_number,
            self.order_number,
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProgressRow {
    user_id: UserId,
    topic_id: TopicId,
    status: ProgressStatus,
    notes: Option<String>,
    updated_at: DateTime<Utc>,
}

impl ProgressRow {
    pub(crate) fn from_entry(entry: &ProgressEntry) -> Self {
        Self {
            user_id: entry.user_id,
            topic_id: entry.topic_id,
            status: entry.status,
            notes: entry.notes.clone(),
            updated_at: entry.updated_at,
        }
    }

    pub(crate) fn into_entry(self) -> ProgressEntry {
        ProgressEntry::new(
            self.user_id,
            self.topic_id,
            self.status,
            self.notes,
            self.updated_at,
        )
    }
}

/// Body of an in-place update; the key travels in the query filters.
#[derive(Debug, Serialize)]
pub(crate) struct ProgressPatch<'a> {
    status: ProgressStatus,
    notes: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

impl<'a> ProgressPatch<'a> {
    pub(crate) fn from_entry(entry: &'a ProgressEntry) -> Self {
        Self {
            status: entry.status,
            notes: entry.notes.as_deref(),
            updated_at: entry.updated_at,
        }
    }
}

/// PostgREST / GoTrue error body. Either field may be absent.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error_description).or(self.msg)
    }
}
