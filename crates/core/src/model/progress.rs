use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{TopicId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("unknown progress status: {0}")]
    UnknownStatus(String),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Where a learner stands on a topic.
///
/// The wire names (`unread`, `in-progress`, `completed`) are what the backend
/// stores in `user_progress.status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    #[default]
    #[serde(rename = "unread")]
    Unread,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl ProgressStatus {
    /// Every status, in the order the dashboard offers them.
    pub const ALL: [ProgressStatus; 3] = [
        ProgressStatus::Completed,
        ProgressStatus::InProgress,
        ProgressStatus::Unread,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Unread => "unread",
            ProgressStatus::InProgress => "in-progress",
            ProgressStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(Self::Unread),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ProgressError::UnknownStatus(other.to_owned())),
        }
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Status and notes for one topic, as held in the local progress cache.
///
/// A topic without a cache entry resolves to `Progress::default()`
/// (unread, no notes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub status: ProgressStatus,
    pub notes: Option<String>,
}

impl Progress {
    #[must_use]
    pub fn new(status: ProgressStatus, notes: Option<String>) -> Self {
        Self { status, notes }
    }
}

/// A persisted `user_progress` row.
///
/// Keyed by `(user_id, topic_id)`; at most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    pub user_id: UserId,
    pub topic_id: TopicId,
    pub status: ProgressStatus,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressEntry {
    #[must_use]
    pub fn new(
        user_id: UserId,
        topic_id: TopicId,
        status: ProgressStatus,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            topic_id,
            status,
            notes,
            updated_at,
        }
    }

    /// Projects the row into its cache value.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::new(self.status, self.notes.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
