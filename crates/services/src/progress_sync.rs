use std::collections::HashMap;
use std::sync::Arc;

use storage::repository::{ProgressRepository, StorageError};
use tracker_core::model::{Progress, ProgressEntry, ProgressStatus, TopicId, User};

use crate::Clock;
use crate::error::SyncError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Issued when an upsert starts; orders its completion against the other
/// writes to the same topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpsertTicket {
    topic_id: TopicId,
    seq: u64,
}

/// Local progress cache plus load/error flags for the current session.
///
/// Every mutation goes through `finish_load` or `finish_upsert`, so the
/// cache only ever holds rows the backend confirmed. Overlapping upserts on
/// one topic resolve to the latest issued write that succeeded: a success
/// is dropped only if a success issued after it was already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressState {
    cache: HashMap<TopicId, Progress>,
    loading: bool,
    error: Option<String>,
    applied: HashMap<TopicId, u64>,
    next_seq: u64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            loading: true,
            error: None,
            applied: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Replace the cache with a fetched snapshot, or record the failure.
    pub fn finish_load(&mut self, result: Result<Vec<ProgressEntry>, SyncError>) {
        match result {
            Ok(entries) => {
                self.cache = entries
                    .iter()
                    .map(|entry| (entry.topic_id, entry.progress()))
                    .collect();
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.message().to_owned());
            }
        }
        self.loading = false;
    }

    /// Take a ticket for an upsert about to be issued for `topic_id`.
    pub fn begin_upsert(&mut self, topic_id: TopicId) -> UpsertTicket {
        self.next_seq += 1;
        UpsertTicket {
            topic_id,
            seq: self.next_seq,
        }
    }

    /// Apply an upsert outcome.
    ///
    /// Returns true when the cache was updated. Failures never touch the
    /// cache or the applied marker; they only record the message.
    pub fn finish_upsert(
        &mut self,
        ticket: UpsertTicket,
        result: &Result<ProgressEntry, SyncError>,
    ) -> bool {
        match result {
            Ok(entry) => {
                let applied = self.applied.get(&ticket.topic_id).copied().unwrap_or(0);
                if ticket.seq <= applied {
                    tracing::debug!(topic_id = %ticket.topic_id, "dropping stale upsert completion");
                    return false;
                }
                self.applied.insert(ticket.topic_id, ticket.seq);
                self.cache.insert(ticket.topic_id, entry.progress());
                true
            }
            Err(err) => {
                self.error = Some(err.message().to_owned());
                false
            }
        }
    }

    /// Progress for a topic, defaulting to unread with no notes.
    #[must_use]
    pub fn progress(&self, topic_id: TopicId) -> Progress {
        self.cache.get(&topic_id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, topic_id: TopicId) -> Option<&Progress> {
        self.cache.get(&topic_id)
    }

    #[must_use]
    pub fn cache(&self) -> &HashMap<TopicId, Progress> {
        &self.cache
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Owner of a `ProgressState` that an upsert steps through.
///
/// The synchronizer holds its state directly; the UI keeps it in a signal.
pub trait UpsertTarget {
    fn update_state<R>(&mut self, f: impl FnOnce(&mut ProgressState) -> R) -> R;
}

impl UpsertTarget for ProgressState {
    fn update_state<R>(&mut self, f: impl FnOnce(&mut ProgressState) -> R) -> R {
        f(self)
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// How an upsert reaches the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpsertStrategy {
    /// One insert-or-update keyed by (user, topic).
    #[default]
    Atomic,
    /// Point read, then update or insert. Two racing callers can both see no
    /// row; the loser's insert fails with a conflict error.
    LookupThenWrite,
}

/// Remote reads and writes of progress rows for a user.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    strategy: UpsertStrategy,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            progress,
            strategy: UpsertStrategy::default(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: UpsertStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fetch every progress row for `user`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteOperationFailed` if the read fails.
    pub async fn fetch_progress(&self, user: &User) -> Result<Vec<ProgressEntry>, SyncError> {
        self.progress.list_progress(user.id()).await.map_err(|err| {
            tracing::warn!(user_id = %user.id(), error = %err, "progress load failed");
            SyncError::from(err)
        })
    }

    /// Write status and notes for one topic, stamped with the clock's now.
    ///
    /// Returns the row as the backend stored it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteOperationFailed` if any remote step fails.
    pub async fn save_progress(
        &self,
        user: &User,
        topic_id: TopicId,
        status: ProgressStatus,
        notes: Option<String>,
    ) -> Result<ProgressEntry, SyncError> {
        let entry = ProgressEntry::new(user.id(), topic_id, status, notes, self.clock.now());
        let stored = match self.strategy {
            UpsertStrategy::Atomic => self.progress.upsert_progress(&entry).await,
            UpsertStrategy::LookupThenWrite => self.lookup_then_write(&entry).await,
        };
        match stored {
            Ok(row) => {
                tracing::debug!(user_id = %user.id(), %topic_id, status = %row.status, "progress saved");
                Ok(row)
            }
            Err(err) => {
                tracing::warn!(user_id = %user.id(), %topic_id, error = %err, "progress save failed");
                Err(err.into())
            }
        }
    }

    /// Take a ticket on `target`, save, then hand the outcome back to
    /// `target`.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after recording it on `target`.
    pub async fn upsert_into(
        &self,
        target: &mut impl UpsertTarget,
        user: &User,
        topic_id: TopicId,
        status: ProgressStatus,
        notes: Option<String>,
    ) -> Result<ProgressEntry, SyncError> {
        let ticket = target.update_state(|state| state.begin_upsert(topic_id));
        let result = self.save_progress(user, topic_id, status, notes).await;
        target.update_state(|state| state.finish_upsert(ticket, &result));
        result
    }

    async fn lookup_then_write(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let existing = self
            .progress
            .get_progress(entry.user_id, entry.topic_id)
            .await?;
        if existing.is_some() {
            self.progress.update_progress(entry).await
        } else {
            self.progress.insert_progress(entry).await
        }
    }
}

//
// ─── SYNCHRONIZER ──────────────────────────────────────────────────────────────
//

/// Progress state and its service, driven together.
///
/// The UI keeps `ProgressState` in a signal; this type gives headless
/// callers the same transitions.
pub struct ProgressSynchronizer {
    service: Arc<ProgressService>,
    state: ProgressState,
}

impl ProgressSynchronizer {
    #[must_use]
    pub fn new(service: Arc<ProgressService>) -> Self {
        Self {
            service,
            state: ProgressState::new(),
        }
    }

    /// Replace the cache with the user's rows.
    pub async fn load(&mut self, user: &User) {
        let result = self.service.fetch_progress(user).await;
        self.state.finish_load(result);
    }

    /// Persist status and notes, then cache the confirmed row.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after recording it; the cache is unchanged.
    pub async fn upsert(
        &mut self,
        user: &User,
        topic_id: TopicId,
        status: ProgressStatus,
        notes: Option<String>,
    ) -> Result<ProgressEntry, SyncError> {
        self.service
            .upsert_into(&mut self.state, user, topic_id, status, notes)
            .await
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }
}
