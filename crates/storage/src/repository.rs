use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracker_core::model::{ProgressEntry, Topic, TopicId, User, UserId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },
}

/// An authenticated identity plus the bearer token the backend issued for it.
///
/// Local backends have no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: Option<String>,
}

impl AuthSession {
    #[must_use]
    pub fn local(user: User) -> Self {
        Self {
            user,
            access_token: None,
        }
    }
}

/// Read access to the topic catalog.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Fetch every topic ordered ascending by order number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError>;
}

/// Per-user progress rows keyed by `(user_id, topic_id)`.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch all progress rows for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read.
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError>;

    /// Point read of one row. `Ok(None)` when the pair has no row yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_progress(
        &self,
        user_id: UserId,
        topic_id: TopicId,
    ) -> Result<Option<ProgressEntry>, StorageError>;

    /// Overwrite status, notes and `updated_at` of an existing row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row matched.
    async fn update_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError>;

    /// Insert a new row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the pair already has a row.
    async fn insert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError>;

    /// Insert the row, or update it in place if the pair already has one,
    /// as a single operation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError>;
}

/// Session teardown against the auth provider.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Invalidate the session with the provider.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the provider rejects the request.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    topics: Arc<Mutex<Vec<Topic>>>,
    progress: Arc<Mutex<HashMap<(UserId, TopicId), ProgressEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_topics(topics: Vec<Topic>) -> Self {
        Self {
            topics: Arc::new(Mutex::new(topics)),
            progress: Arc::default(),
        }
    }
}

#[async_trait]
impl TopicRepository for InMemoryRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut topics = guard.clone();
        topics.sort_by_key(Topic::order_number);
        Ok(topics)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<ProgressEntry> = guard
            .values()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.topic_id);
        Ok(rows)
    }

    async fn get_progress(
        &self,
        user_id: UserId,
        topic_id: TopicId,
    ) -> Result<Option<ProgressEntry>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user_id, topic_id)).cloned())
    }

    async fn update_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let row = guard
            .get_mut(&(entry.user_id, entry.topic_id))
            .ok_or(StorageError::NotFound)?;
        row.status = entry.status;
        row.notes.clone_from(&entry.notes);
        row.updated_at = entry.updated_at;
        Ok(row.clone())
    }

    async fn insert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = (entry.user_id, entry.topic_id);
        if guard.contains_key(&key) {
            return Err(StorageError::Conflict);
        }
        guard.insert(key, entry.clone());
        Ok(entry.clone())
    }

    async fn upsert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((entry.user_id, entry.topic_id), entry.clone());
        Ok(entry.clone())
    }
}

/// Auth gateway for backends without a remote provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalAuth;

#[async_trait]
impl AuthGateway for LocalAuth {
    async fn sign_out(&self, session: &AuthSession) -> Result<(), StorageError> {
        tracing::info!(user_id = %session.user.id(), "local session ended");
        Ok(())
    }
}

/// Aggregates the gateway contracts behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub topics: Arc<dyn TopicRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub auth: Arc<dyn AuthGateway>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let topics: Arc<dyn TopicRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            topics,
            progress,
            auth: Arc::new(LocalAuth),
        }
    }
}
