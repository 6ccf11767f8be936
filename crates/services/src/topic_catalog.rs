use std::sync::Arc;

use storage::repository::TopicRepository;
use tracker_core::model::{Topic, week_numbers};

use crate::error::SyncError;

/// Observable state of the topic catalog for one mount.
///
/// `loading` starts true and is cleared by the first completed read,
/// whatever its outcome. A failed read leaves `topics` empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogState {
    topics: Vec<Topic>,
    loading: bool,
    error: Option<String>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Apply the outcome of a catalog read.
    pub fn finish_load(&mut self, result: Result<Vec<Topic>, SyncError>) {
        match result {
            Ok(topics) => {
                self.topics = topics;
                self.error = None;
            }
            Err(err) => {
                self.topics.clear();
                self.error = Some(err.message().to_owned());
            }
        }
        self.loading = false;
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Distinct week numbers of the loaded catalog, ascending.
    #[must_use]
    pub fn weeks(&self) -> Vec<u32> {
        week_numbers(&self.topics)
    }
}

/// Reads the topic catalog.
#[derive(Clone)]
pub struct TopicService {
    topics: Arc<dyn TopicRepository>,
}

impl TopicService {
    #[must_use]
    pub fn new(topics: Arc<dyn TopicRepository>) -> Self {
        Self { topics }
    }

    /// Fetch all topics ordered by order number.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteOperationFailed` if the read fails.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, SyncError> {
        match self.topics.list_topics().await {
            Ok(topics) => {
                tracing::debug!(count = topics.len(), "topic catalog loaded");
                Ok(topics)
            }
            Err(err) => {
                tracing::warn!(error = %err, "topic catalog load failed");
                Err(err.into())
            }
        }
    }
}

/// Catalog loader that owns its state, for callers outside the UI runtime.
pub struct TopicCatalog {
    service: Arc<TopicService>,
    state: CatalogState,
}

impl TopicCatalog {
    #[must_use]
    pub fn new(service: Arc<TopicService>) -> Self {
        Self {
            service,
            state: CatalogState::new(),
        }
    }

    /// Issue the single catalog read for this activation.
    pub async fn load(&mut self) {
        let result = self.service.list_topics().await;
        self.state.finish_load(result);
    }

    #[must_use]
    pub fn state(&self) -> &CatalogState {
        &self.state
    }
}
