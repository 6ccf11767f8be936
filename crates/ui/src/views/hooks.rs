use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    CatalogState, ProgressService, ProgressState, SyncError, TopicService, UpsertTarget,
};
use tracker_core::model::{ProgressEntry, ProgressStatus, TopicId, User};

/// Issue the catalog read once per mount and expose its state.
pub fn use_topic_catalog(service: Arc<TopicService>) -> Signal<CatalogState> {
    let mut catalog = use_signal(CatalogState::new);
    use_future(move || {
        let service = service.clone();
        async move {
            let result = service.list_topics().await;
            catalog.write().finish_load(result);
        }
    });
    catalog
}

/// Load the user's progress once per mount. Nothing is fetched without a user.
pub fn use_progress_sync(
    service: Arc<ProgressService>,
    user: Option<User>,
) -> Signal<ProgressState> {
    let mut state = use_signal(ProgressState::new);
    use_future(move || {
        let service = service.clone();
        let user = user.clone();
        async move {
            let Some(user) = user else {
                return;
            };
            let result = service.fetch_progress(&user).await;
            state.write().finish_load(result);
        }
    });
    state
}

/// Upsert entry point shared with every topic card through context.
#[derive(Clone)]
pub struct ProgressHandle {
    state: Signal<ProgressState>,
    service: Arc<ProgressService>,
    user: Option<User>,
}

impl ProgressHandle {
    #[must_use]
    pub fn new(
        state: Signal<ProgressState>,
        service: Arc<ProgressService>,
        user: Option<User>,
    ) -> Self {
        Self {
            state,
            service,
            user,
        }
    }

    /// The recorded status, without subscribing the caller.
    #[must_use]
    pub fn status_of(&self, topic_id: TopicId) -> ProgressStatus {
        self.state.peek().progress(topic_id).status
    }

    /// Persist and, if still the latest write for the topic, cache the
    /// confirmed row.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if there is no signed-in user or the write fails.
    pub async fn upsert(
        &self,
        topic_id: TopicId,
        status: ProgressStatus,
        notes: Option<String>,
    ) -> Result<ProgressEntry, SyncError> {
        let Some(user) = self.user.as_ref() else {
            return Err(SyncError::RemoteOperationFailed("not signed in".to_owned()));
        };
        let mut target = SignalTarget(self.state);
        self.service
            .upsert_into(&mut target, user, topic_id, status, notes)
            .await
    }
}

struct SignalTarget(Signal<ProgressState>);

impl UpsertTarget for SignalTarget {
    fn update_state<R>(&mut self, f: impl FnOnce(&mut ProgressState) -> R) -> R {
        f(&mut *self.0.write())
    }
}
