use std::sync::Arc;

use storage::repository::{AuthSession, InMemoryRepository, Storage};
use storage::rest::{RestConfig, SupabaseAuth};
use tracker_core::model::User;

use crate::Clock;
use crate::auth::AuthService;
use crate::error::AppServicesError;
use crate::progress_sync::{ProgressService, UpsertStrategy};
use crate::topic_catalog::TopicService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    topics: Arc<TopicService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
}

impl AppServices {
    /// Wire services over an already built `Storage`, acting as `session`.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, session: AuthSession) -> Self {
        let topics = Arc::new(TopicService::new(Arc::clone(&storage.topics)));
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let auth = Arc::new(AuthService::new(Arc::clone(&storage.auth), Some(session)));
        Self {
            topics,
            progress,
            auth,
        }
    }

    /// Build services over an in-memory repository.
    #[must_use]
    pub fn new_in_memory(repo: InMemoryRepository, clock: Clock, user: User) -> Self {
        let storage = Storage::from_in_memory(repo);
        Self::from_storage(&storage, clock, AuthSession::local(user))
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        user: User,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, AuthSession::local(user)))
    }

    /// Sign in against the hosted backend and build services as that user.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if sign-in fails.
    pub async fn new_remote(
        config: RestConfig,
        clock: Clock,
        email: &str,
        password: &str,
    ) -> Result<Self, AppServicesError> {
        let session = SupabaseAuth::new(config.clone())
            .sign_in_with_password(email, password)
            .await?;
        let storage = Storage::remote(config, &session);
        Ok(Self::from_storage(&storage, clock, session))
    }

    /// Switch how progress upserts reach the backend.
    #[must_use]
    pub fn with_upsert_strategy(mut self, strategy: UpsertStrategy) -> Self {
        let service = (*self.progress).clone().with_strategy(strategy);
        self.progress = Arc::new(service);
        self
    }

    #[must_use]
    pub fn topics(&self) -> Arc<TopicService> {
        Arc::clone(&self.topics)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }
}
