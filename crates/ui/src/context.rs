use std::sync::Arc;

use services::{AuthService, ProgressService, TopicService};
use tracker_core::model::User;

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn topic_service(&self) -> Arc<TopicService>;
    fn progress_service(&self) -> Arc<ProgressService>;
    fn auth_service(&self) -> Arc<AuthService>;
}

#[derive(Clone)]
pub struct AppContext {
    topics: Arc<TopicService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            topics: app.topic_service(),
            progress: app.progress_service(),
            auth: app.auth_service(),
        }
    }

    /// The signed-in user, read fresh from the auth session.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    #[must_use]
    pub fn topic_service(&self) -> Arc<TopicService> {
        Arc::clone(&self.topics)
    }

    #[must_use]
    pub fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth_service(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
