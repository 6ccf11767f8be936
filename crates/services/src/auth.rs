use std::sync::{Arc, RwLock};

use storage::repository::{AuthGateway, AuthSession, StorageError};
use tracker_core::model::User;

use crate::error::SyncError;

/// Holds the signed-in session and ends it on request.
///
/// The current user is read from here on every render; nothing else caches
/// identity.
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    session: RwLock<Option<AuthSession>>,
}

impl AuthService {
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, session: Option<AuthSession>) -> Self {
        Self {
            gateway,
            session: RwLock::new(session),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session().map(|session| session.user)
    }

    /// End the session with the provider, then forget it locally.
    ///
    /// Signing out with no session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteOperationFailed` if the provider rejects the
    /// request; the session is kept in that case.
    pub async fn sign_out(&self) -> Result<(), SyncError> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        self.gateway.sign_out(&session).await.map_err(|err| {
            tracing::warn!(user_id = %session.user.id(), error = %err, "sign out failed");
            SyncError::from(err)
        })?;

        let mut guard = self
            .session
            .write()
            .map_err(|e| SyncError::from(StorageError::Connection(e.to_string())))?;
        *guard = None;
        Ok(())
    }
}
