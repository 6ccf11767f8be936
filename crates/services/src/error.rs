//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::rest::RestConfigError;
use storage::sqlite::SqliteInitError;
use tracker_core::model::UserError;

/// The one failure callers of the catalog, progress and auth services see.
///
/// Network failures, constraint violations and authorization failures all
/// collapse into a message string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("{0}")]
    RemoteOperationFailed(String),
}

impl SyncError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            SyncError::RemoteOperationFailed(message) => message,
        }
    }
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        let message = match err {
            StorageError::Conflict => "progress entry already exists".to_owned(),
            StorageError::NotFound => "progress entry not found".to_owned(),
            other => other.to_string(),
        };
        SyncError::RemoteOperationFailed(message)
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    RestConfig(#[from] RestConfigError),
    #[error(transparent)]
    User(#[from] UserError),
}
