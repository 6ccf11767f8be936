#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod error;
pub mod progress_sync;
pub mod topic_catalog;

pub use tracker_core::Clock;

pub use app_services::AppServices;
pub use auth::AuthService;
pub use error::{AppServicesError, SyncError};
pub use progress_sync::{
    ProgressService, ProgressState, ProgressSynchronizer, UpsertStrategy, UpsertTarget,
    UpsertTicket,
};
pub use topic_catalog::{CatalogState, TopicCatalog, TopicService};
