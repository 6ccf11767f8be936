//! JSON topic catalogs used to seed local backends.

use serde::Deserialize;
use tracker_core::model::{Topic, TopicId};

use crate::repository::StorageError;

/// Bundled sample catalog.
pub const SAMPLE_CATALOG: &str = include_str!("../seed/topics.json");

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: u64,
    name: String,
    description: Option<String>,
    week_number: u32,
    order_number: i64,
}

/// Parse a JSON array of topic records.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the JSON is malformed or a record
/// is not a valid topic.
pub fn parse_catalog(json: &str) -> Result<Vec<Topic>, StorageError> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    entries
        .into_iter()
        .map(|entry| {
            Topic::new(
                TopicId::new(entry.id),
                entry.name,
                entry.description,
                entry.week_number,
                entry.order_number,
            )
            .map_err(|e| StorageError::Serialization(format!("topic {}: {e}", entry.id)))
        })
        .collect()
}
