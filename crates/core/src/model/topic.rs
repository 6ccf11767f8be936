use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A catalog item the learner works through.
///
/// Topics are owned by the remote catalog; the client only reads them.
/// `week_number` groups topics on the dashboard and `order_number` is the
/// stable sort key the catalog is fetched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    name: String,
    description: Option<String>,
    week_number: u32,
    order_number: i64,
}

impl Topic {
    /// Creates a new Topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: TopicId,
        name: impl Into<String>,
        description: Option<String>,
        week_number: u32,
        order_number: i64,
    ) -> Result<Self, TopicError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopicError::EmptyName);
        }

        Ok(Self::from_catalog_row(
            id,
            name.trim(),
            description,
            week_number,
            order_number,
        ))
    }

    /// Rebuilds a topic read back from the catalog.
    ///
    /// The catalog owns its rows, so the name is kept even when blank.
    #[must_use]
    pub fn from_catalog_row(
        id: TopicId,
        name: impl Into<String>,
        description: Option<String>,
        week_number: u32,
        order_number: i64,
    ) -> Self {
        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Self {
            id,
            name: name.into(),
            description,
            week_number,
            order_number,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn week_number(&self) -> u32 {
        self.week_number
    }

    #[must_use]
    pub fn order_number(&self) -> i64 {
        self.order_number
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
