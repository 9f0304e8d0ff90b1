//! Categories used to group financial records.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A grouping bucket for financial records.
///
/// Categories are administered outside the core; the engine treats them as
/// opaque references and only resolves them through `CategoryLookup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Unique human-readable name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

impl Category {
    /// Creates a category with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: None,
        }
    }
}
