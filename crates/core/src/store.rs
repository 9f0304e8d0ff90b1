//! Collaborator traits for the workflow engine.
//!
//! The engine owns no persistence of its own. Callers provide a record
//! store, an identity context, and a category lookup; the engine composes
//! them and never interprets or retries their failures.

use chrono::{DateTime, Utc};

use bursar_shared::types::{
    Category, CategoryId, Principal, PrincipalId, RecordId, RecordKind, RecordStatus,
};

use crate::record::{FinancialRecord, RecordDraft};

/// Opaque failure raised by an external collaborator.
///
/// The engine passes these through untouched; retry policy, if any, belongs
/// to the collaborator or the caller.
#[derive(Debug, Clone, thiserror::Error)]
#[error("store failure: {0}")]
pub struct StoreError(String);

impl StoreError {
    /// Wraps a collaborator failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Persistent storage for financial records.
///
/// `begin`/`commit`/`rollback` expose the store's native transaction
/// primitive; the engine only drives them through [`crate::uow::UnitOfWork`]
/// so that exactly one physical transaction spans each logical operation.
/// Queries are kind-, category-, and date-range-aware but not
/// ownership-aware; the engine applies the ownership filter itself.
pub trait RecordStore: Send + Sync {
    /// Begins a physical store transaction.
    fn begin(&self) -> Result<(), StoreError>;

    /// Commits the current physical transaction.
    fn commit(&self) -> Result<(), StoreError>;

    /// Rolls back the current physical transaction.
    fn rollback(&self) -> Result<(), StoreError>;

    /// Inserts a new record, assigning its identity.
    fn insert(&self, draft: RecordDraft) -> Result<FinancialRecord, StoreError>;

    /// Overwrites an existing record.
    fn update(&self, record: &FinancialRecord) -> Result<(), StoreError>;

    /// Removes a record. Removing an unknown id is not an error here; the
    /// engine checks existence first.
    fn remove(&self, id: RecordId) -> Result<(), StoreError>;

    /// Fetches a record by id.
    fn find(&self, id: RecordId) -> Result<Option<FinancialRecord>, StoreError>;

    /// Fetches every record.
    fn find_all(&self) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records of one kind.
    fn find_by_kind(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records in one category.
    fn find_by_category(&self, category: CategoryId) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records owned by one principal.
    fn find_by_owner(&self, owner: PrincipalId) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records in one status.
    fn find_by_status(&self, status: RecordStatus) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records whose `occurred_at` falls within `[start, end]`.
    fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Fetches records whose description contains `term` (case-insensitive).
    fn search_description(&self, term: &str) -> Result<Vec<FinancialRecord>, StoreError>;
}

/// Resolves the acting principal for the current call.
pub trait IdentityContext: Send + Sync {
    /// Returns the authenticated principal making the current call.
    fn current(&self) -> Result<Principal, StoreError>;
}

/// Read-only category resolution.
pub trait CategoryLookup: Send + Sync {
    /// Fetches a category by id.
    fn by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Fetches a category by its unique name.
    fn by_name(&self, name: &str) -> Result<Option<Category>, StoreError>;
}
