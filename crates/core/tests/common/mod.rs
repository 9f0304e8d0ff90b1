//! Test doubles for driving the engine end to end.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use bursar_core::record::{FinancialRecord, RecordDraft};
use bursar_core::store::{CategoryLookup, IdentityContext, RecordStore, StoreError};
use bursar_shared::types::{
    Category, CategoryId, Principal, PrincipalId, RecordId, RecordKind, RecordStatus,
};

/// In-memory store with real snapshot-based transactions.
///
/// `begin` snapshots the record map and `rollback` restores it, so batch
/// atomicity is observable: a failed batch leaves the map exactly as it
/// was. Transaction calls are counted to assert reentrancy.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RecordId, FinancialRecord>>,
    snapshot: Mutex<Option<HashMap<RecordId, FinancialRecord>>>,
    pub begins: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<RecordId, FinancialRecord>> {
        self.records.lock().unwrap()
    }

    /// Number of records currently committed or staged.
    pub fn len(&self) -> usize {
        self.lock_records().len()
    }
}

impl RecordStore for MemoryStore {
    fn begin(&self) -> Result<(), StoreError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.lock().unwrap() = Some(self.lock_records().clone());
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.lock().unwrap() = None;
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        let snapshot = self
            .snapshot
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| StoreError::new("rollback without active transaction"))?;
        *self.lock_records() = snapshot;
        Ok(())
    }

    fn insert(&self, draft: RecordDraft) -> Result<FinancialRecord, StoreError> {
        let record = draft.into_record(RecordId::new());
        self.lock_records().insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: &FinancialRecord) -> Result<(), StoreError> {
        let mut records = self.lock_records();
        if !records.contains_key(&record.id) {
            return Err(StoreError::new("update of unknown record"));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn remove(&self, id: RecordId) -> Result<(), StoreError> {
        self.lock_records().remove(&id);
        Ok(())
    }

    fn find(&self, id: RecordId) -> Result<Option<FinancialRecord>, StoreError> {
        Ok(self.lock_records().get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<FinancialRecord>, StoreError> {
        let mut records: Vec<_> = self.lock_records().values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn find_by_kind(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.kind == kind)
            .collect())
    }

    fn find_by_category(&self, category: CategoryId) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.category == category)
            .collect())
    }

    fn find_by_owner(&self, owner: PrincipalId) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect())
    }

    fn find_by_status(&self, status: RecordStatus) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.status == status)
            .collect())
    }

    fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.occurred_at >= start && r.occurred_at <= end)
            .collect())
    }

    fn search_description(&self, term: &str) -> Result<Vec<FinancialRecord>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| {
                r.description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

/// Identity context returning one fixed principal.
pub struct FixedIdentity {
    principal: Principal,
}

impl FixedIdentity {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

impl IdentityContext for FixedIdentity {
    fn current(&self) -> Result<Principal, StoreError> {
        Ok(self.principal.clone())
    }
}

/// Category lookup over a fixed set.
#[derive(Default)]
pub struct StaticCategories {
    categories: HashMap<CategoryId, Category>,
}

impl StaticCategories {
    pub fn of(categories: &[Category]) -> Self {
        Self {
            categories: categories.iter().map(|c| (c.id, c.clone())).collect(),
        }
    }
}

impl CategoryLookup for StaticCategories {
    fn by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.get(&id).cloned())
    }

    fn by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.values().find(|c| c.name == name).cloned())
    }
}
