//! Walkthrough of the Bursar workflow engine.
//!
//! Wires the engine to an in-memory store, then plays through the record
//! lifecycle: a member files expenses, a large one lands in the approval
//! queue, an administrator reviews it, spending limits kick in, and the
//! statistics come out at the end.
//!
//! Usage: cargo run --bin demo

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bursar_core::limits::LimitRegistry;
use bursar_core::record::{FinancialRecord, NewRecord, RecordDraft};
use bursar_core::store::{CategoryLookup, IdentityContext, RecordStore, StoreError};
use bursar_core::workflow::{ApprovalPolicy, EngineError, TransactionWorkflowEngine};
use bursar_shared::EngineConfig;
use bursar_shared::types::{
    Category, CategoryId, Principal, PrincipalId, RecordId, RecordKind, RecordStatus, Role,
};

/// In-memory record store with snapshot-based transactions.
#[derive(Default)]
struct MemoryLedger {
    records: Mutex<HashMap<RecordId, FinancialRecord>>,
    snapshot: Mutex<Option<HashMap<RecordId, FinancialRecord>>>,
}

impl MemoryLedger {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<RecordId, FinancialRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::new("ledger lock poisoned"))
    }

    fn all(&self) -> Result<Vec<FinancialRecord>, StoreError> {
        let mut records: Vec<_> = self.lock()?.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

impl RecordStore for MemoryLedger {
    fn begin(&self) -> Result<(), StoreError> {
        let current = self.lock()?.clone();
        *self
            .snapshot
            .lock()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))? = Some(current);
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        *self
            .snapshot
            .lock()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))? = None;
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        let snapshot = self
            .snapshot
            .lock()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))?
            .take()
            .ok_or_else(|| StoreError::new("rollback without active transaction"))?;
        *self.lock()? = snapshot;
        Ok(())
    }

    fn insert(&self, draft: RecordDraft) -> Result<FinancialRecord, StoreError> {
        let record = draft.into_record(RecordId::new());
        self.lock()?.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: &FinancialRecord) -> Result<(), StoreError> {
        self.lock()?.insert(record.id, record.clone());
        Ok(())
    }

    fn remove(&self, id: RecordId) -> Result<(), StoreError> {
        self.lock()?.remove(&id);
        Ok(())
    }

    fn find(&self, id: RecordId) -> Result<Option<FinancialRecord>, StoreError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<FinancialRecord>, StoreError> {
        self.all()
    }

    fn find_by_kind(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self.all()?.into_iter().filter(|r| r.kind == kind).collect())
    }

    fn find_by_category(&self, category: CategoryId) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.category == category)
            .collect())
    }

    fn find_by_owner(&self, owner: PrincipalId) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect())
    }

    fn find_by_status(&self, status: RecordStatus) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .all()?
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
            .all()?
            .into_iter()
            .filter(|r| r.occurred_at >= start && r.occurred_at <= end)
            .collect())
    }

    fn search_description(&self, term: &str) -> Result<Vec<FinancialRecord>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| {
                r.description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

/// Identity context for a single fixed caller.
struct Caller(Principal);

impl IdentityContext for Caller {
    fn current(&self) -> Result<Principal, StoreError> {
        Ok(self.0)
    }
}

/// Category lookup over a fixed catalog.
struct Catalog(Vec<Category>);

impl CategoryLookup for Catalog {
    fn by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.0.iter().find(|c| c.id == id).cloned())
    }

    fn by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.0.iter().find(|c| c.name == name).cloned())
    }
}

fn expense(category: CategoryId, amount: rust_decimal::Decimal, what: &str) -> NewRecord {
    NewRecord {
        amount,
        kind: RecordKind::Expense,
        category,
        owner: None,
        occurred_at: None,
        description: Some(what.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bursar=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::load()?;
    info!(
        approval_threshold = %config.approval.threshold,
        anomaly_threshold = %config.anomaly.threshold,
        "configuration loaded"
    );

    let store = Arc::new(MemoryLedger::default());
    let limits = Arc::new(LimitRegistry::new());
    let policy = Arc::new(ApprovalPolicy::from_config(&config.approval));

    let groceries = Category::new("Groceries");
    let tuition = Category::new("Tuition");
    let catalog = vec![groceries.clone(), tuition.clone()];

    let alice = Principal::new(PrincipalId::new(), Role::Member);
    let admin = Principal::new(PrincipalId::new(), Role::Administrator);
    let engine_for = |who: Principal| {
        TransactionWorkflowEngine::new(
            Arc::clone(&store),
            Caller(who),
            Catalog(catalog.clone()),
            Arc::clone(&limits),
            Arc::clone(&policy),
        )
    };
    let as_alice = engine_for(alice);
    let as_admin = engine_for(admin);

    // A small expense clears immediately.
    let small = as_alice.create(expense(groceries.id, dec!(42.50), "weekly shop"))?;
    info!(id = %small.id, status = %small.status, "small expense filed");

    // A large one waits for review.
    let large = as_alice.create(expense(tuition.id, dec!(15000), "spring tuition"))?;
    info!(id = %large.id, status = %large.status, "large expense filed");
    println!("{}", serde_json::to_string_pretty(&large)?);

    let rejected = as_admin.reject(large.id, "duplicate of the invoice paid last week")?;
    info!(
        id = %rejected.id,
        reason = rejected.rejection_reason.as_deref().unwrap_or(""),
        "expense rejected"
    );

    // A spending ceiling turns away oversized expenses outright.
    as_admin.set_limit(alice.id, RecordKind::Expense, dec!(500))?;
    match as_alice.create(expense(groceries.id, dec!(750), "new laptop")) {
        Err(EngineError::LimitExceeded { ceiling, .. }) => {
            info!(%ceiling, "expense blocked by spending limit");
        }
        other => anyhow::bail!("expected a limit breach, got {other:?}"),
    }

    as_alice.create(expense(groceries.id, dec!(120), "textbooks"))?;

    info!(balance = %as_alice.balance()?, "member balance");
    for slice in as_alice.expense_distribution()? {
        info!(category = %slice.category, percent = %slice.percentage, "distribution slice");
    }

    let anomalies = as_admin.anomalies(config.anomaly.threshold)?;
    info!(count = anomalies.len(), "anomaly scan complete");

    Ok(())
}
