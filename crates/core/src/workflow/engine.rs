//! The transaction workflow engine.
//!
//! Orchestrates create/read/update/delete and bulk operations, applying
//! authorization, limit checks, and the approval policy around store calls.
//! Every mutating operation runs inside exactly one unit of work; batch
//! operations reenter it per element, so a mid-batch failure rolls back the
//! whole call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use bursar_shared::types::{
    CategoryId, Principal, PrincipalId, RecordId, RecordKind, RecordStatus,
};

use crate::authz::{Action, AuthorizationGuard};
use crate::limits::{LimitEntry, LimitRegistry};
use crate::record::{self, FinancialRecord, NewRecord, RecordDraft, RecordUpdate};
use crate::stats::{Anomaly, DistributionSlice, OwnerStatistics, StatisticsEngine, SystemStatistics};
use crate::store::{CategoryLookup, IdentityContext, RecordStore};
use crate::uow::{UnitOfWork, UowScope};
use crate::workflow::approval::ApprovalPolicy;
use crate::workflow::error::EngineError;
use crate::workflow::transitions::Transitions;

/// Predicate for the `search` query.
///
/// Subsumes the per-kind, per-category, per-status, and per-date-range
/// query family: unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive substring of the description.
    pub text: Option<String>,
    /// Match a single kind.
    pub kind: Option<RecordKind>,
    /// Match a single category.
    pub category: Option<CategoryId>,
    /// Match a single status.
    pub status: Option<RecordStatus>,
    /// Inclusive lower bound on `occurred_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurred_at`.
    pub to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Returns true when the record satisfies every set field.
    #[must_use]
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = record
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.kind.is_some_and(|k| k != record.kind) {
            return false;
        }
        if self.category.is_some_and(|c| c != record.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.from.is_some_and(|from| record.occurred_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.occurred_at > to) {
            return false;
        }
        true
    }
}

/// Central service for the record lifecycle.
///
/// All collaborators are explicit constructor dependencies; the engine
/// carries no ambient statics, so multiple independent instances can
/// coexist in one process.
pub struct TransactionWorkflowEngine<S, I, C> {
    identity: I,
    categories: C,
    uow: UnitOfWork<S>,
    limits: Arc<LimitRegistry>,
    policy: Arc<ApprovalPolicy>,
    guard: AuthorizationGuard,
}

impl<S, I, C> TransactionWorkflowEngine<S, I, C>
where
    S: RecordStore,
    I: IdentityContext,
    C: CategoryLookup,
{
    /// Wires the engine from its collaborators.
    pub fn new(
        store: Arc<S>,
        identity: I,
        categories: C,
        limits: Arc<LimitRegistry>,
        policy: Arc<ApprovalPolicy>,
    ) -> Self {
        Self {
            identity,
            categories,
            uow: UnitOfWork::new(store),
            limits,
            policy,
            guard: AuthorizationGuard::new(),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Creates a record.
    ///
    /// The owner defaults to the acting principal; only an administrator
    /// may create for someone else. The amount is checked against the
    /// owner's spending ceiling, and the approval policy decides whether
    /// the record enters `Active` or `Pending`.
    pub fn create(&self, input: NewRecord) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        let owner = input.owner.unwrap_or(actor.id);
        debug!(%owner, kind = %input.kind, amount = %input.amount, "creating record");

        self.guard.authorize(&actor, Action::CreateFor(owner))?;
        record::validate_amount(input.amount)?;
        self.require_category(input.category)?;

        if !self.limits.check(owner, input.kind, input.amount) {
            let ceiling = self.limits.ceiling(owner, input.kind).unwrap_or_default();
            return Err(EngineError::LimitExceeded {
                amount: input.amount,
                ceiling,
                kind: input.kind,
            });
        }

        let draft = RecordDraft {
            amount: input.amount,
            kind: input.kind,
            category: input.category,
            owner,
            occurred_at: input.occurred_at.unwrap_or_else(Utc::now),
            description: input.description,
            status: self.policy.classify(input.amount),
        };
        self.uow.run(|scope| Ok(scope.store().insert(draft)?))
    }

    /// Updates a record's mutable fields.
    ///
    /// Authorization runs against the record's existing owner, never a
    /// caller-supplied one. Kind and status are untouched by design.
    pub fn update(&self, input: RecordUpdate) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        debug!(id = %input.id, "updating record");

        record::validate_amount(input.amount)?;
        self.require_category(input.category)?;

        self.uow.run(|scope| self.update_in(scope, &actor, input))
    }

    fn update_in(
        &self,
        scope: &mut UowScope<'_, S>,
        actor: &Principal,
        input: RecordUpdate,
    ) -> Result<FinancialRecord, EngineError> {
        let existing = self.load(scope, input.id)?;
        self.guard.authorize(
            actor,
            Action::AccessRecord {
                owner: existing.owner,
            },
        )?;

        let owner = match input.owner {
            Some(new_owner) if new_owner != existing.owner => {
                self.guard.authorize(actor, Action::CreateFor(new_owner))?;
                new_owner
            }
            _ => existing.owner,
        };

        let updated = FinancialRecord {
            id: existing.id,
            amount: input.amount,
            kind: existing.kind,
            category: input.category,
            owner,
            occurred_at: input.occurred_at,
            description: input.description,
            status: existing.status,
            rejection_reason: existing.rejection_reason,
        };
        scope.store().update(&updated)?;
        Ok(updated)
    }

    /// Deletes a record.
    pub fn delete(&self, id: RecordId) -> Result<(), EngineError> {
        let actor = self.identity.current()?;
        debug!(%id, "deleting record");
        self.uow.run(|scope| self.delete_in(scope, &actor, id))
    }

    fn delete_in(
        &self,
        scope: &mut UowScope<'_, S>,
        actor: &Principal,
        id: RecordId,
    ) -> Result<(), EngineError> {
        let existing = self.load(scope, id)?;
        self.guard.authorize(
            actor,
            Action::AccessRecord {
                owner: existing.owner,
            },
        )?;
        scope.store().remove(id)?;
        Ok(())
    }

    /// Approves a pending record.
    pub fn approve(&self, id: RecordId) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Review)?;
        debug!(%id, approver = %actor.id, "approving record");

        self.uow.run(|scope| {
            let mut record = self.load(scope, id)?;
            record.status = Transitions::approve(record.status)?;
            record.rejection_reason = None;
            scope.store().update(&record)?;
            Ok(record)
        })
    }

    /// Rejects a pending record with a reason.
    pub fn reject(&self, id: RecordId, reason: &str) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Review)?;
        debug!(%id, reviewer = %actor.id, "rejecting record");

        self.uow.run(|scope| {
            let mut record = self.load(scope, id)?;
            let (status, reason) = Transitions::reject(record.status, reason)?;
            record.status = status;
            record.rejection_reason = Some(reason);
            scope.store().update(&record)?;
            Ok(record)
        })
    }

    /// Directly sets a record's status, bypassing the workflow.
    ///
    /// An administrative escape hatch for corrective edits, kept apart
    /// from `approve`/`reject` and audited on every use. Overriding to
    /// `Rejected` still requires a reason; overriding away from it clears
    /// the stored reason.
    pub fn override_status(
        &self,
        id: RecordId,
        status: RecordStatus,
        reason: Option<&str>,
    ) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::OverrideStatus)?;

        self.uow
            .run(|scope| self.override_status_in(scope, &actor, id, status, reason))
    }

    fn override_status_in(
        &self,
        scope: &mut UowScope<'_, S>,
        actor: &Principal,
        id: RecordId,
        status: RecordStatus,
        reason: Option<&str>,
    ) -> Result<FinancialRecord, EngineError> {
        let mut record = self.load(scope, id)?;
        warn!(
            principal = %actor.id,
            record = %id,
            from = %record.status,
            to = %status,
            "status override"
        );

        if status == RecordStatus::Rejected {
            let reason = reason.unwrap_or_default();
            record::validate_rejection_reason(reason)?;
            record.rejection_reason = Some(reason.trim().to_string());
        } else {
            record.rejection_reason = None;
        }
        record.status = status;
        scope.store().update(&record)?;
        Ok(record)
    }

    /// Sets every listed record's status inside one atomic unit of work.
    ///
    /// Administrator-only and all-or-nothing: any failure rolls back the
    /// entire batch. Uses override semantics, so a `Rejected` target needs
    /// a reason.
    pub fn batch_update_status(
        &self,
        ids: &[RecordId],
        status: RecordStatus,
        reason: Option<&str>,
    ) -> Result<usize, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Batch)?;
        debug!(count = ids.len(), target = %status, "batch status update");

        self.uow.run(|scope| {
            for &id in ids {
                scope.nested(|inner| {
                    self.override_status_in(inner, &actor, id, status, reason)
                        .map(|_| ())
                })?;
            }
            Ok(ids.len())
        })
    }

    /// Deletes every listed record inside one atomic unit of work.
    pub fn batch_delete(&self, ids: &[RecordId]) -> Result<usize, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Batch)?;
        debug!(count = ids.len(), "batch delete");

        self.uow.run(|scope| {
            for &id in ids {
                scope.nested(|inner| self.delete_in(inner, &actor, id))?;
            }
            Ok(ids.len())
        })
    }

    /// Moves every listed record to a category inside one atomic unit of
    /// work.
    pub fn batch_move_category(
        &self,
        ids: &[RecordId],
        category: CategoryId,
    ) -> Result<usize, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Batch)?;
        self.require_category(category)?;
        debug!(count = ids.len(), %category, "batch move");

        self.uow.run(|scope| {
            for &id in ids {
                scope.nested(|inner| {
                    let mut record = self.load(inner, id)?;
                    record.category = category;
                    inner.store().update(&record)?;
                    Ok(())
                })?;
            }
            Ok(ids.len())
        })
    }

    /// Reassigns every record in `from` to `to`, e.g. when a category is
    /// retired. Records are never deleted by this operation.
    pub fn move_category(
        &self,
        from: CategoryId,
        to: CategoryId,
    ) -> Result<usize, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::MoveCategory)?;
        self.require_category(to)?;
        debug!(%from, %to, "moving category");

        self.uow.run(|scope| {
            let records = scope.store().find_by_category(from)?;
            let moved = records.len();
            for mut record in records {
                record.category = to;
                scope.store().update(&record)?;
            }
            Ok(moved)
        })
    }

    // ------------------------------------------------------------------
    // Limits and threshold
    // ------------------------------------------------------------------

    /// Registers a spending ceiling for a principal and kind.
    pub fn set_limit(
        &self,
        principal: PrincipalId,
        kind: RecordKind,
        ceiling: Decimal,
    ) -> Result<(), EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::ManageLimits)?;
        record::validate_amount(ceiling)?;
        debug!(%principal, %kind, %ceiling, "setting limit");

        self.limits.set(principal, kind, ceiling);
        Ok(())
    }

    /// Removes a spending ceiling; no-op if absent.
    pub fn remove_limit(&self, principal: PrincipalId, kind: RecordKind) -> Result<(), EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::ManageLimits)?;
        debug!(%principal, %kind, "removing limit");

        self.limits.remove(principal, kind);
        Ok(())
    }

    /// Snapshot of every registered ceiling.
    pub fn limits(&self) -> Result<Vec<LimitEntry>, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::ManageLimits)?;
        Ok(self.limits.snapshot())
    }

    /// Changes the global approval threshold for future creations.
    pub fn set_approval_threshold(&self, value: Decimal) -> Result<(), EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::SetThreshold)?;
        debug!(%value, "setting approval threshold");

        self.policy.set_threshold(value);
        Ok(())
    }

    /// The current approval threshold.
    #[must_use]
    pub fn approval_threshold(&self) -> Decimal {
        self.policy.threshold()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Fetches one record; the caller must be its owner or an
    /// administrator.
    pub fn get(&self, id: RecordId) -> Result<FinancialRecord, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let record = self.load(scope, id)?;
            self.guard.authorize(
                &actor,
                Action::AccessRecord {
                    owner: record.owner,
                },
            )?;
            Ok(record)
        })
    }

    /// Lists the caller's own records.
    pub fn list_own(&self) -> Result<Vec<FinancialRecord>, EngineError> {
        let actor = self.identity.current()?;
        self.uow
            .run(|scope| Ok(scope.store().find_by_owner(actor.id)?))
    }

    /// Lists another principal's records (administrator, or self).
    pub fn list_for_principal(
        &self,
        target: PrincipalId,
    ) -> Result<Vec<FinancialRecord>, EngineError> {
        let actor = self.identity.current()?;
        self.guard
            .authorize(&actor, Action::ListForPrincipal(target))?;
        self.uow
            .run(|scope| Ok(scope.store().find_by_owner(target)?))
    }

    /// Lists every record across all owners (administrator only).
    pub fn list_all(&self) -> Result<Vec<FinancialRecord>, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::ListAll)?;
        self.uow.run(|scope| Ok(scope.store().find_all()?))
    }

    /// Lists records awaiting approval (administrator only).
    pub fn list_pending(&self) -> Result<Vec<FinancialRecord>, EngineError> {
        self.list_by_status(RecordStatus::Pending)
    }

    /// Lists rejected records (administrator only).
    pub fn list_rejected(&self) -> Result<Vec<FinancialRecord>, EngineError> {
        self.list_by_status(RecordStatus::Rejected)
    }

    fn list_by_status(&self, status: RecordStatus) -> Result<Vec<FinancialRecord>, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Review)?;
        self.uow
            .run(|scope| Ok(scope.store().find_by_status(status)?))
    }

    /// Searches records by filter.
    ///
    /// The ownership scope is applied here, after the store fetch: a
    /// non-administrator only ever sees their own records.
    pub fn search(&self, filter: &RecordFilter) -> Result<Vec<FinancialRecord>, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let mut records = self.visible_records(scope, &actor)?;
            records.retain(|r| filter.matches(r));
            Ok(records)
        })
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Income minus expenses over the caller's visible records.
    pub fn balance(&self) -> Result<Decimal, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let records = self.visible_records(scope, &actor)?;
            Ok(StatisticsEngine::totals(&records).balance())
        })
    }

    /// Total income over the caller's visible records.
    pub fn total_income(&self) -> Result<Decimal, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let records = self.visible_records(scope, &actor)?;
            Ok(StatisticsEngine::totals(&records).income)
        })
    }

    /// Total expenses over the caller's visible records.
    pub fn total_expenses(&self) -> Result<Decimal, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let records = self.visible_records(scope, &actor)?;
            Ok(StatisticsEngine::totals(&records).expenses)
        })
    }

    /// Expense sums grouped by category over the caller's visible records.
    pub fn expenses_by_category(
        &self,
    ) -> Result<HashMap<CategoryId, Decimal>, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let records = self.visible_records(scope, &actor)?;
            Ok(StatisticsEngine::expenses_by_category(&records))
        })
    }

    /// Percentage-of-total per category over active expenses.
    pub fn expense_distribution(&self) -> Result<Vec<DistributionSlice>, EngineError> {
        let actor = self.identity.current()?;
        self.uow.run(|scope| {
            let records = self.visible_records(scope, &actor)?;
            Ok(StatisticsEngine::expense_distribution(&records))
        })
    }

    /// Per-owner statistics over a date range (administrator only).
    pub fn owner_statistics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OwnerStatistics>, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Statistics)?;
        self.uow.run(|scope| {
            let records = scope.store().find_by_date_range(start, end)?;
            Ok(StatisticsEngine::owner_statistics(&records))
        })
    }

    /// System-wide statistics over a date range (administrator only).
    pub fn system_statistics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SystemStatistics, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Statistics)?;
        self.uow.run(|scope| {
            let records = scope.store().find_by_date_range(start, end)?;
            Ok(StatisticsEngine::system_statistics(&records))
        })
    }

    /// Records deviating from their owner's mean by more than
    /// `mean × threshold` (administrator only).
    pub fn anomalies(&self, threshold: Decimal) -> Result<Vec<Anomaly>, EngineError> {
        let actor = self.identity.current()?;
        self.guard.authorize(&actor, Action::Statistics)?;
        self.uow.run(|scope| {
            let records = scope.store().find_all()?;
            Ok(StatisticsEngine::anomalies(&records, threshold))
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn load(
        &self,
        scope: &mut UowScope<'_, S>,
        id: RecordId,
    ) -> Result<FinancialRecord, EngineError> {
        scope
            .store()
            .find(id)?
            .ok_or(EngineError::NotFound(id))
    }

    fn require_category(&self, id: CategoryId) -> Result<(), EngineError> {
        if self.categories.by_id(id)?.is_none() {
            return Err(EngineError::UnknownCategory(id));
        }
        Ok(())
    }

    fn visible_records(
        &self,
        scope: &mut UowScope<'_, S>,
        actor: &Principal,
    ) -> Result<Vec<FinancialRecord>, EngineError> {
        if actor.is_administrator() {
            Ok(scope.store().find_all()?)
        } else {
            Ok(scope.store().find_by_owner(actor.id)?)
        }
    }
}
