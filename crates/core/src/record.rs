//! The financial record entity and its validation rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bursar_shared::types::{CategoryId, PrincipalId, RecordId, RecordKind, RecordStatus};

use crate::workflow::error::EngineError;

/// A single income or expense entry.
///
/// Committed records always satisfy:
/// - `amount > 0`
/// - `status == Rejected` implies a non-empty `rejection_reason`
/// - `kind` never changes after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Store-assigned identity, immutable after creation.
    pub id: RecordId,
    /// Positive, currency-agnostic fixed-point amount.
    pub amount: Decimal,
    /// Income or expense; fixed at creation.
    pub kind: RecordKind,
    /// Grouping category.
    pub category: CategoryId,
    /// Owning principal.
    pub owner: PrincipalId,
    /// When the underlying event happened.
    pub occurred_at: DateTime<Utc>,
    /// Optional free text.
    pub description: Option<String>,
    /// Workflow status.
    pub status: RecordStatus,
    /// Present exactly when `status == Rejected`.
    pub rejection_reason: Option<String>,
}

/// Input for creating a record.
///
/// `owner` defaults to the acting principal and `occurred_at` to the
/// creation time; `status` is decided by the approval policy, never by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Amount; must be positive.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: RecordKind,
    /// Grouping category.
    pub category: CategoryId,
    /// Explicit owner; only an administrator may set another principal.
    pub owner: Option<PrincipalId>,
    /// When the underlying event happened; defaults to now.
    pub occurred_at: Option<DateTime<Utc>>,
    /// Optional free text.
    pub description: Option<String>,
}

/// Input for updating a record.
///
/// Carries only the mutable fields. Kind and status are absent on purpose:
/// the kind is immutable and the status only changes through workflow
/// transitions or the audited administrative override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// The record to update.
    pub id: RecordId,
    /// New amount; must be positive.
    pub amount: Decimal,
    /// New category.
    pub category: CategoryId,
    /// New event time.
    pub occurred_at: DateTime<Utc>,
    /// New description.
    pub description: Option<String>,
    /// Owner reassignment; administrator-only when it differs from the
    /// existing owner.
    pub owner: Option<PrincipalId>,
}

/// A fully resolved record awaiting identity assignment by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// Positive amount.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: RecordKind,
    /// Grouping category.
    pub category: CategoryId,
    /// Owning principal.
    pub owner: PrincipalId,
    /// When the underlying event happened.
    pub occurred_at: DateTime<Utc>,
    /// Optional free text.
    pub description: Option<String>,
    /// Initial status decided by the approval policy.
    pub status: RecordStatus,
}

impl RecordDraft {
    /// Materializes the draft into a record with the given identity.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> FinancialRecord {
        FinancialRecord {
            id,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            owner: self.owner,
            occurred_at: self.occurred_at,
            description: self.description,
            status: self.status,
            rejection_reason: None,
        }
    }
}

/// Validates that an amount is strictly positive.
pub fn validate_amount(amount: Decimal) -> Result<(), EngineError> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::NonPositiveAmount { amount });
    }
    Ok(())
}

/// Validates that a rejection reason is non-empty after trimming.
pub fn validate_rejection_reason(reason: &str) -> Result<(), EngineError> {
    if reason.trim().is_empty() {
        return Err(EngineError::RejectionReasonRequired);
    }
    Ok(())
}
