//! Status transition rules for the approval workflow.
//!
//! The state machine is small: a record enters `Active` or `Pending` at
//! creation, and only `Pending` records move again. `Active` and
//! `Rejected` are terminal; the audited administrative override in the
//! engine is the only thing that bypasses these rules.

use bursar_shared::types::RecordStatus;

use crate::record::validate_rejection_reason;
use crate::workflow::error::EngineError;

/// Stateless transition validation.
pub struct Transitions;

impl Transitions {
    /// Approves a pending record.
    ///
    /// # Returns
    /// * `Ok(RecordStatus::Active)` when the record is `Pending`
    /// * `Err(EngineError::InvalidTransition)` otherwise
    pub fn approve(current: RecordStatus) -> Result<RecordStatus, EngineError> {
        match current {
            RecordStatus::Pending => Ok(RecordStatus::Active),
            _ => Err(EngineError::InvalidTransition {
                from: current,
                to: RecordStatus::Active,
            }),
        }
    }

    /// Rejects a pending record with a reason.
    ///
    /// # Returns
    /// * `Ok((RecordStatus::Rejected, reason))` with the trimmed reason
    /// * `Err(EngineError::RejectionReasonRequired)` for an empty reason
    /// * `Err(EngineError::InvalidTransition)` when not `Pending`
    pub fn reject(current: RecordStatus, reason: &str) -> Result<(RecordStatus, String), EngineError> {
        validate_rejection_reason(reason)?;

        match current {
            RecordStatus::Pending => Ok((RecordStatus::Rejected, reason.trim().to_string())),
            _ => Err(EngineError::InvalidTransition {
                from: current,
                to: RecordStatus::Rejected,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Active (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid(from: RecordStatus, to: RecordStatus) -> bool {
        matches!(
            (from, to),
            (
                RecordStatus::Pending,
                RecordStatus::Active | RecordStatus::Rejected
            )
        )
    }
}
