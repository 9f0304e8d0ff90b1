//! Central authorization policy.
//!
//! Every role check in the engine routes through this one table; no
//! operation tests `role == Administrator` inline.

use bursar_shared::types::{Principal, PrincipalId};

use crate::workflow::error::EngineError;

/// An operation an actor may attempt, with its target where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a record owned by the given principal.
    CreateFor(PrincipalId),
    /// Read, update, or delete a record owned by the given principal.
    AccessRecord {
        /// The record's current owner.
        owner: PrincipalId,
    },
    /// List records across all owners.
    ListAll,
    /// List records owned by the given principal.
    ListForPrincipal(PrincipalId),
    /// Set, remove, or list spending limits.
    ManageLimits,
    /// Approve or reject pending records; list pending or rejected ones.
    Review,
    /// Batch update-status, delete, or move-category.
    Batch,
    /// Per-user or system-wide statistics and anomaly scans.
    Statistics,
    /// Change the global approval threshold.
    SetThreshold,
    /// Directly set a record status, bypassing the workflow.
    OverrideStatus,
    /// Reassign every record from one category to another.
    MoveCategory,
}

impl Action {
    /// Short name used in denial errors and audit logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateFor(_) => "create a record for another principal",
            Self::AccessRecord { .. } => "access this record",
            Self::ListAll => "list all records",
            Self::ListForPrincipal(_) => "list another principal's records",
            Self::ManageLimits => "manage spending limits",
            Self::Review => "review pending records",
            Self::Batch => "run batch operations",
            Self::Statistics => "view statistics",
            Self::SetThreshold => "change the approval threshold",
            Self::OverrideStatus => "override a record status",
            Self::MoveCategory => "move records between categories",
        }
    }
}

/// Policy table mapping (actor, action) to allow or deny.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// Creates the guard.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks whether `actor` may perform `action`.
    ///
    /// Inactive principals are denied everything. Denials carry the acting
    /// principal and the action name; the check runs before any mutation,
    /// so a denied operation has no side effects.
    pub fn authorize(&self, actor: &Principal, action: Action) -> Result<(), EngineError> {
        let allowed = actor.active
            && match action {
                Action::CreateFor(owner) | Action::AccessRecord { owner } => {
                    actor.role.is_administrator() || actor.id == owner
                }
                Action::ListForPrincipal(target) => {
                    actor.role.is_administrator() || actor.id == target
                }
                Action::ListAll
                | Action::ManageLimits
                | Action::Review
                | Action::Batch
                | Action::Statistics
                | Action::SetThreshold
                | Action::OverrideStatus
                | Action::MoveCategory => actor.role.is_administrator(),
            };

        if allowed {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                principal: actor.id,
                action: action.name(),
            })
        }
    }
}
