//! Error types for the workflow engine.
//!
//! One taxonomy covers every operation the engine exposes. Each variant
//! carries enough structured detail (the offending id, the computed
//! ceiling, the attempted transition) for a caller to render an actionable
//! message; the engine itself never formats user-facing text.

use rust_decimal::Decimal;
use thiserror::Error;

use bursar_shared::types::{CategoryId, PrincipalId, RecordId, RecordKind, RecordStatus};

use crate::store::StoreError;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No record exists with the given id.
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// The acting principal may not perform the operation.
    #[error("principal {principal} is not permitted to {action}")]
    Unauthorized {
        /// The principal that attempted the operation.
        principal: PrincipalId,
        /// The denied action, by name.
        action: &'static str,
    },

    /// Amounts must be strictly positive.
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The offending amount.
        amount: Decimal,
    },

    /// The referenced category does not exist.
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),

    /// Rejecting a record requires a non-empty reason.
    #[error("rejection reason is required")]
    RejectionReasonRequired,

    /// The amount breaches the owner's spending ceiling for this kind.
    #[error("amount {amount} exceeds the {kind} ceiling {ceiling}")]
    LimitExceeded {
        /// The attempted amount.
        amount: Decimal,
        /// The registered ceiling.
        ceiling: Decimal,
        /// The kind the ceiling applies to.
        kind: RecordKind,
    },

    /// Attempted an invalid status transition.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RecordStatus,
        /// The attempted target status.
        to: RecordStatus,
    },

    /// Opaque passthrough from an external collaborator.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount { .. }
            | Self::RejectionReasonRequired
            | Self::UnknownCategory(_)
            | Self::InvalidTransition { .. } => 400,
            Self::Unauthorized { .. } | Self::LimitExceeded { .. } => 403,
            Self::NotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found() {
        let err = EngineError::NotFound(RecordId::new());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_unauthorized() {
        let err = EngineError::Unauthorized {
            principal: PrincipalId::new(),
            action: "list all records",
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert!(err.to_string().contains("list all records"));
    }

    #[test]
    fn test_limit_exceeded() {
        let err = EngineError::LimitExceeded {
            amount: dec!(900),
            ceiling: dec!(500),
            kind: RecordKind::Expense,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "LIMIT_EXCEEDED");
        assert!(err.to_string().contains("900"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_invalid_transition() {
        let err = EngineError::InvalidTransition {
            from: RecordStatus::Rejected,
            to: RecordStatus::Active,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_store_passthrough() {
        let err = EngineError::from(StoreError::new("connection reset"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "STORE_FAILURE");
        assert!(err.to_string().contains("connection reset"));
    }
}
