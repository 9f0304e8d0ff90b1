//! Property-based tests for classification and transitions.

use proptest::prelude::*;
use rust_decimal::Decimal;

use bursar_shared::types::RecordStatus;

use crate::workflow::approval::ApprovalPolicy;
use crate::workflow::transitions::Transitions;

fn any_decimal() -> impl Strategy<Value = Decimal> {
    // Two-decimal amounts up to one billion, the realistic input range.
    (0i64..=100_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn any_status() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        Just(RecordStatus::Active),
        Just(RecordStatus::Pending),
        Just(RecordStatus::Rejected),
    ]
}

proptest! {
    /// Classification is a pure function of amount and threshold.
    #[test]
    fn prop_classification_deterministic(amount in any_decimal(), threshold in any_decimal()) {
        let policy = ApprovalPolicy::new(threshold);
        let first = policy.classify(amount);
        let second = policy.classify(amount);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first == RecordStatus::Pending, amount > threshold);
    }

    /// Approve succeeds exactly from Pending and always lands on Active.
    #[test]
    fn prop_approve_only_from_pending(status in any_status()) {
        match Transitions::approve(status) {
            Ok(next) => {
                prop_assert_eq!(status, RecordStatus::Pending);
                prop_assert_eq!(next, RecordStatus::Active);
            }
            Err(_) => prop_assert_ne!(status, RecordStatus::Pending),
        }
    }

    /// Reject succeeds exactly from Pending with a non-blank reason.
    #[test]
    fn prop_reject_only_from_pending(status in any_status(), reason in ".{0,40}") {
        match Transitions::reject(status, &reason) {
            Ok((next, stored)) => {
                prop_assert_eq!(status, RecordStatus::Pending);
                prop_assert_eq!(next, RecordStatus::Rejected);
                prop_assert!(!stored.trim().is_empty());
            }
            Err(_) => {
                prop_assert!(status != RecordStatus::Pending || reason.trim().is_empty());
            }
        }
    }

    /// The transition table admits no move out of a terminal status.
    #[test]
    fn prop_terminal_statuses_never_move(to in any_status()) {
        prop_assert!(!Transitions::is_valid(RecordStatus::Active, to));
        prop_assert!(!Transitions::is_valid(RecordStatus::Rejected, to));
    }
}
