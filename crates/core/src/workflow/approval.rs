//! Approval policy: the global threshold and initial status decision.

use arc_swap::ArcSwap;
use rust_decimal::Decimal;
use std::sync::Arc;

use bursar_shared::config::ApprovalConfig;
use bursar_shared::types::RecordStatus;

/// Decides the initial status of a new record and holds the mutable
/// process-wide approval threshold.
///
/// The threshold lives in an atomic reference so that concurrent
/// classification never takes a lock. Changing it affects future
/// classifications only; existing records are never reclassified.
#[derive(Debug)]
pub struct ApprovalPolicy {
    threshold: ArcSwap<Decimal>,
}

impl ApprovalPolicy {
    /// Creates a policy with the given threshold.
    #[must_use]
    pub fn new(threshold: Decimal) -> Self {
        Self {
            threshold: ArcSwap::from_pointee(threshold),
        }
    }

    /// Creates a policy from configuration.
    #[must_use]
    pub fn from_config(config: &ApprovalConfig) -> Self {
        Self::new(config.threshold)
    }

    /// The current threshold.
    #[must_use]
    pub fn threshold(&self) -> Decimal {
        **self.threshold.load()
    }

    /// Replaces the threshold. Authorization is the engine's job.
    pub fn set_threshold(&self, value: Decimal) {
        self.threshold.store(Arc::new(value));
    }

    /// Classifies a new record's initial status.
    ///
    /// `Pending` exactly when the amount exceeds the threshold.
    #[must_use]
    pub fn classify(&self, amount: Decimal) -> RecordStatus {
        if amount > self.threshold() {
            RecordStatus::Pending
        } else {
            RecordStatus::Active
        }
    }
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self::from_config(&ApprovalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_below_threshold_is_active() {
        let policy = ApprovalPolicy::new(dec!(10000));
        assert_eq!(policy.classify(dec!(500)), RecordStatus::Active);
        assert_eq!(policy.classify(dec!(10000)), RecordStatus::Active);
    }

    #[test]
    fn test_classify_above_threshold_is_pending() {
        let policy = ApprovalPolicy::new(dec!(10000));
        assert_eq!(policy.classify(dec!(10000.01)), RecordStatus::Pending);
        assert_eq!(policy.classify(dec!(15000)), RecordStatus::Pending);
    }

    #[test]
    fn test_set_threshold_affects_future_classification() {
        let policy = ApprovalPolicy::new(dec!(10000));
        policy.set_threshold(dec!(100));

        assert_eq!(policy.threshold(), dec!(100));
        assert_eq!(policy.classify(dec!(500)), RecordStatus::Pending);
    }

    #[test]
    fn test_default_uses_config_default() {
        let policy = ApprovalPolicy::default();
        assert_eq!(policy.threshold(), dec!(10000));
    }
}
