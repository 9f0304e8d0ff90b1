//! Per-principal, per-kind spending ceilings.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bursar_shared::types::{PrincipalId, RecordKind};

/// One registered ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitEntry {
    /// The principal the ceiling applies to.
    pub principal: PrincipalId,
    /// The record kind the ceiling applies to.
    pub kind: RecordKind,
    /// Maximum permitted single-record amount.
    pub ceiling: Decimal,
}

/// In-memory registry of spending ceilings.
///
/// `check` sits on the hot path of every creation, so the registry uses a
/// sharded concurrent map rather than a single global lock; operations are
/// linearizable per `(principal, kind)` key. State lives for the process
/// lifetime and is not persisted. Authorization is the engine's job, not
/// the registry's.
#[derive(Debug, Default)]
pub struct LimitRegistry {
    ceilings: DashMap<(PrincipalId, RecordKind), Decimal>,
}

impl LimitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a ceiling, overwriting any existing one for the pair.
    pub fn set(&self, principal: PrincipalId, kind: RecordKind, ceiling: Decimal) {
        self.ceilings.insert((principal, kind), ceiling);
    }

    /// Removes a ceiling; no-op if none is registered.
    pub fn remove(&self, principal: PrincipalId, kind: RecordKind) {
        self.ceilings.remove(&(principal, kind));
    }

    /// Returns the ceiling registered for the pair, if any.
    #[must_use]
    pub fn ceiling(&self, principal: PrincipalId, kind: RecordKind) -> Option<Decimal> {
        self.ceilings.get(&(principal, kind)).map(|c| *c)
    }

    /// Returns true when no ceiling is registered for the pair or the
    /// amount does not exceed it.
    #[must_use]
    pub fn check(&self, principal: PrincipalId, kind: RecordKind, amount: Decimal) -> bool {
        match self.ceiling(principal, kind) {
            Some(ceiling) => amount <= ceiling,
            None => true,
        }
    }

    /// Snapshot of every registered ceiling.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LimitEntry> {
        self.ceilings
            .iter()
            .map(|entry| {
                let ((principal, kind), ceiling) = (*entry.key(), *entry.value());
                LimitEntry {
                    principal,
                    kind,
                    ceiling,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_check_passes_without_ceiling() {
        let registry = LimitRegistry::new();
        assert!(registry.check(PrincipalId::new(), RecordKind::Expense, dec!(1000000)));
    }

    #[test]
    fn test_check_against_ceiling() {
        let registry = LimitRegistry::new();
        let alice = PrincipalId::new();
        registry.set(alice, RecordKind::Expense, dec!(500));

        assert!(registry.check(alice, RecordKind::Expense, dec!(500)));
        assert!(!registry.check(alice, RecordKind::Expense, dec!(500.01)));
    }

    #[test]
    fn test_ceiling_is_per_kind() {
        let registry = LimitRegistry::new();
        let alice = PrincipalId::new();
        registry.set(alice, RecordKind::Expense, dec!(500));

        // Income is not capped by an expense ceiling.
        assert!(registry.check(alice, RecordKind::Income, dec!(9000)));
    }

    #[test]
    fn test_set_overwrites() {
        let registry = LimitRegistry::new();
        let alice = PrincipalId::new();
        registry.set(alice, RecordKind::Expense, dec!(500));
        registry.set(alice, RecordKind::Expense, dec!(800));

        assert_eq!(registry.ceiling(alice, RecordKind::Expense), Some(dec!(800)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = LimitRegistry::new();
        let alice = PrincipalId::new();
        registry.set(alice, RecordKind::Expense, dec!(500));
        registry.remove(alice, RecordKind::Expense);
        registry.remove(alice, RecordKind::Expense);

        assert_eq!(registry.ceiling(alice, RecordKind::Expense), None);
        assert!(registry.check(alice, RecordKind::Expense, dec!(501)));
    }

    #[test]
    fn test_snapshot_lists_all_entries() {
        let registry = LimitRegistry::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        registry.set(alice, RecordKind::Expense, dec!(500));
        registry.set(bob, RecordKind::Income, dec!(2000));

        let mut entries = registry.snapshot();
        entries.sort_by_key(|e| e.ceiling);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ceiling, dec!(500));
        assert_eq!(entries[1].principal, bob);
    }

    #[test]
    fn test_concurrent_set_and_check() {
        use std::sync::Arc;

        let registry = Arc::new(LimitRegistry::new());
        let alice = PrincipalId::new();

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        registry.set(alice, RecordKind::Expense, Decimal::from(100 + i));
                    }
                })
            })
            .collect();

        for _ in 0..1000 {
            // Any interleaving must observe either no ceiling or one of the
            // written values; check must never panic or deadlock.
            let _ = registry.check(alice, RecordKind::Expense, dec!(50));
        }

        for writer in writers {
            writer.join().unwrap();
        }

        let ceiling = registry.ceiling(alice, RecordKind::Expense).unwrap();
        assert!(ceiling >= dec!(100) && ceiling <= dec!(103));
    }
}
