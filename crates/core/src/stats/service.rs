//! Stateless aggregation functions.
//!
//! Every function takes a record snapshot and computes from it alone; the
//! engine decides which records a caller may see before handing them over.

use std::collections::HashMap;

use rust_decimal::Decimal;

use bursar_shared::types::{CategoryId, PrincipalId, RecordKind, RecordStatus};

use crate::record::FinancialRecord;
use crate::stats::types::{
    Anomaly, DistributionSlice, KindTotals, OwnerStatistics, SystemStatistics,
};

/// Namespace for the aggregation functions.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Income and expense sums over the snapshot.
    #[must_use]
    pub fn totals(records: &[FinancialRecord]) -> KindTotals {
        let mut totals = KindTotals::default();
        for record in records {
            match record.kind {
                RecordKind::Income => totals.income += record.amount,
                RecordKind::Expense => totals.expenses += record.amount,
            }
        }
        totals
    }

    /// Income and expense sums grouped by owner.
    #[must_use]
    pub fn totals_by_owner(records: &[FinancialRecord]) -> HashMap<PrincipalId, KindTotals> {
        let mut by_owner: HashMap<PrincipalId, KindTotals> = HashMap::new();
        for record in records {
            let totals = by_owner.entry(record.owner).or_default();
            match record.kind {
                RecordKind::Income => totals.income += record.amount,
                RecordKind::Expense => totals.expenses += record.amount,
            }
        }
        by_owner
    }

    /// Expense sums grouped by category, all statuses included.
    #[must_use]
    pub fn expenses_by_category(records: &[FinancialRecord]) -> HashMap<CategoryId, Decimal> {
        let mut by_category: HashMap<CategoryId, Decimal> = HashMap::new();
        for record in records {
            if record.kind == RecordKind::Expense {
                *by_category.entry(record.category).or_default() += record.amount;
            }
        }
        by_category
    }

    /// Percentage share of each category over active expenses.
    ///
    /// Only `Active` expense records count. Percentages are rounded to two
    /// decimal places, so slices sum to 100 only within rounding tolerance.
    /// A zero total yields an empty distribution.
    #[must_use]
    pub fn expense_distribution(records: &[FinancialRecord]) -> Vec<DistributionSlice> {
        let mut by_category: HashMap<CategoryId, Decimal> = HashMap::new();
        let mut total = Decimal::ZERO;
        for record in records {
            if record.kind == RecordKind::Expense && record.status == RecordStatus::Active {
                *by_category.entry(record.category).or_default() += record.amount;
                total += record.amount;
            }
        }

        if total.is_zero() {
            return Vec::new();
        }

        let mut slices: Vec<DistributionSlice> = by_category
            .into_iter()
            .map(|(category, amount)| DistributionSlice {
                category,
                amount,
                percentage: (amount / total * Decimal::ONE_HUNDRED).round_dp(2),
            })
            .collect();
        slices.sort_by(|a, b| b.amount.cmp(&a.amount));
        slices
    }

    /// Per-owner totals, record counts, and per-category sums.
    ///
    /// Sorted by owner id for stable output.
    #[must_use]
    pub fn owner_statistics(records: &[FinancialRecord]) -> Vec<OwnerStatistics> {
        let mut by_owner: HashMap<PrincipalId, OwnerStatistics> = HashMap::new();
        for record in records {
            let entry = by_owner
                .entry(record.owner)
                .or_insert_with(|| OwnerStatistics {
                    owner: record.owner,
                    totals: KindTotals::default(),
                    record_count: 0,
                    by_category: HashMap::new(),
                });
            entry.record_count += 1;
            match record.kind {
                RecordKind::Income => entry.totals.income += record.amount,
                RecordKind::Expense => entry.totals.expenses += record.amount,
            }
            *entry.by_category.entry(record.category).or_default() += record.amount;
        }

        let mut stats: Vec<OwnerStatistics> = by_owner.into_values().collect();
        stats.sort_by_key(|s| s.owner);
        stats
    }

    /// Record count, totals, and per-status counts over the snapshot.
    #[must_use]
    pub fn system_statistics(records: &[FinancialRecord]) -> SystemStatistics {
        let mut stats = SystemStatistics {
            record_count: records.len(),
            totals: Self::totals(records),
            by_status: HashMap::new(),
        };
        for record in records {
            *stats.by_status.entry(record.status).or_default() += 1;
        }
        stats
    }

    /// Records deviating from their owner's mean by more than
    /// `mean × threshold`.
    ///
    /// The mean is the arithmetic mean of all of the owner's record
    /// amounts regardless of status. Owners appear only through their own
    /// records, so the per-owner count is always positive. Sorted by
    /// descending deviation.
    #[must_use]
    pub fn anomalies(records: &[FinancialRecord], threshold: Decimal) -> Vec<Anomaly> {
        let mut sums: HashMap<PrincipalId, (Decimal, u32)> = HashMap::new();
        for record in records {
            let (sum, count) = sums.entry(record.owner).or_default();
            *sum += record.amount;
            *count += 1;
        }

        let means: HashMap<PrincipalId, Decimal> = sums
            .into_iter()
            .map(|(owner, (sum, count))| (owner, sum / Decimal::from(count)))
            .collect();

        let mut anomalies: Vec<Anomaly> = records
            .iter()
            .filter_map(|record| {
                let mean = *means.get(&record.owner)?;
                let deviation = (record.amount - mean).abs();
                (deviation > mean * threshold).then_some(Anomaly {
                    record: record.id,
                    owner: record.owner,
                    amount: record.amount,
                    mean,
                    deviation,
                })
            })
            .collect();
        anomalies.sort_by(|a, b| b.deviation.cmp(&a.deviation));
        anomalies
    }
}
