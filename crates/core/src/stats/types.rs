//! Aggregate result types for the statistics engine.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bursar_shared::types::{CategoryId, PrincipalId, RecordId, RecordStatus};

/// Income and expense sums over one set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KindTotals {
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of expense amounts.
    pub expenses: Decimal,
}

impl KindTotals {
    /// Income minus expenses.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// One category's share of active expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSlice {
    /// The category.
    pub category: CategoryId,
    /// Summed active expense amount in the category.
    pub amount: Decimal,
    /// Share of the active expense total, in percent, two decimal places.
    pub percentage: Decimal,
}

/// Per-owner aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerStatistics {
    /// The owner.
    pub owner: PrincipalId,
    /// Income and expense sums for this owner.
    pub totals: KindTotals,
    /// Number of records owned.
    pub record_count: usize,
    /// Summed amounts per category, both kinds combined.
    pub by_category: HashMap<CategoryId, Decimal>,
}

/// System-wide aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatistics {
    /// Total number of records.
    pub record_count: usize,
    /// Income and expense sums across all owners.
    pub totals: KindTotals,
    /// Record counts per workflow status.
    pub by_status: HashMap<RecordStatus, usize>,
}

/// A record flagged as deviating from its owner's spending pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// The flagged record.
    pub record: RecordId,
    /// Its owner.
    pub owner: PrincipalId,
    /// The record's amount.
    pub amount: Decimal,
    /// The owner's arithmetic mean amount.
    pub mean: Decimal,
    /// Absolute deviation of `amount` from `mean`.
    pub deviation: Decimal,
}
