//! Read-only aggregation over record snapshots.

pub mod service;
pub mod types;


pub use service::StatisticsEngine;
pub use types::{Anomaly, DistributionSlice, KindTotals, OwnerStatistics, SystemStatistics};
