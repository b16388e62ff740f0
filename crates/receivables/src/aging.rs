//! Aging buckets for outstanding balances.

use serde::{Deserialize, Serialize};

use fieldserve_core::Money;

/// Outstanding amounts bucketed by how long ago the owing job was opened.
///
/// A job's entire unpaid balance lands in exactly one bucket; nothing is
/// pro-rated across boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingBreakdown {
    /// Jobs up to 30 days old.
    pub current: Money,
    /// 31 to 60 days.
    pub days_30_to_60: Money,
    /// 61 to 90 days.
    pub days_60_to_90: Money,
    /// Older than 90 days.
    pub over_90_days: Money,
}

impl AgingBreakdown {
    /// Add an amount to the bucket for the given age. Negative ages (jobs
    /// dated in the future) land in `current`.
    pub fn add(&mut self, age_days: i64, amount: Money) {
        if age_days <= 30 {
            self.current += amount;
        } else if age_days <= 60 {
            self.days_30_to_60 += amount;
        } else if age_days <= 90 {
            self.days_60_to_90 += amount;
        } else {
            self.over_90_days += amount;
        }
    }

    /// Sum of every bucket.
    pub fn total(&self) -> Money {
        self.current + self.days_30_to_60 + self.days_60_to_90 + self.over_90_days
    }

    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}
