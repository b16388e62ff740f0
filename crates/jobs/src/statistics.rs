//! Fleet-wide job statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fieldserve_core::{Money, ProductId};
use fieldserve_products::Product;

use crate::costing::{CostBasis, CostBreakdown};
use crate::job::JobSnapshot;
use crate::status::JobStatus;

/// Aggregate figures over a set of jobs, as shown on the dashboard.
///
/// The backend serves this shape from its statistics endpoint; the same
/// figures can be recomputed locally from snapshots and must agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub completed_jobs: u64,
    pub cancelled_jobs: u64,
    pub pending_payment_jobs: u64,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub average_job_value: Money,
}

impl JobStatistics {
    /// Compute over a set of snapshots. An empty set yields all zeros.
    pub fn compute(
        snapshots: &[JobSnapshot],
        catalog: &HashMap<ProductId, Product>,
        basis: CostBasis,
    ) -> Self {
        let mut active_jobs = 0;
        let mut completed_jobs = 0;
        let mut cancelled_jobs = 0;
        let mut pending_payment_jobs = 0;
        let mut total_revenue = Money::ZERO;
        let mut total_expenses = Money::ZERO;
        let mut net_profit = Money::ZERO;

        for snapshot in snapshots {
            let status = snapshot.job.status;
            if status.is_open() {
                active_jobs += 1;
            }
            match status {
                JobStatus::Completed => completed_jobs += 1,
                JobStatus::Cancelled => cancelled_jobs += 1,
                JobStatus::PaymentPending => pending_payment_jobs += 1,
                _ => {}
            }

            let breakdown = CostBreakdown::compute(snapshot, catalog, basis);
            total_revenue += snapshot.job.final_amount;
            total_expenses += breakdown.total_expenses;
            net_profit += breakdown.net_profit;
        }

        let total_jobs = snapshots.len() as u64;
        let average_job_value = if total_jobs == 0 {
            Money::ZERO
        } else {
            Money::from_minor(total_revenue.minor() / total_jobs as i64)
        };

        Self {
            total_jobs,
            active_jobs,
            completed_jobs,
            cancelled_jobs,
            pending_payment_jobs,
            total_revenue,
            total_expenses,
            net_profit,
            average_job_value,
        }
    }
}
