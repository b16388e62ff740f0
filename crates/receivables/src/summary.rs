//! Per-customer receivable summaries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{CustomerId, Money};
use fieldserve_jobs::JobSnapshot;
use fieldserve_jobs::payment;
use fieldserve_parties::Customer;

use crate::aging::AgingBreakdown;

/// Receivable position of one customer across all their jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReceivableSummary {
    pub customer_id: CustomerId,
    pub customer_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub total_billed: Money,
    pub total_paid: Money,
    pub outstanding_balance: Money,
    pub aging: AgingBreakdown,
}

impl CustomerReceivableSummary {
    /// Compute one customer's position from their job snapshots.
    ///
    /// Each job contributes its own unpaid balance, floored at zero, to
    /// the outstanding figure and to exactly one aging bucket, so the
    /// bucket sum equals the outstanding balance by construction. An
    /// overpaid job contributes zero rather than offsetting other jobs.
    pub fn compute(customer: &Customer, snapshots: &[JobSnapshot], now: DateTime<Utc>) -> Self {
        let mut total_billed = Money::ZERO;
        let mut total_paid = Money::ZERO;
        let mut outstanding_balance = Money::ZERO;
        let mut active_jobs = 0;
        let mut aging = AgingBreakdown::default();

        for snapshot in snapshots {
            let job = &snapshot.job;
            let paid = payment::total_paid(&snapshot.payments);

            total_billed += job.final_amount;
            total_paid += paid;
            if job.is_open() {
                active_jobs += 1;
            }

            let unpaid = job.final_amount.sub_floored(paid);
            if !unpaid.is_zero() {
                aging.add(job.age_days(now), unpaid);
                outstanding_balance += unpaid;
            }
        }

        Self {
            customer_id: customer.id,
            customer_name: format!("{} {}", customer.first_name, customer.last_name),
            company_name: customer.company_name.clone(),
            total_jobs: snapshots.len() as u64,
            active_jobs,
            total_billed,
            total_paid,
            outstanding_balance,
            aging,
        }
    }
}

/// Group snapshots by their customer for fleet computation.
pub fn group_by_customer(
    snapshots: impl IntoIterator<Item = JobSnapshot>,
) -> HashMap<CustomerId, Vec<JobSnapshot>> {
    let mut grouped: HashMap<CustomerId, Vec<JobSnapshot>> = HashMap::new();
    for snapshot in snapshots {
        grouped
            .entry(snapshot.job.customer_id)
            .or_default()
            .push(snapshot);
    }
    grouped
}

/// One summary per customer, in the order the customers were given.
///
/// `active_only` keeps only active customer records; a customer with no
/// snapshots yields an all-zero summary rather than being skipped.
pub fn fleet_summaries(
    customers: &[Customer],
    snapshots_by_customer: &HashMap<CustomerId, Vec<JobSnapshot>>,
    active_only: bool,
    now: DateTime<Utc>,
) -> Vec<CustomerReceivableSummary> {
    customers
        .iter()
        .filter(|c| !active_only || c.is_active)
        .map(|customer| {
            let snapshots = snapshots_by_customer
                .get(&customer.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            CustomerReceivableSummary::compute(customer, snapshots, now)
        })
        .collect()
}
