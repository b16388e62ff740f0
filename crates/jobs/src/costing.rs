//! Pure cost aggregation over a job snapshot.
//!
//! Every figure is recomputed from scratch on each call. The functions
//! never mutate their inputs and never read anything outside the snapshot
//! and the injected product catalog, which is what makes the results
//! reproducible and order-independent.

use std::collections::HashMap;

use fieldserve_core::{Money, ProductId};
use fieldserve_products::Product;

use crate::job::JobSnapshot;
use crate::material::JobMaterial;
use crate::{expense, payment};

/// Which price a material cost is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CostBasis {
    /// The unit price stored on the material line when it was entered.
    #[default]
    Snapshot,
    /// The product's current purchase price.
    Catalog,
}

/// Price a single material line under the given basis.
///
/// Catalog pricing resolves the product through the injected lookup first,
/// then through the line's embedded product, and falls back to the stored
/// unit price. A line is never priced at zero just because the product
/// could not be resolved.
pub fn unit_cost(
    material: &JobMaterial,
    catalog: &HashMap<ProductId, Product>,
    basis: CostBasis,
) -> Money {
    match basis {
        CostBasis::Snapshot => material.unit_price,
        CostBasis::Catalog => catalog
            .get(&material.product_id)
            .map(|p| p.purchase_price)
            .or_else(|| material.product.as_ref().map(|p| p.purchase_price))
            .unwrap_or(material.unit_price),
    }
}

/// Every derived financial figure for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBreakdown {
    /// Σ planned_quantity × unit cost over all material lines.
    pub planned_material_cost: Money,
    /// Σ used_quantity × unit cost over all material lines.
    pub used_material_cost: Money,
    /// Σ amount over all payments, settled or not.
    pub total_payments: Money,
    /// Σ amount over settled payments.
    pub total_paid: Money,
    /// final_amount − total_paid, floored at zero.
    pub remaining_payment: Money,
    /// Σ amount over all expenses.
    pub total_expenses: Money,
    /// final_amount − used material cost − expenses. May be negative.
    pub net_profit: Money,
    /// total_paid as a share of final_amount, in whole percent.
    pub payment_progress_percent: i64,
}

impl CostBreakdown {
    /// Compute every figure from a snapshot. Empty child collections are
    /// fine; a job with no records yields zeros with the full final
    /// amount still owed.
    pub fn compute(
        snapshot: &JobSnapshot,
        catalog: &HashMap<ProductId, Product>,
        basis: CostBasis,
    ) -> Self {
        let planned_material_cost = snapshot
            .materials
            .iter()
            .map(|m| unit_cost(m, catalog, basis) * m.planned_quantity)
            .sum();
        let used_material_cost: Money = snapshot
            .materials
            .iter()
            .map(|m| unit_cost(m, catalog, basis) * m.used_quantity)
            .sum();

        let total_payments = payment::total_amount(&snapshot.payments);
        let total_paid = payment::total_paid(&snapshot.payments);
        let total_expenses = expense::total_amount(&snapshot.expenses);

        let final_amount = snapshot.job.final_amount;
        let remaining_payment = final_amount.sub_floored(total_paid);
        let net_profit = final_amount - used_material_cost - total_expenses;
        let payment_progress_percent = total_paid.percent_of(final_amount);

        Self {
            planned_material_cost,
            used_material_cost,
            total_payments,
            total_paid,
            remaining_payment,
            total_expenses,
            net_profit,
            payment_progress_percent,
        }
    }

    /// Breakdown under the default basis with no catalog. The common path
    /// for views that only show payment figures.
    pub fn from_snapshot(snapshot: &JobSnapshot) -> Self {
        Self::compute(snapshot, &HashMap::new(), CostBasis::Snapshot)
    }
}
