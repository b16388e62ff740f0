//! Warehouse statistics.

use serde::{Deserialize, Serialize};

use fieldserve_core::Money;
use fieldserve_products::Product;

use crate::movement::{StockMovement, StockMovementType};

/// Movement counts plus the value of everything currently on the shelf,
/// at purchase prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatistics {
    pub total_movements: u64,
    pub stock_in_count: u64,
    pub stock_out_count: u64,
    pub adjustment_count: u64,
    pub total_stock_value: Money,
}

impl StockStatistics {
    /// Compute over a movement history and the current product snapshot.
    /// Returns and transfers count toward the total only.
    pub fn compute(movements: &[StockMovement], products: &[Product]) -> Self {
        let count = |movement_type: StockMovementType| {
            movements
                .iter()
                .filter(|m| m.movement_type == movement_type)
                .count() as u64
        };

        let total_stock_value = products
            .iter()
            .map(|p| p.purchase_price * p.stock_quantity)
            .sum();

        Self {
            total_movements: movements.len() as u64,
            stock_in_count: count(StockMovementType::StockIn),
            stock_out_count: count(StockMovementType::StockOut),
            adjustment_count: count(StockMovementType::Adjustment),
            total_stock_value,
        }
    }
}
