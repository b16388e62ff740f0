//! Stock movement records.
//!
//! Every change to a product's on-hand quantity is captured as an
//! immutable movement row carrying the before and after levels, so the
//! history alone can explain any current stock figure.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use fieldserve_core::{
    DomainError, DomainResult, Entity, JobId, Money, ProductId, Quantity, StockMovementId, time,
};
use fieldserve_products::Product;

/// Movement kind, wire-encoded as the backend's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockMovementType {
    StockIn,
    StockOut,
    Adjustment,
    Return,
    Transfer,
}

impl StockMovementType {
    pub const ALL: [StockMovementType; 5] = [
        StockMovementType::StockIn,
        StockMovementType::StockOut,
        StockMovementType::Adjustment,
        StockMovementType::Return,
        StockMovementType::Transfer,
    ];

    pub fn code(self) -> u8 {
        match self {
            StockMovementType::StockIn => 1,
            StockMovementType::StockOut => 2,
            StockMovementType::Adjustment => 3,
            StockMovementType::Return => 4,
            StockMovementType::Transfer => 5,
        }
    }

    pub fn from_code(code: u8) -> DomainResult<Self> {
        match code {
            1 => Ok(StockMovementType::StockIn),
            2 => Ok(StockMovementType::StockOut),
            3 => Ok(StockMovementType::Adjustment),
            4 => Ok(StockMovementType::Return),
            5 => Ok(StockMovementType::Transfer),
            other => Err(DomainError::validation(format!(
                "unknown stock movement type code: {other}"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockMovementType::StockIn => "stock in",
            StockMovementType::StockOut => "stock out",
            StockMovementType::Adjustment => "adjustment",
            StockMovementType::Return => "return",
            StockMovementType::Transfer => "transfer",
        }
    }

    /// Whether this movement adds to the product's on-hand stock.
    pub fn is_inbound(self) -> bool {
        matches!(self, StockMovementType::StockIn | StockMovementType::Return)
    }

    /// Whether this movement draws stock down.
    pub fn is_outbound(self) -> bool {
        matches!(
            self,
            StockMovementType::StockOut | StockMovementType::Transfer
        )
    }
}

impl core::fmt::Display for StockMovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StockMovementType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for StockMovementType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        StockMovementType::from_code(code).map_err(de::Error::custom)
    }
}

/// Movement record as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: StockMovementId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<Product>,
    pub movement_type: StockMovementType,
    pub quantity: Quantity,
    pub previous_stock: Quantity,
    pub new_stock: Quantity,
    #[serde(default)]
    pub unit_cost: Option<Money>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl StockMovement {
    /// Signed stock change this movement recorded.
    pub fn delta(&self) -> i64 {
        self.new_stock.get() as i64 - self.previous_stock.get() as i64
    }
}

impl Entity for StockMovement {
    type Id = StockMovementId;

    fn id(&self) -> StockMovementId {
        self.id
    }
}

/// Caller-controlled fields when recording a movement. The before/after
/// levels are computed server-side; [`StockMovementDraft::projected_stock`]
/// predicts the outcome for validation and previews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementDraft {
    pub product_id: ProductId,
    pub movement_type: StockMovementType,
    pub quantity: Quantity,
    pub unit_cost: Option<Money>,
    pub reference_number: Option<String>,
    pub job_id: Option<JobId>,
    pub notes: Option<String>,
}

impl StockMovementDraft {
    pub fn new(
        product_id: ProductId,
        movement_type: StockMovementType,
        quantity: Quantity,
    ) -> Self {
        Self {
            product_id,
            movement_type,
            quantity,
            unit_cost: None,
            reference_number: None,
            job_id: None,
            notes: None,
        }
    }

    /// Stock level this movement would leave the product at.
    ///
    /// Outbound movements may not draw below zero and inbound ones may not
    /// overflow the level counter. An adjustment records the counted level
    /// directly, replacing whatever was on the books.
    pub fn projected_stock(&self, current: Quantity) -> DomainResult<Quantity> {
        let quantity = self.quantity.get();
        let current = current.get();

        match self.movement_type {
            StockMovementType::StockIn | StockMovementType::Return => current
                .checked_add(quantity)
                .map(Quantity::new)
                .ok_or_else(|| DomainError::invariant("stock level would overflow")),
            StockMovementType::Adjustment => Ok(Quantity::new(quantity)),
            StockMovementType::StockOut | StockMovementType::Transfer => {
                if quantity > current {
                    return Err(DomainError::invariant("stock cannot go negative"));
                }
                Ok(Quantity::new(current - quantity))
            }
        }
    }

    pub fn validate(&self, current_stock: Quantity) -> DomainResult<()> {
        if self.quantity.is_zero() && self.movement_type != StockMovementType::Adjustment {
            return Err(DomainError::validation("movement quantity must be positive"));
        }
        if let Some(cost) = self.unit_cost {
            if cost.is_negative() {
                return Err(DomainError::validation("unit cost cannot be negative"));
            }
        }
        self.projected_stock(current_stock)?;
        Ok(())
    }
}

/// Filter over movement lists. Mirrors the query parameters the list
/// endpoint accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementFilter {
    pub product_id: Option<ProductId>,
    pub movement_type: Option<StockMovementType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    pub fn matches(&self, movement: &StockMovement) -> bool {
        if let Some(product_id) = self.product_id {
            if movement.product_id != product_id {
                return false;
            }
        }
        if let Some(movement_type) = self.movement_type {
            if movement.movement_type != movement_type {
                return false;
            }
        }
        time::in_window(movement.created_at, self.from, self.to)
    }

    /// Query-string pairs for the list endpoint.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(product_id) = self.product_id {
            query.push(("productId", product_id.to_string()));
        }
        if let Some(movement_type) = self.movement_type {
            query.push(("movementType", movement_type.code().to_string()));
        }
        if let Some(from) = self.from {
            query.push(("startDate", from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            query.push(("endDate", to.to_rfc3339()));
        }
        query
    }
}
