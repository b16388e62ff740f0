use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{
    DomainError, DomainResult, Entity, Money, ProductCategoryId, ProductId, Quantity,
};

use crate::category::ProductCategory;

/// Catalog product, as served by the backend.
///
/// `stock_quantity` is backend-authoritative; the client reads it and proposes
/// movements, it never computes its own balance. The embedded `category` may
/// be absent depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: Option<ProductCategoryId>,
    pub category: Option<ProductCategory>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub stock_quantity: Quantity,
    pub minimum_stock_level: Quantity,
    pub unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// At or below the minimum stock level.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock_level
    }

    /// Units missing to reach the minimum stock level.
    pub fn shortage(&self) -> Quantity {
        Quantity::new(
            self.minimum_stock_level
                .get()
                .saturating_sub(self.stock_quantity.get()),
        )
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Products at or below their minimum stock level, worst shortage first.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    let mut hits: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
    hits.sort_by(|a, b| b.shortage().cmp(&a.shortage()));
    hits
}

/// Products in one category.
pub fn in_category(products: &[Product], category_id: ProductCategoryId) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.category_id == Some(category_id))
        .collect()
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category_id: Option<ProductCategoryId>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub stock_quantity: Quantity,
    pub minimum_stock_level: Quantity,
    pub unit: String,
    pub is_active: bool,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, purchase_price: Money, sale_price: Money) -> Self {
        Self {
            name: name.into(),
            category_id: None,
            brand: None,
            model: None,
            description: None,
            purchase_price,
            sale_price,
            stock_quantity: Quantity::ZERO,
            minimum_stock_level: Quantity::ZERO,
            unit: "adet".to_string(),
            is_active: true,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.purchase_price.is_negative() {
            return Err(DomainError::validation("purchase price cannot be negative"));
        }
        if self.sale_price.is_negative() {
            return Err(DomainError::validation("sale price cannot be negative"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        Ok(())
    }
}
