use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult, Entity, ProductCategoryId, SupplierId};

/// Supplier master record, as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub category_id: Option<ProductCategoryId>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    /// Case-insensitive match over company, contact, and phone.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.company_name.to_lowercase().contains(&q)
            || self
                .contact_name
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&q))
            || self.phone.to_lowercase().contains(&q)
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}

/// Filter a fetched snapshot down to active suppliers.
pub fn active(suppliers: &[Supplier]) -> Vec<&Supplier> {
    suppliers.iter().filter(|s| s.is_active).collect()
}

/// Search a fetched snapshot. Empty queries match everything.
pub fn search<'a>(suppliers: &'a [Supplier], query: &str) -> Vec<&'a Supplier> {
    suppliers
        .iter()
        .filter(|s| s.matches_search(query))
        .collect()
}

/// Suppliers linked to one product category.
pub fn in_category(suppliers: &[Supplier], category_id: ProductCategoryId) -> Vec<&Supplier> {
    suppliers
        .iter()
        .filter(|s| s.category_id == Some(category_id))
        .collect()
}

/// Create/update payload for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub category_id: Option<ProductCategoryId>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl SupplierDraft {
    pub fn new(company_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            contact_name: None,
            phone: phone.into(),
            email: None,
            address: None,
            tax_number: None,
            category_id: None,
            notes: None,
            is_active: true,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone cannot be empty"));
        }
        Ok(())
    }
}
