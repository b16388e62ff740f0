use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{CustomerId, DomainError, DomainResult, Entity};

/// Customer master record, as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Company name when present, otherwise "first last".
    pub fn display_name(&self) -> String {
        match self.company_name.as_deref() {
            Some(company) if !company.trim().is_empty() => company.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Case-insensitive match over name, company, and phone.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.first_name.to_lowercase().contains(&q)
            || self.last_name.to_lowercase().contains(&q)
            || self
                .company_name
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&q))
            || self.phone.to_lowercase().contains(&q)
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// Filter a fetched snapshot down to active customers.
pub fn active(customers: &[Customer]) -> Vec<&Customer> {
    customers.iter().filter(|c| c.is_active).collect()
}

/// Search a fetched snapshot. Empty queries match everything.
pub fn search<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|c| c.matches_search(query))
        .collect()
}

/// Create/update payload for a customer. Validated before submission; the
/// backend re-validates on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl CustomerDraft {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            company_name: None,
            phone: phone.into(),
            email: None,
            address: None,
            tax_number: None,
            notes: None,
            is_active: true,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.first_name.trim().is_empty() {
            return Err(DomainError::validation("first name cannot be empty"));
        }
        if self.last_name.trim().is_empty() {
            return Err(DomainError::validation("last name cannot be empty"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone cannot be empty"));
        }
        Ok(())
    }
}
