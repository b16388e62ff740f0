//! Strongly-typed identifiers used across the domain.
//!
//! The backend owns id generation; every identifier is a server-assigned
//! positive integer. Newtypes keep a `JobId` from being handed to an API that
//! wants a `CustomerId`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a job (installation project).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(i64);

/// Identifier of a material line on a job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobMaterialId(i64);

/// Identifier of a payment on a job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPaymentId(i64);

/// Identifier of an expense on a job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobExpenseId(i64);

/// Identifier of a status-history record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusChangeId(i64);

/// Identifier of a customer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

/// Identifier of a supplier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(i64);

/// Identifier of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

/// Identifier of a product category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCategoryId(i64);

/// Identifier of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockMovementId(i64);

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a raw id received from the backend.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if raw <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: must be positive, got {raw}",
                        $name
                    )));
                }
                Ok(Self(raw))
            }
        }
    };
}

impl_i64_newtype!(JobId, "JobId");
impl_i64_newtype!(JobMaterialId, "JobMaterialId");
impl_i64_newtype!(JobPaymentId, "JobPaymentId");
impl_i64_newtype!(JobExpenseId, "JobExpenseId");
impl_i64_newtype!(StatusChangeId, "StatusChangeId");
impl_i64_newtype!(CustomerId, "CustomerId");
impl_i64_newtype!(SupplierId, "SupplierId");
impl_i64_newtype!(ProductId, "ProductId");
impl_i64_newtype!(ProductCategoryId, "ProductCategoryId");
impl_i64_newtype!(StockMovementId, "StockMovementId");
