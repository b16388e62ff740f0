//! `fieldserve-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! money and quantity arithmetic, strongly-typed identifiers, date helpers,
//! and the shared error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod time;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    CustomerId, JobExpenseId, JobId, JobMaterialId, JobPaymentId, ProductCategoryId, ProductId,
    StatusChangeId, StockMovementId, SupplierId,
};
pub use money::{Money, Quantity};
