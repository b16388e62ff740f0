//! Parties domain module (customers and suppliers).
//!
//! Wire-shaped entities owned by the backend, plus the validation and filter
//! rules the client applies to them. Pure domain logic; no IO.

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerDraft};
pub use supplier::{Supplier, SupplierDraft};
