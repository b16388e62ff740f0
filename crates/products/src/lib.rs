//! Products domain module (catalog and stock levels).
//!
//! Wire-shaped catalog entities owned by the backend, plus the pricing
//! validation and low-stock rules applied client-side. Pure domain logic;
//! no IO.

pub mod category;
pub mod product;

pub use category::ProductCategory;
pub use product::{Product, ProductDraft};
