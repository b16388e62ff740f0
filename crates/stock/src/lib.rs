//! Stock movement domain: immutable movement records over product stock
//! levels, validation for proposed movements, and warehouse statistics.
//!
//! Stock levels themselves live on the product record; this crate owns
//! the audit trail of how they got there and the rules for what a new
//! movement is allowed to do.

pub mod movement;
pub mod statistics;
pub mod usage;

pub use movement::{MovementFilter, StockMovement, StockMovementDraft, StockMovementType};
pub use statistics::StockStatistics;
