//! Receivables: who owes what, and for how long.
//!
//! Summaries are derived on demand from job snapshots and never persisted.
//! All arithmetic is integer minor units, so the headline figure and its
//! aging buckets always agree to the last unit.

pub mod aging;
pub mod summary;

pub use aging::AgingBreakdown;
pub use summary::CustomerReceivableSummary;
