//! Shared tracing/logging setup.
//!
//! One call in `main` (or a test harness) wires structured JSON logs for
//! every other crate in the workspace.

pub mod tracing;

pub use tracing::init;
