//! Typed async client for the fieldserve backend.
//!
//! One [`ApiClient`] instance is shared across the whole application. It owns
//! the HTTP connection pool, the duplicate-submission gate for mutations, the
//! stale-fetch tracker for view refreshes, and the event bus that announces
//! accepted mutations to subscribers.
//!
//! Domain rules run before the wire: drafts are validated and status
//! transitions checked locally, so a request the backend would reject for a
//! known reason is never sent.

pub mod api;
pub mod client;
pub mod concurrency;
pub mod config;
pub mod error;

mod http;

pub use client::{ApiClient, REQUEST_ID_HEADER};
pub use concurrency::{FetchTicket, MutationGate, MutationGuard, RequestTracker};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
