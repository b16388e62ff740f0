//! Resource methods on [`ApiClient`](crate::ApiClient), one module per
//! backend resource.
//!
//! Every mutation validates its draft locally, claims the duplicate
//! submission gate, and announces the accepted change on the event bus.
//! Reads are plain fetches; callers wanting stale-response protection wrap
//! them in [`ApiClient::fetch_view`](crate::ApiClient::fetch_view).

pub mod customers;
pub mod jobs;
pub mod products;
pub mod stock;
pub mod suppliers;
