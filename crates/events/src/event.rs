use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are **immutable** facts about a mutation the backend already
/// accepted. They carry only what consumers need to decide which derived
/// views to refresh; they are not a persistence format.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "job.payment.added").
    fn event_type(&self) -> &'static str;

    /// When the mutation was observed (client time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
