//! Event publishing/subscription abstraction (mechanics only).
//!
//! A mutation against the backend is announced exactly once on the bus; every
//! subscriber (a view cache, a dashboard refresher, a test harness) receives
//! its own copy. The bus distributes events, it does not store them: a
//! subscriber that joins late has missed earlier events and should start from
//! a fresh fetch, which is always a correct recovery because derived figures
//! are recomputed from scratch on every fetch anyway.
//!
//! Delivery is best-effort broadcast. A slow or dropped subscriber never
//! blocks the publisher; consumers that refetch on every event are naturally
//! idempotent, so duplicate delivery is harmless.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to the event stream.
///
/// Each subscription gets a copy of every event published after it was
/// created (broadcast semantics). Designed for single-threaded consumption:
/// one subscription per consuming loop.
///
/// ```ignore
/// let sub = bus.subscribe();
/// loop {
///     match sub.recv_timeout(Duration::from_secs(1)) {
///         Ok(event) => refresh(invalidated_views(&event)),
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// Publishers announce accepted mutations; subscribers decide what to do with
/// them. Publication order is preserved per publisher. `publish()` failures
/// are surfaced to the caller, but since every consumer can recover by
/// refetching, callers may treat a failed publish as a logged degradation
/// rather than an abort.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
