//! In-memory event bus.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// Single-process fan-out over std channels. No IO, no async; senders whose
/// receiving end was dropped are pruned on the next publish.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcasts_to_every_subscriber() {
        let bus: InMemoryEventBus<u32> = InMemoryEventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(7).unwrap();

        assert_eq!(first.try_recv().unwrap(), 7);
        assert_eq!(second.try_recv().unwrap(), 7);
    }

    #[test]
    fn preserves_publish_order_per_subscriber() {
        let bus: InMemoryEventBus<u32> = InMemoryEventBus::new();
        let sub = bus.subscribe();

        for n in 0..5 {
            bus.publish(n).unwrap();
        }

        let received: Vec<u32> = (0..5).map(|_| sub.try_recv().unwrap()).collect();
        assert_eq!(received, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn prunes_dropped_subscribers() {
        let bus: InMemoryEventBus<u32> = InMemoryEventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(keep.try_recv().unwrap(), 1);
        assert_eq!(keep.try_recv().unwrap(), 2);
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus: InMemoryEventBus<u32> = InMemoryEventBus::new();
        bus.publish(1).unwrap();

        let late = bus.subscribe();
        bus.publish(2).unwrap();

        assert_eq!(late.try_recv().unwrap(), 2);
        assert!(late.try_recv().is_err());
    }
}
