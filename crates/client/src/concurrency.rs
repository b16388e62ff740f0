//! Stale-response discard and duplicate-submission guards.
//!
//! Reads race: a refresh fired after a mutation can overtake an older fetch
//! for the same view, and applying the older response would show stale data.
//! Each fetch takes a ticket; only the newest ticket per view may apply its
//! response. Mutations do not race, they duplicate: a second submit of the
//! same operation while the first is in flight is refused outright.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use fieldserve_events::ViewKey;

/// Ticket for one fetch of one view. Compared against the tracker when the
/// response lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: ViewKey,
    sequence: u64,
}

impl FetchTicket {
    pub fn key(&self) -> ViewKey {
        self.key
    }
}

/// Newest-fetch bookkeeping per view.
///
/// The guarded sections only touch a counter map, so a poisoned lock is
/// recovered rather than propagated.
#[derive(Debug, Default)]
pub struct RequestTracker {
    sequences: Mutex<HashMap<ViewKey, u64>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fetch that is about to start. Any earlier ticket for the
    /// same view becomes stale immediately.
    pub fn begin(&self, key: ViewKey) -> FetchTicket {
        let mut sequences = self
            .sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let sequence = sequences
            .entry(key)
            .and_modify(|s| *s += 1)
            .or_insert(1);
        FetchTicket {
            key,
            sequence: *sequence,
        }
    }

    /// Whether a finished fetch is still the newest one for its view. A
    /// stale ticket means its response must be discarded, not applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        let sequences = self
            .sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        sequences.get(&ticket.key).copied() == Some(ticket.sequence)
    }
}

/// Refuses duplicate submissions of one logical mutation.
///
/// Keys are operation strings like `job.status:17`; two different jobs never
/// block each other.
#[derive(Debug, Clone, Default)]
pub struct MutationGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl MutationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a mutation. `None` while an earlier submission of
    /// the same operation is still in flight.
    pub fn try_begin(&self, operation: impl Into<String>) -> Option<MutationGuard> {
        let operation = operation.into();
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(operation.clone()) {
            return None;
        }
        Some(MutationGuard {
            gate: Arc::clone(&self.in_flight),
            operation,
        })
    }

    /// Whether an operation currently holds its slot.
    pub fn is_in_flight(&self, operation: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(operation)
    }
}

/// Releases the mutation slot when dropped, on success and failure alike.
#[derive(Debug)]
pub struct MutationGuard {
    gate: Arc<Mutex<HashSet<String>>>,
    operation: String,
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.operation);
    }
}
