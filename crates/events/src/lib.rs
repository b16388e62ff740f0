//! Data-change events and view invalidation.
//!
//! Every mutation against the backend is announced as a [`DataEvent`];
//! [`invalidated_views`] maps each event to the derived views it renders
//! stale. Consumers (view caches, dashboards) subscribe through an
//! [`EventBus`] and refetch what the event names instead of guessing.

pub mod bus;
pub mod data_event;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use data_event::{DataEvent, ViewKey, invalidated_views};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
