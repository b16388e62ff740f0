//! Entity trait: identity + continuity across state changes.

use std::collections::HashMap;

/// Entity marker + minimal interface.
///
/// Ids are server-assigned integers, so they are returned by value.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Index a fetched snapshot by id.
///
/// Embedded relations (`product?`, `customer?`) may be absent on wire
/// entities; call sites resolve them through a map built from a separately
/// fetched snapshot instead of trusting the embedding.
pub fn lookup_map<E>(items: impl IntoIterator<Item = E>) -> HashMap<E::Id, E>
where
    E: Entity,
{
    items.into_iter().map(|item| (item.id(), item)).collect()
}
