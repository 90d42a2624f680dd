// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unique identifiers for runtime interaction instances.
//!
//! ## Overview
//!
//! An [`IdentifierPool`] issues [`Identifier`]s from a monotonic counter
//! scoped to the owning context (typically the composition root). A value is
//! never reissued, so an `Identifier` held across the death of its instance
//! can only fail to resolve; it can never alias a newer instance.
//!
//! An [`InstanceRegistry`] maps identifiers back to owning instances (or to
//! whatever handle the application stores for them), backing both the
//! raw-id lookup surface and "enumerate all live instances of kind X":
//! keep one registry per concrete kind.
//!
//! ```
//! use tactile_core::identifier::{IdentifierPool, InstanceRegistry};
//!
//! let mut pool = IdentifierPool::new();
//! let id = pool.issue();
//!
//! let mut names: InstanceRegistry<&str> = InstanceRegistry::new();
//! names.register(id, "left-hand");
//! assert_eq!(names.try_get(id), Some(&"left-hand"));
//! names.release(id);
//! assert_eq!(names.try_get(id), None);
//! ```

use alloc::collections::BTreeMap;

/// A process-unique integer identity for one runtime instance.
///
/// Issued by [`IdentifierPool::issue`]; displayed and ordered as a plain
/// integer so it can cross module boundaries as an opaque number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Identifier(u64);

impl Identifier {
    /// The raw integer value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild an identifier from a raw value previously obtained via
    /// [`Identifier::raw`]. Intended for external id round-trips only.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for Identifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic issuer of [`Identifier`]s.
///
/// Values start at 1 and never repeat within one pool. Scope one pool to one
/// composition root; identifiers from different pools are not comparable for
/// identity purposes.
#[derive(Clone, Debug, Default)]
pub struct IdentifierPool {
    next: u64,
}

impl IdentifierPool {
    /// Create a pool whose first issued identifier is 1.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Issue the next identifier.
    pub fn issue(&mut self) -> Identifier {
        // u64 does not wrap in any realistic session; saturate rather than
        // reissue low values if it ever does.
        self.next = self.next.saturating_add(1);
        Identifier(self.next)
    }
}

/// A lookup table from [`Identifier`] to a live instance (or a handle to one).
///
/// Keep one registry per concrete kind to preserve "enumerate all live
/// instances of kind X" without global state. Iteration order is ascending
/// by identifier and therefore deterministic.
#[derive(Clone, Debug)]
pub struct InstanceRegistry<T> {
    entries: BTreeMap<Identifier, T>,
}

impl<T> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InstanceRegistry<T> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `value` under `id`. Returns `false` (and leaves the existing
    /// entry untouched) if `id` is already registered.
    pub fn register(&mut self, id: Identifier, value: T) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, value);
        true
    }

    /// Remove and return the entry for `id`, if any.
    pub fn release(&mut self, id: Identifier) -> Option<T> {
        self.entries.remove(&id)
    }

    /// Resolve a raw identifier back to its registered instance.
    pub fn try_get(&self, id: Identifier) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Mutable variant of [`InstanceRegistry::try_get`].
    pub fn try_get_mut(&mut self, id: Identifier) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// Iterate live entries in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (Identifier, &T)> {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    // Identifiers are strictly increasing and never reissued.
    #[test]
    fn pool_is_monotonic() {
        let mut pool = IdentifierPool::new();
        let a = pool.issue();
        let b = pool.issue();
        let c = pool.issue();
        assert!(a < b && b < c);
        assert_eq!(a.raw(), 1);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut pool = IdentifierPool::new();
        let id = pool.issue();
        let mut reg: InstanceRegistry<u32> = InstanceRegistry::new();
        assert!(reg.register(id, 7));
        assert!(!reg.register(id, 9));
        assert_eq!(reg.try_get(id), Some(&7));
    }

    #[test]
    fn release_then_lookup_misses() {
        let mut pool = IdentifierPool::new();
        let id = pool.issue();
        let mut reg: InstanceRegistry<u32> = InstanceRegistry::new();
        reg.register(id, 1);
        assert_eq!(reg.release(id), Some(1));
        assert_eq!(reg.try_get(id), None);
        assert!(reg.is_empty());
    }

    // Iteration is deterministic: ascending identifier order.
    #[test]
    fn iteration_is_ordered() {
        let mut pool = IdentifierPool::new();
        let ids: Vec<_> = (0..4).map(|_| pool.issue()).collect();
        let mut reg: InstanceRegistry<usize> = InstanceRegistry::new();
        // Register out of order.
        reg.register(ids[2], 2);
        reg.register(ids[0], 0);
        reg.register(ids[3], 3);
        reg.register(ids[1], 1);
        let seen: Vec<_> = reg.iter().map(|(_, v)| *v).collect();
        assert_eq!(seen, [0, 1, 2, 3]);
    }

    #[test]
    fn raw_round_trip() {
        let mut pool = IdentifierPool::new();
        let id = pool.issue();
        assert_eq!(Identifier::from_raw(id.raw()), id);
    }
}
