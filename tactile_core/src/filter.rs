// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability filters: predicates gating whether a pairing is permissible.
//!
//! ## Overview
//!
//! A [`Filter`] answers "may these two interact at all", independent of
//! distance or availability. Returning `true` means *include*. Composed
//! filters are ANDed: any `false` short-circuits rejection
//! ([`include_all`]).
//!
//! Each side of a pairing presents a [`Peer`] profile (identity plus
//! application-defined [`TagMask`] bits) to the other side's filters.
//! [`TagFilter`] covers the common allow/deny-list case; arbitrary
//! predicates (for example secondary-relationship gating against external
//! bookkeeping) are closures, via the blanket impl.

use alloc::boxed::Box;

use crate::identifier::Identifier;

bitflags::bitflags! {
    /// Application-defined interaction tag bits.
    ///
    /// The protocol assigns no meaning to individual bits; an application
    /// declares its own vocabulary (for example "hand", "distance-ray",
    /// "ui") with [`TagMask::from_bits_retain`] and constants on its side.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TagMask: u64 {}
}

impl TagMask {
    /// A mask with the single bit `bit` (0-based) set.
    ///
    /// Convenience for applications declaring their tag vocabulary.
    pub const fn bit(bit: u32) -> Self {
        Self::from_bits_retain(1 << bit)
    }
}

/// The profile one side of a pairing presents to the other side's filters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Peer {
    /// Identity of the instance on this side.
    pub id: Identifier,
    /// Interaction tags carried by this side.
    pub tags: TagMask,
}

/// A capability predicate. `true` means *include* (the pairing is allowed).
pub trait Filter<T: ?Sized> {
    /// Whether `item` passes this filter.
    fn include(&self, item: &T) -> bool;
}

impl<T: ?Sized, F: Fn(&T) -> bool> Filter<T> for F {
    fn include(&self, item: &T) -> bool {
        self(item)
    }
}

/// Tag-based allow/deny filter over a peer's [`TagMask`].
///
/// - `require` empty: no requirement; otherwise the peer must carry *all*
///   required bits.
/// - `deny`: any overlap rejects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Bits the peer must carry (all of them). Empty means "any".
    pub require: TagMask,
    /// Bits that reject the peer on any overlap.
    pub deny: TagMask,
}

impl Filter<Peer> for TagFilter {
    fn include(&self, peer: &Peer) -> bool {
        if !peer.tags.contains(self.require) {
            return false;
        }
        !peer.tags.intersects(self.deny)
    }
}

/// AND-composition over a filter list; short-circuits on the first reject.
/// An empty list includes everything.
pub fn include_all<T: ?Sized>(filters: &[Box<dyn Filter<T>>], item: &T) -> bool {
    filters.iter().all(|f| f.include(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    const HAND: TagMask = TagMask::bit(0);
    const RAY: TagMask = TagMask::bit(1);
    const UI: TagMask = TagMask::bit(2);

    fn peer(tags: TagMask) -> Peer {
        Peer {
            id: Identifier::from_raw(1),
            tags,
        }
    }

    #[test]
    fn empty_filter_includes_everything() {
        let f = TagFilter::default();
        assert!(f.include(&peer(TagMask::empty())));
        assert!(f.include(&peer(HAND.union(UI))));
    }

    #[test]
    fn require_needs_all_bits() {
        let f = TagFilter {
            require: HAND.union(UI),
            deny: TagMask::empty(),
        };
        assert!(f.include(&peer(HAND.union(UI))));
        assert!(!f.include(&peer(HAND)));
    }

    #[test]
    fn deny_rejects_on_any_overlap() {
        let f = TagFilter {
            require: TagMask::empty(),
            deny: RAY,
        };
        assert!(f.include(&peer(HAND)));
        assert!(!f.include(&peer(HAND.union(RAY))));
    }

    // Composition is AND: one reject wins.
    #[test]
    fn composition_short_circuits_rejection() {
        let filters: Vec<Box<dyn Filter<Peer>>> = vec![
            Box::new(TagFilter {
                require: HAND,
                deny: TagMask::empty(),
            }),
            Box::new(|p: &Peer| !p.tags.intersects(UI)),
        ];
        assert!(include_all(&filters, &peer(HAND)));
        assert!(!include_all(&filters, &peer(HAND.union(UI))));
        assert!(!include_all(&filters, &peer(RAY)));
    }

    // Secondary-relationship gating: a closure consulting external state.
    #[test]
    fn closure_filter_can_gate_on_identity() {
        let banned = Identifier::from_raw(9);
        let filters: Vec<Box<dyn Filter<Peer>>> =
            vec![Box::new(move |p: &Peer| p.id != banned)];
        assert!(include_all(
            &filters,
            &Peer {
                id: Identifier::from_raw(1),
                tags: TagMask::empty()
            }
        ));
        assert!(!include_all(
            &filters,
            &Peer {
                id: banned,
                tags: TagMask::empty()
            }
        ));
    }
}
