// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactable arena: targets, association sets, and derived state.
//!
//! ## Overview
//!
//! [`Targets`] owns every interactable in one interaction context. Entries
//! live in generational slots, so a [`TargetId`] stays stable across
//! updates and becomes harmlessly stale when its slot is reused: stale
//! handles are no-ops for mutation and read as [`TargetState::Disabled`].
//!
//! A target never initiates transitions. It only reacts to being added or
//! removed by interactors, enforces its cardinality bounds through
//! [`Targets::can_be_selected_by`], and derives its state from its two
//! association sets:
//!
//! - `Select` iff the selecting set is non-empty;
//! - else `Hover` iff the associated set is non-empty;
//! - else `Normal`, unless explicitly disabled.
//!
//! ## Events
//!
//! Every mutation fires its add/remove event and then, if the derived
//! state actually changed, a state-changed event — always strictly after
//! the backing sets were updated.

use alloc::boxed::Box;
use alloc::vec::Vec;

use tactile_core::event::{Emitter, HandlerId};
use tactile_core::filter::{Filter, Peer, TagMask, include_all};
use tactile_core::identifier::{Identifier, IdentifierPool};
use tactile_core::state::{StateChange, TargetState};

/// Generational handle of a target.
///
/// A slot index plus a generation counter; on slot reuse the generation is
/// incremented, so a stale `TargetId` never aliases a newer target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetId(pub(crate) u32, pub(crate) u32);

impl TargetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Event fired by a target when its association sets or state change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetEvent {
    /// Derived state changed; fired after the specific mutation event.
    StateChanged(StateChange<TargetState>),
    /// An interactor joined the associated set.
    InteractorAdded(Identifier),
    /// An interactor left the associated set.
    InteractorRemoved(Identifier),
    /// An interactor joined the selecting set.
    SelectingAdded(Identifier),
    /// An interactor left the selecting set.
    SelectingRemoved(Identifier),
}

struct Target<P> {
    ident: Identifier,
    enabled: bool,
    tags: TagMask,
    associated: Vec<Identifier>,
    selecting: Vec<Identifier>,
    max_interactors: Option<usize>,
    max_selecting: Option<usize>,
    filters: Vec<Box<dyn Filter<Peer>>>,
    events: Emitter<TargetEvent>,
    payload: P,
}

impl<P> Target<P> {
    fn derived_state(&self) -> TargetState {
        if !self.enabled {
            TargetState::Disabled
        } else if !self.selecting.is_empty() {
            TargetState::Select
        } else if !self.associated.is_empty() {
            TargetState::Hover
        } else {
            TargetState::Normal
        }
    }
}

/// Arena of interactables for one interaction context.
pub struct Targets<P> {
    entries: Vec<Option<Target<P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    idents: IdentifierPool,
}

impl<P> Default for Targets<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> core::fmt::Debug for Targets<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Targets")
            .field("slots_total", &total)
            .field("alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<P> Targets<P> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            idents: IdentifierPool::new(),
        }
    }

    /// Insert a new, enabled target carrying `payload`.
    pub fn insert(&mut self, payload: P) -> TargetId {
        let target = Target {
            ident: self.idents.issue(),
            enabled: true,
            tags: TagMask::empty(),
            associated: Vec::new(),
            selecting: Vec::new(),
            max_interactors: None,
            max_selecting: None,
            filters: Vec::new(),
            events: Emitter::new(),
            payload,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(target);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TargetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(target));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TargetId uses 32-bit indices by design."
            )]
            ((self.entries.len() - 1) as u32, generation)
        };
        TargetId::new(idx, generation)
    }

    /// Remove a target, running the disable cascade first so every
    /// associated and selecting interactor observes its removal events.
    /// Returns the payload, or `None` for a stale handle.
    pub fn remove(&mut self, id: TargetId) -> Option<P> {
        if !self.is_alive(id) {
            return None;
        }
        self.disable(id);
        let slot = id.idx();
        let entry = self.entries[slot].take()?;
        self.free_list.push(slot);
        Some(entry.payload)
    }

    /// Whether `id` still refers to a live target.
    pub fn is_alive(&self, id: TargetId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// True if no targets are alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live targets and their payloads, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &P)> {
        self.entries.iter().enumerate().filter_map(|(i, e)| {
            let e = e.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TargetId uses 32-bit indices by design."
            )]
            Some((TargetId::new(i as u32, self.generations[i]), &e.payload))
        })
    }

    /// Derived state. Stale handles read as [`TargetState::Disabled`].
    pub fn state(&self, id: TargetId) -> TargetState {
        self.entry(id)
            .map_or(TargetState::Disabled, Target::derived_state)
    }

    /// The target's process-unique identifier.
    pub fn identifier(&self, id: TargetId) -> Option<Identifier> {
        self.entry(id).map(|t| t.ident)
    }

    /// Resolve a target's identifier back to its handle (linear search).
    pub fn find_by_identifier(&self, ident: Identifier) -> Option<TargetId> {
        self.entries.iter().enumerate().find_map(|(i, e)| {
            let e = e.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TargetId uses 32-bit indices by design."
            )]
            (e.ident == ident).then(|| TargetId::new(i as u32, self.generations[i]))
        })
    }

    /// The profile this target presents to source-side capability filters.
    pub fn profile(&self, id: TargetId) -> Option<Peer> {
        self.entry(id).map(|t| Peer {
            id: t.ident,
            tags: t.tags,
        })
    }

    /// Borrow the payload.
    pub fn payload(&self, id: TargetId) -> Option<&P> {
        self.entry(id).map(|t| &t.payload)
    }

    /// Mutably borrow the payload.
    pub fn payload_mut(&mut self, id: TargetId) -> Option<&mut P> {
        self.entry_mut(id).map(|t| &mut t.payload)
    }

    /// Set the target's interaction tags.
    pub fn set_tags(&mut self, id: TargetId, tags: TagMask) {
        if let Some(t) = self.entry_mut(id) {
            t.tags = tags;
        }
    }

    /// Bound the associated set. `None` is unbounded.
    pub fn set_max_interactors(&mut self, id: TargetId, cap: Option<usize>) {
        if let Some(t) = self.entry_mut(id) {
            t.max_interactors = cap;
        }
    }

    /// Bound the selecting set. `None` is unbounded.
    pub fn set_max_selecting(&mut self, id: TargetId, cap: Option<usize>) {
        if let Some(t) = self.entry_mut(id) {
            t.max_selecting = cap;
        }
    }

    /// Add a target-side capability filter judging source peers.
    pub fn add_filter(&mut self, id: TargetId, filter: Box<dyn Filter<Peer>>) {
        if let Some(t) = self.entry_mut(id) {
            t.filters.push(filter);
        }
    }

    /// Subscribe to this target's events.
    pub fn subscribe(
        &mut self,
        id: TargetId,
        handler: impl FnMut(&TargetEvent) + 'static,
    ) -> Option<HandlerId> {
        self.entry_mut(id).map(|t| t.events.subscribe(handler))
    }

    /// Remove a previously registered handler.
    pub fn unsubscribe(&mut self, id: TargetId, handler: HandlerId) -> bool {
        self.entry_mut(id)
            .is_some_and(|t| t.events.unsubscribe(handler))
    }

    /// Capability and cardinality gate: may `peer` select this target?
    ///
    /// False if the target is disabled, its selecting set is at its bound,
    /// its associated set is at its bound without already containing the
    /// peer, or any target-side filter rejects the peer.
    pub fn can_be_selected_by(&self, id: TargetId, peer: &Peer) -> bool {
        let Some(t) = self.entry(id) else {
            return false;
        };
        if !t.enabled {
            return false;
        }
        if let Some(cap) = t.max_selecting
            && t.selecting.len() >= cap
        {
            return false;
        }
        if let Some(cap) = t.max_interactors
            && t.associated.len() >= cap
            && !t.associated.contains(&peer.id)
        {
            return false;
        }
        include_all(&t.filters, peer)
    }

    /// Whether `who` is in the associated set.
    pub fn contains_interactor(&self, id: TargetId, who: Identifier) -> bool {
        self.entry(id).is_some_and(|t| t.associated.contains(&who))
    }

    /// Whether `who` is in the selecting set.
    pub fn contains_selecting(&self, id: TargetId, who: Identifier) -> bool {
        self.entry(id).is_some_and(|t| t.selecting.contains(&who))
    }

    /// Size of the associated set.
    pub fn interactor_count(&self, id: TargetId) -> usize {
        self.entry(id).map_or(0, |t| t.associated.len())
    }

    /// Size of the selecting set.
    pub fn selecting_count(&self, id: TargetId) -> usize {
        self.entry(id).map_or(0, |t| t.selecting.len())
    }

    /// Associate an interactor. Idempotent; returns whether the set grew.
    pub fn add_interactor(&mut self, id: TargetId, who: Identifier) -> bool {
        let Some(t) = self.entry_mut(id) else {
            return false;
        };
        if t.associated.contains(&who) {
            return false;
        }
        let previous = t.derived_state();
        t.associated.push(who);
        t.events.emit(&TargetEvent::InteractorAdded(who));
        Self::emit_state_change(t, previous);
        true
    }

    /// Dissociate an interactor. Removing a non-member is a no-op.
    pub fn remove_interactor(&mut self, id: TargetId, who: Identifier) -> bool {
        let Some(t) = self.entry_mut(id) else {
            return false;
        };
        let Some(pos) = t.associated.iter().position(|m| *m == who) else {
            return false;
        };
        let previous = t.derived_state();
        t.associated.swap_remove(pos);
        t.events.emit(&TargetEvent::InteractorRemoved(who));
        Self::emit_state_change(t, previous);
        true
    }

    /// Mark an interactor as selecting. Idempotent.
    pub fn add_selecting(&mut self, id: TargetId, who: Identifier) -> bool {
        let Some(t) = self.entry_mut(id) else {
            return false;
        };
        if t.selecting.contains(&who) {
            return false;
        }
        let previous = t.derived_state();
        t.selecting.push(who);
        t.events.emit(&TargetEvent::SelectingAdded(who));
        Self::emit_state_change(t, previous);
        true
    }

    /// Unmark a selecting interactor. Removing a non-member is a no-op.
    pub fn remove_selecting(&mut self, id: TargetId, who: Identifier) -> bool {
        let Some(t) = self.entry_mut(id) else {
            return false;
        };
        let Some(pos) = t.selecting.iter().position(|m| *m == who) else {
            return false;
        };
        let previous = t.derived_state();
        t.selecting.swap_remove(pos);
        t.events.emit(&TargetEvent::SelectingRemoved(who));
        Self::emit_state_change(t, previous);
        true
    }

    /// Forced cancellation from outside the per-tick flow: remove `who`
    /// from the selecting set first (selection implies association), then
    /// from the associated set.
    pub fn revoke_interactor(&mut self, id: TargetId, who: Identifier) {
        self.remove_selecting(id, who);
        self.remove_interactor(id, who);
    }

    /// Re-enable a disabled target. Enabling an enabled target is a no-op.
    pub fn enable(&mut self, id: TargetId) {
        let Some(t) = self.entry_mut(id) else {
            return;
        };
        if t.enabled {
            return;
        }
        t.enabled = true;
        t.events.emit(&TargetEvent::StateChanged(StateChange {
            previous: TargetState::Disabled,
            current: t.derived_state(),
        }));
    }

    /// Disable a target, force-removing all selecting interactors and then
    /// all associated interactors before flipping to `Disabled`.
    pub fn disable(&mut self, id: TargetId) {
        let (selecting, associated) = {
            let Some(t) = self.entry(id) else {
                return;
            };
            if !t.enabled {
                return;
            }
            // Snapshot both sets; removal events may re-enter these sets.
            (t.selecting.clone(), t.associated.clone())
        };
        for who in selecting {
            self.remove_selecting(id, who);
        }
        for who in associated {
            self.remove_interactor(id, who);
        }
        let Some(t) = self.entry_mut(id) else {
            return;
        };
        let previous = t.derived_state();
        t.enabled = false;
        t.events.emit(&TargetEvent::StateChanged(StateChange {
            previous,
            current: TargetState::Disabled,
        }));
    }

    fn emit_state_change(t: &mut Target<P>, previous: TargetState) {
        let current = t.derived_state();
        if current != previous {
            t.events
                .emit(&TargetEvent::StateChanged(StateChange { previous, current }));
        }
    }

    fn entry(&self, id: TargetId) -> Option<&Target<P>> {
        let e = self.entries.get(id.idx())?.as_ref()?;
        (self.generations[id.idx()] == id.1).then_some(e)
    }

    fn entry_mut(&mut self, id: TargetId) -> Option<&mut Target<P>> {
        let generation = *self.generations.get(id.idx())?;
        let e = self.entries.get_mut(id.idx())?.as_mut()?;
        (generation == id.1).then_some(e)
    }
}
