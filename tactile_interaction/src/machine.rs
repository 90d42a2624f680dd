// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Machine`], the standard [`Interactor`] implementation, and
//! [`Behavior`], the pluggable strategy it defers to.
//!
//! ## Division of labour
//!
//! `Machine` owns everything the protocol mandates: the state variable,
//! candidate / hovered / selected handles, the selector queue, capability
//! filters, the tie-break comparer, override slots and the state-changed
//! emitter. A [`Behavior`] supplies only what the protocol cannot know:
//! which targets are in range this tick (ranked best-first), optional
//! direct select/unselect intent (a trigger reading, say), and per-state
//! work.
//!
//! ## Error policy
//!
//! Protocol misuse (a transition called outside its source state) is a
//! silent no-op. Configuration misuse (an iteration bound of zero) is a
//! `debug_assert!`: fatal in development, a clamped no-op in release.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp::Ordering;

use tactile_core::comparer::CandidateComparer;
use tactile_core::event::{Emitter, HandlerId};
use tactile_core::filter::{Filter, Peer, TagMask, include_all};
use tactile_core::identifier::Identifier;
use tactile_core::selector::{SelectorQueue, SelectorSignal};
use tactile_core::state::{InteractorState, StateChange};

use crate::interactor::{DEFAULT_MAX_ITERATIONS, Interactor};
use crate::target::{TargetId, Targets};

/// Override computing the candidate directly from context.
pub type CandidateFn<P> = Box<dyn FnMut(&Targets<P>) -> Option<TargetId>>;
/// Override answering a select/unselect predicate directly.
pub type IntentFn = Box<dyn Fn() -> bool>;
/// Enable gate; `false` keeps (or forces) the machine disabled.
pub type GateFn = Box<dyn Fn() -> bool>;

/// A hook slot that is empty, sticky, or consumed by its first firing.
pub enum OverrideSlot<F> {
    /// No override installed.
    Unset,
    /// Fires every time until disarmed.
    Persistent(F),
    /// Fires once, then reverts to [`OverrideSlot::Unset`] when the
    /// transition it guarded commits.
    OneShot(F),
}

impl<F> OverrideSlot<F> {
    /// Install `f`; a one-shot slot clears itself after its transition.
    pub fn arm(&mut self, f: F, one_shot: bool) {
        *self = if one_shot {
            Self::OneShot(f)
        } else {
            Self::Persistent(f)
        };
    }

    /// Remove any installed override.
    pub fn disarm(&mut self) {
        *self = Self::Unset;
    }

    /// Whether an override is installed.
    pub fn is_armed(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Borrow the installed override.
    pub fn value(&self) -> Option<&F> {
        match self {
            Self::Unset => None,
            Self::Persistent(f) | Self::OneShot(f) => Some(f),
        }
    }

    /// Mutably borrow the installed override.
    pub fn value_mut(&mut self) -> Option<&mut F> {
        match self {
            Self::Unset => None,
            Self::Persistent(f) | Self::OneShot(f) => Some(f),
        }
    }

    /// Consume a one-shot override; persistent overrides stay.
    pub fn clear_one_shot(&mut self) {
        if matches!(self, Self::OneShot(_)) {
            *self = Self::Unset;
        }
    }
}

impl<F> Default for OverrideSlot<F> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<F> core::fmt::Debug for OverrideSlot<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Unset => "Unset",
            Self::Persistent(_) => "Persistent",
            Self::OneShot(_) => "OneShot",
        };
        f.write_str(name)
    }
}

/// The strategy half of a [`Machine`]: candidate supply, optional direct
/// intent, and per-state work. All hooks default to "nothing".
pub trait Behavior<P> {
    /// Targets in range this tick, ranked best-first. The machine applies
    /// filters, capability checks and the tie-break comparer on top.
    fn candidates(&mut self, targets: &Targets<P>) -> Vec<TargetId>;

    /// Candidate properties published for cross-interactor comparison.
    fn candidate_props(&self) -> Option<&dyn Any> {
        None
    }

    /// Direct select intent; `None` defers to the selector queue.
    fn select_intent(&self) -> Option<bool> {
        None
    }

    /// Direct unselect intent; `None` defers to the selector queue.
    fn unselect_intent(&self) -> Option<bool> {
        None
    }

    /// Runs at the start of every drive.
    fn on_preprocess(&mut self, targets: &mut Targets<P>) {
        let _ = targets;
    }

    /// Runs at the end of every drive.
    fn on_postprocess(&mut self, targets: &mut Targets<P>) {
        let _ = targets;
    }

    /// Per-round work while `Normal`.
    fn on_normal(&mut self, targets: &mut Targets<P>) {
        let _ = targets;
    }

    /// Per-round work while `Hover`.
    fn on_hover(&mut self, targets: &mut Targets<P>) {
        let _ = targets;
    }

    /// Per-round work while `Select`.
    fn on_select(&mut self, targets: &mut Targets<P>) {
        let _ = targets;
    }
}

/// The standard four-state interactor.
///
/// Created disabled; the first [`preprocess`](Interactor::preprocess)
/// enables it once its host is active and its gate (if any) passes.
pub struct Machine<P, B: Behavior<P>> {
    id: Identifier,
    tags: TagMask,
    state: InteractorState,
    behavior: B,
    candidate: Option<TargetId>,
    interactable: Option<TargetId>,
    selected: Option<TargetId>,
    selector: SelectorQueue,
    max_iterations: usize,
    host_active: bool,
    gate: Option<GateFn>,
    filters: Vec<Box<dyn Filter<Peer>>>,
    tiebreaker: Option<Box<dyn CandidateComparer<P>>>,
    candidate_override: OverrideSlot<CandidateFn<P>>,
    candidate_override_spent: bool,
    select_override: OverrideSlot<IntentFn>,
    unselect_override: OverrideSlot<IntentFn>,
    when_state_changed: Emitter<StateChange<InteractorState>>,
}

impl<P, B: Behavior<P>> core::fmt::Debug for Machine<P, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("candidate", &self.candidate)
            .field("interactable", &self.interactable)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<P, B: Behavior<P>> Machine<P, B> {
    /// Create a machine around `behavior`, in the `Disabled` state with an
    /// active host and no gate.
    pub fn new(id: Identifier, behavior: B) -> Self {
        Self {
            id,
            tags: TagMask::empty(),
            state: InteractorState::Disabled,
            behavior,
            candidate: None,
            interactable: None,
            selected: None,
            selector: SelectorQueue::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            host_active: true,
            gate: None,
            filters: Vec::new(),
            tiebreaker: None,
            candidate_override: OverrideSlot::Unset,
            candidate_override_spent: false,
            select_override: OverrideSlot::Unset,
            unselect_override: OverrideSlot::Unset,
            when_state_changed: Emitter::new(),
        }
    }

    /// Borrow the behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Mutably borrow the behavior.
    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    /// Current candidate target.
    pub fn candidate(&self) -> Option<TargetId> {
        self.candidate
    }

    /// Hovered (committed) target.
    pub fn interactable(&self) -> Option<TargetId> {
        self.interactable
    }

    /// Selected target.
    pub fn selected(&self) -> Option<TargetId> {
        self.selected
    }

    /// The profile this machine presents to target-side filters.
    pub fn peer(&self) -> Peer {
        Peer {
            id: self.id,
            tags: self.tags,
        }
    }

    /// Set the interaction tags carried by this machine.
    pub fn set_tags(&mut self, tags: TagMask) {
        self.tags = tags;
    }

    /// Set the per-drive transition bound. Must be at least 1.
    pub fn set_max_iterations(&mut self, bound: usize) {
        debug_assert!(bound >= 1, "iteration bound must be at least 1");
        self.max_iterations = bound.max(1);
    }

    /// Install or remove the enable gate. Re-evaluated every preprocess;
    /// a failing gate force-disables the machine from any state.
    pub fn set_enable_gate(&mut self, gate: Option<GateFn>) {
        self.gate = gate;
    }

    /// Add a source-side capability filter judging target profiles.
    pub fn add_filter(&mut self, filter: Box<dyn Filter<Peer>>) {
        self.filters.push(filter);
    }

    /// Install the tie-break comparer applied after the behavior's base
    /// ranking; `Less` prefers its first argument, `Equal` keeps the
    /// earlier-ranked candidate.
    pub fn set_tiebreaker(&mut self, cmp: Option<Box<dyn CandidateComparer<P>>>) {
        self.tiebreaker = cmp;
    }

    /// Install a candidate override. A one-shot override is consumed at
    /// the end of the drive in which the hover it steered commits, so it
    /// keeps steering recomputes within that drive.
    pub fn set_candidate_override(&mut self, f: CandidateFn<P>, one_shot: bool) {
        self.candidate_override.arm(f, one_shot);
    }

    /// Remove the candidate override.
    pub fn clear_candidate_override(&mut self) {
        self.candidate_override.disarm();
    }

    /// Install a select-predicate override; one-shot variants are consumed
    /// when the select commits.
    pub fn set_select_override(&mut self, f: IntentFn, one_shot: bool) {
        self.select_override.arm(f, one_shot);
    }

    /// Remove the select-predicate override.
    pub fn clear_select_override(&mut self) {
        self.select_override.disarm();
    }

    /// Install an unselect-predicate override; one-shot variants are
    /// consumed when the unselect commits.
    pub fn set_unselect_override(&mut self, f: IntentFn, one_shot: bool) {
        self.unselect_override.arm(f, one_shot);
    }

    /// Remove the unselect-predicate override.
    pub fn clear_unselect_override(&mut self) {
        self.unselect_override.disarm();
    }

    /// Queue an external select signal. Returns `false` when it collapses
    /// into the previous signal of the same kind.
    pub fn notify_selected(&mut self) -> bool {
        self.selector.push(SelectorSignal::Select)
    }

    /// Queue an external unselect signal. Returns `false` when it
    /// collapses into the previous signal of the same kind.
    pub fn notify_unselected(&mut self) -> bool {
        self.selector.push(SelectorSignal::Unselect)
    }

    /// Observe state changes; fires strictly after the state flipped.
    pub fn subscribe_state_changed(
        &mut self,
        handler: impl FnMut(&StateChange<InteractorState>) + 'static,
    ) -> HandlerId {
        self.when_state_changed.subscribe(handler)
    }

    /// Remove a state-change handler.
    pub fn unsubscribe_state_changed(&mut self, handler: HandlerId) -> bool {
        self.when_state_changed.unsubscribe(handler)
    }

    /// Whether this machine may currently pair with `target`: the
    /// machine's own filters accept the target's profile, and the target
    /// accepts the machine back (capability and cardinality).
    pub fn can_select(&self, targets: &Targets<P>, target: TargetId) -> bool {
        let Some(profile) = targets.profile(target) else {
            return false;
        };
        if !include_all(&self.filters, &profile) {
            return false;
        }
        targets.can_be_selected_by(target, &self.peer())
    }

    fn set_state(&mut self, next: InteractorState) {
        let previous = self.state;
        self.state = next;
        self.when_state_changed
            .emit(&StateChange {
                previous,
                current: next,
            });
    }

    fn select_signal(&self) -> bool {
        if let Some(f) = self.select_override.value() {
            return f();
        }
        if let Some(intent) = self.behavior.select_intent() {
            return intent;
        }
        self.selector.peek() == Some(SelectorSignal::Select)
    }

    fn unselect_signal(&self) -> bool {
        if let Some(f) = self.unselect_override.value() {
            return f();
        }
        if let Some(intent) = self.behavior.unselect_intent() {
            return intent;
        }
        self.selector.peek() == Some(SelectorSignal::Unselect)
    }

    fn gate_passes(&self) -> bool {
        self.gate.as_ref().is_none_or(|g| g())
    }
}

impl<P, B: Behavior<P>> Interactor<P> for Machine<P, B> {
    fn id(&self) -> Identifier {
        self.id
    }

    fn state(&self) -> InteractorState {
        self.state
    }

    fn host_active(&self) -> bool {
        self.host_active
    }

    fn set_host_active(&mut self, active: bool) {
        self.host_active = active;
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn preprocess(&mut self, targets: &mut Targets<P>) {
        self.behavior.on_preprocess(targets);
        if self.host_active && self.gate_passes() {
            if self.state == InteractorState::Disabled {
                self.enable(targets);
            }
        } else {
            self.disable(targets);
        }
    }

    fn process(&mut self, targets: &mut Targets<P>) {
        match self.state {
            InteractorState::Normal => self.behavior.on_normal(targets),
            InteractorState::Hover => self.behavior.on_hover(targets),
            InteractorState::Select => self.behavior.on_select(targets),
            InteractorState::Disabled => {}
        }
    }

    fn postprocess(&mut self, targets: &mut Targets<P>) {
        // Unconsumed signals do not carry across ticks.
        self.selector.clear();
        if self.candidate_override_spent {
            self.candidate_override.clear_one_shot();
            self.candidate_override_spent = false;
        }
        self.behavior.on_postprocess(targets);
    }

    fn process_candidate(&mut self, targets: &mut Targets<P>) {
        let chosen = if let Some(compute) = self.candidate_override.value_mut() {
            compute(targets)
        } else {
            let ranked = self.behavior.candidates(targets);
            let mut best: Option<TargetId> = None;
            for tid in ranked {
                if !self.can_select(targets, tid) {
                    continue;
                }
                best = Some(match best {
                    None => tid,
                    Some(held) => {
                        // Only a strict preference displaces the
                        // earlier-ranked candidate.
                        if let Some(cmp) = &self.tiebreaker
                            && let (Some(a), Some(b)) = (targets.payload(tid), targets.payload(held))
                            && cmp.compare(a, b) == Ordering::Less
                        {
                            tid
                        } else {
                            held
                        }
                    }
                });
            }
            best
        };
        self.candidate = chosen;
    }

    fn has_candidate(&self) -> bool {
        self.candidate.is_some()
    }

    fn candidate_props(&self) -> Option<&dyn Any> {
        self.behavior.candidate_props()
    }

    fn should_hover(&self, _targets: &Targets<P>) -> bool {
        self.state == InteractorState::Normal && (self.candidate.is_some() || self.select_signal())
    }

    fn should_unhover(&self, _targets: &Targets<P>) -> bool {
        self.state == InteractorState::Hover
            && (self.candidate.is_none() || self.candidate != self.interactable)
    }

    fn should_select(&self, _targets: &Targets<P>) -> bool {
        self.state == InteractorState::Hover && self.select_signal()
    }

    fn should_unselect(&self, targets: &Targets<P>) -> bool {
        if self.state != InteractorState::Select {
            return false;
        }
        // Forced cancellation: the target was disabled, removed, or this
        // machine was revoked from its selecting set. Teardown still runs
        // through the ordinary unselect transition.
        if let Some(t) = self.selected
            && !targets.contains_selecting(t, self.id)
        {
            return true;
        }
        self.unselect_signal()
    }

    fn enable(&mut self, _targets: &mut Targets<P>) {
        if self.state != InteractorState::Disabled {
            return;
        }
        if !(self.host_active && self.gate_passes()) {
            return;
        }
        self.set_state(InteractorState::Normal);
    }

    fn disable(&mut self, targets: &mut Targets<P>) {
        match self.state {
            InteractorState::Disabled => return,
            InteractorState::Select => {
                self.unselect(targets);
                self.unhover(targets);
            }
            InteractorState::Hover => self.unhover(targets),
            InteractorState::Normal => {}
        }
        self.candidate = None;
        self.set_state(InteractorState::Disabled);
    }

    fn hover(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Normal {
            return;
        }
        self.interactable = self.candidate;
        if let Some(t) = self.interactable {
            targets.add_interactor(t, self.id);
        }
        if self.candidate_override.is_armed() {
            self.candidate_override_spent = true;
        }
        self.set_state(InteractorState::Hover);
    }

    fn unhover(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Hover {
            return;
        }
        if let Some(t) = self.interactable.take() {
            targets.remove_interactor(t, self.id);
        }
        self.set_state(InteractorState::Normal);
    }

    fn select(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Hover {
            return;
        }
        self.selected = self.interactable;
        if let Some(t) = self.selected {
            targets.add_selecting(t, self.id);
        }
        self.selector.consume(SelectorSignal::Select);
        self.select_override.clear_one_shot();
        self.set_state(InteractorState::Select);
    }

    fn unselect(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Select {
            return;
        }
        if let Some(t) = self.selected.take() {
            targets.remove_selecting(t, self.id);
        }
        self.selector.consume(SelectorSignal::Unselect);
        self.unselect_override.clear_one_shot();
        self.set_state(InteractorState::Hover);
    }
}
