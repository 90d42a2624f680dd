// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactor contract and the per-tick drive template.

use core::any::Any;

use tactile_core::identifier::Identifier;
use tactile_core::state::InteractorState;

use crate::target::Targets;

/// Default bound on state transitions per drive.
///
/// Three covers the longest useful settle in one tick (for example
/// `Normal → Hover → Select`, or a select hand-off `Select → Hover →
/// Select`) while still cutting off livelock between mutually
/// contradictory predicates.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// An interaction source: a four-state machine driven once per tick.
///
/// States are `Disabled`, `Normal`, `Hover` and `Select`; all legal
/// transitions run through [`enable`](Interactor::enable) /
/// [`disable`](Interactor::disable) / [`hover`](Interactor::hover) /
/// [`unhover`](Interactor::unhover) / [`select`](Interactor::select) /
/// [`unselect`](Interactor::unselect). Calling a transition outside its
/// source state is a protocol no-op, never an error.
///
/// Every method threads the interaction context (`&Targets<P>` or
/// `&mut Targets<P>`) explicitly; an interactor holds [`crate::TargetId`]
/// handles, never references into the arena.
pub trait Interactor<P> {
    /// Process-unique identity of this interactor.
    fn id(&self) -> Identifier;

    /// Current protocol state.
    fn state(&self) -> InteractorState;

    /// Whether the hosting scene object is active. An inactive host keeps
    /// the interactor disabled regardless of its enable gate.
    fn host_active(&self) -> bool;

    /// Flip host activity. Takes effect at the next preprocess.
    fn set_host_active(&mut self, active: bool);

    /// Per-drive transition bound; at least 1.
    fn max_iterations(&self) -> usize {
        DEFAULT_MAX_ITERATIONS
    }

    /// Start-of-drive hook: re-evaluate the enable gate, settle
    /// enable/disable, run pre-tick bookkeeping.
    fn preprocess(&mut self, targets: &mut Targets<P>);

    /// Per-state work for the current state.
    fn process(&mut self, targets: &mut Targets<P>);

    /// End-of-drive hook: flush stale external signals, run post-tick
    /// bookkeeping. Runs even when the drive early-outs disabled.
    fn postprocess(&mut self, targets: &mut Targets<P>);

    /// Recompute the candidate target from current context.
    fn process_candidate(&mut self, targets: &mut Targets<P>);

    /// Whether a candidate is currently held.
    fn has_candidate(&self) -> bool;

    /// Candidate properties exposed for cross-interactor comparison,
    /// if this interactor publishes any.
    fn candidate_props(&self) -> Option<&dyn Any> {
        None
    }

    /// `Normal → Hover` predicate.
    fn should_hover(&self, targets: &Targets<P>) -> bool;
    /// `Hover → Normal` predicate.
    fn should_unhover(&self, targets: &Targets<P>) -> bool;
    /// `Hover → Select` predicate.
    fn should_select(&self, targets: &Targets<P>) -> bool;
    /// `Select → Hover` predicate.
    fn should_unselect(&self, targets: &Targets<P>) -> bool;

    /// `Disabled → Normal`. No-op unless disabled, the host is active and
    /// the enable gate (if any) passes.
    fn enable(&mut self, targets: &mut Targets<P>);

    /// `* → Disabled`, cascading down through `unselect` and `unhover` so
    /// targets observe an orderly teardown. No-op when already disabled.
    fn disable(&mut self, targets: &mut Targets<P>);

    /// `Normal → Hover`, committing the current candidate (if any) as the
    /// hovered interactable.
    fn hover(&mut self, targets: &mut Targets<P>);

    /// `Hover → Normal`, releasing the hovered interactable.
    fn unhover(&mut self, targets: &mut Targets<P>);

    /// `Hover → Select`, committing the hovered interactable (if any) as
    /// selected.
    fn select(&mut self, targets: &mut Targets<P>);

    /// `Select → Hover`, releasing the selected interactable.
    fn unselect(&mut self, targets: &mut Targets<P>);

    /// Drive the machine for one tick.
    ///
    /// Preprocess, then up to [`max_iterations`](Interactor::max_iterations)
    /// rounds of candidate recompute / process / at most one transition,
    /// then postprocess. The candidate is recomputed in `Normal`, and in
    /// `Hover` unless the previous round ended a selection (so a fresh
    /// unselect gets one round to unhover against its committed target
    /// before re-acquisition).
    fn drive(&mut self, targets: &mut Targets<P>) {
        self.preprocess(targets);
        if self.state() == InteractorState::Disabled {
            self.postprocess(targets);
            return;
        }
        let mut previous = self.state();
        for _ in 0..self.max_iterations() {
            let state = self.state();
            if state == InteractorState::Normal
                || (state == InteractorState::Hover && previous != InteractorState::Select)
            {
                self.process_candidate(targets);
            }
            previous = state;
            self.process(targets);
            let transitioned = match self.state() {
                InteractorState::Normal => {
                    if self.should_hover(targets) {
                        self.hover(targets);
                        true
                    } else {
                        false
                    }
                }
                InteractorState::Hover => {
                    // Selection outranks losing the candidate: a queued
                    // select fires before the unhover check runs.
                    if self.should_select(targets) {
                        self.select(targets);
                        true
                    } else if self.should_unhover(targets) {
                        self.unhover(targets);
                        true
                    } else {
                        false
                    }
                }
                InteractorState::Select => {
                    if self.should_unselect(targets) {
                        self.unselect(targets);
                        true
                    } else {
                        false
                    }
                }
                InteractorState::Disabled => false,
            };
            if !transitioned {
                break;
            }
        }
        self.postprocess(targets);
    }
}
