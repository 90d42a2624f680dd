// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared plumbing for the group policies.
//!
//! A group is itself an interactor whose transitions are decided by
//! arbitrating over its members. Members are owned boxed interactors;
//! losing members are *benched*: their host is marked inactive and they
//! are disabled, so they stay down across drives until the group revives
//! them. Groups nest, since members are only required to implement
//! [`Interactor`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp::Ordering;

use tactile_core::comparer::CandidateComparer;
use tactile_core::event::Emitter;
use tactile_core::identifier::Identifier;
use tactile_core::state::{InteractorState, StateChange};
use tactile_interaction::interactor::{DEFAULT_MAX_ITERATIONS, Interactor};
use tactile_interaction::target::Targets;

pub(crate) struct GroupCore<P> {
    pub(crate) id: Identifier,
    pub(crate) state: InteractorState,
    pub(crate) children: Vec<Box<dyn Interactor<P>>>,
    /// Index of the member holding the group's commitment, if any.
    pub(crate) best: Option<usize>,
    pub(crate) host_active: bool,
    pub(crate) max_iterations: usize,
    /// Cross-member preference over published candidate properties.
    pub(crate) comparer: Option<Box<dyn CandidateComparer<dyn Any>>>,
    pub(crate) when_state_changed: Emitter<StateChange<InteractorState>>,
}

impl<P> core::fmt::Debug for GroupCore<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GroupCore")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("members", &self.children.len())
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl<P> GroupCore<P> {
    pub(crate) fn new(id: Identifier, children: Vec<Box<dyn Interactor<P>>>) -> Self {
        debug_assert!(!children.is_empty(), "a group needs at least one member");
        Self {
            id,
            state: InteractorState::Disabled,
            children,
            best: None,
            host_active: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            comparer: None,
            when_state_changed: Emitter::new(),
        }
    }

    pub(crate) fn set_state(&mut self, next: InteractorState) {
        let previous = self.state;
        self.state = next;
        self.when_state_changed.emit(&StateChange {
            previous,
            current: next,
        });
    }

    pub(crate) fn enable_group(&mut self) {
        if self.state == InteractorState::Disabled && self.host_active {
            self.set_state(InteractorState::Normal);
        }
    }

    pub(crate) fn preprocess_children(&mut self, targets: &mut Targets<P>) {
        for child in &mut self.children {
            child.preprocess(targets);
        }
    }

    pub(crate) fn postprocess_children(&mut self, targets: &mut Targets<P>) {
        for child in &mut self.children {
            child.postprocess(targets);
        }
    }

    /// Recompute candidates for members that can still change their mind:
    /// disabled members have nothing to compute, a selecting member keeps
    /// its commitment.
    pub(crate) fn process_candidates(&mut self, targets: &mut Targets<P>) {
        for child in &mut self.children {
            let state = child.state();
            if state != InteractorState::Disabled && state != InteractorState::Select {
                child.process_candidate(targets);
            }
        }
    }

    pub(crate) fn any_candidate(&self) -> bool {
        self.children.iter().any(|c| c.has_candidate())
    }

    pub(crate) fn any_engaged(&self) -> bool {
        self.children.iter().any(|c| c.state().is_engaged())
    }

    pub(crate) fn best_is_engaged(&self) -> bool {
        self.best.is_some_and(|i| self.children[i].state().is_engaged())
    }

    /// Pick the winning member among those ready to hover: the
    /// lowest-indexed hover-ready member, unless the comparer states a
    /// strict preference for a later one over the incumbent.
    pub(crate) fn select_best(&self, targets: &Targets<P>, skip: Option<usize>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, child) in self.children.iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            if child.state() != InteractorState::Normal || !child.should_hover(targets) {
                continue;
            }
            best = Some(match best {
                None => i,
                Some(held) => {
                    if let Some(cmp) = &self.comparer
                        && let (Some(a), Some(b)) = (
                            self.children[i].candidate_props(),
                            self.children[held].candidate_props(),
                        )
                        && cmp.compare(a, b) == Ordering::Less
                    {
                        i
                    } else {
                        held
                    }
                }
            });
        }
        best
    }

    /// Put every member but `keep` on the bench: host inactive, disabled.
    pub(crate) fn bench_siblings(&mut self, keep: usize, targets: &mut Targets<P>) {
        for i in 0..self.children.len() {
            if i == keep {
                continue;
            }
            let child = &mut self.children[i];
            child.set_host_active(false);
            child.disable(targets);
        }
    }

    /// Bring benched members back: host active again, enabled now rather
    /// than at their next preprocess so they can compete this very drive.
    pub(crate) fn revive_siblings(&mut self, keep: usize, targets: &mut Targets<P>) {
        for i in 0..self.children.len() {
            if i == keep {
                continue;
            }
            let child = &mut self.children[i];
            child.set_host_active(true);
            child.enable(targets);
        }
    }

    // Transition set shared by the single-winner policies.

    pub(crate) fn hover_exclusive(&mut self, targets: &mut Targets<P>, skip: Option<usize>) {
        if self.state != InteractorState::Normal {
            return;
        }
        let Some(winner) = self.select_best(targets, skip) else {
            return;
        };
        self.children[winner].hover(targets);
        self.bench_siblings(winner, targets);
        self.best = Some(winner);
        self.set_state(InteractorState::Hover);
    }

    pub(crate) fn unhover_exclusive(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Hover {
            return;
        }
        if let Some(winner) = self.best.take() {
            self.children[winner].unhover(targets);
            self.revive_siblings(winner, targets);
        }
        self.set_state(InteractorState::Normal);
    }

    pub(crate) fn select_exclusive(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Hover {
            return;
        }
        if let Some(winner) = self.best {
            self.children[winner].select(targets);
        }
        self.set_state(InteractorState::Select);
    }

    pub(crate) fn unselect_exclusive(&mut self, targets: &mut Targets<P>) {
        if self.state != InteractorState::Select {
            return;
        }
        if let Some(winner) = self.best {
            self.children[winner].unselect(targets);
        }
        self.set_state(InteractorState::Hover);
    }

    /// Full teardown: cascade the group's own state down, then disable
    /// every member. `unselect` / `unhover` are the policy's transitions,
    /// already applied by the caller for engaged states.
    pub(crate) fn finish_disable(&mut self, targets: &mut Targets<P>) {
        for child in &mut self.children {
            child.disable(targets);
        }
        self.set_state(InteractorState::Disabled);
    }
}
