// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Best-Select policy: everyone hovers, one selects.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp::Ordering;

use tactile_core::comparer::CandidateComparer;
use tactile_core::event::HandlerId;
use tactile_core::identifier::Identifier;
use tactile_core::state::{InteractorState, StateChange};
use tactile_interaction::interactor::Interactor;
use tactile_interaction::target::Targets;

use crate::group::GroupCore;

/// A group that arbitrates at selection time instead of hover time.
///
/// Members hover and unhover freely, several at once; the group is
/// `Hover` whenever any member is engaged. Only when a hovering member
/// wants to select does the group pick a single winner: the
/// lowest-indexed selecting-ready member, unless a comparer over
/// published candidate properties prefers a later one. The winner
/// selects and everyone else is benched until it lets go.
pub struct BestSelectGroup<P> {
    core: GroupCore<P>,
}

impl<P> core::fmt::Debug for BestSelectGroup<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BestSelectGroup")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<P> BestSelectGroup<P> {
    /// Create a group over `children`. Must not be empty.
    pub fn new(id: Identifier, children: Vec<Box<dyn Interactor<P>>>) -> Self {
        Self {
            core: GroupCore::new(id, children),
        }
    }

    /// Install or remove the cross-member preference used at selection.
    pub fn set_comparer(&mut self, cmp: Option<Box<dyn CandidateComparer<dyn Any>>>) {
        self.core.comparer = cmp;
    }

    /// Set the per-drive transition bound. Must be at least 1.
    pub fn set_max_iterations(&mut self, bound: usize) {
        debug_assert!(bound >= 1, "iteration bound must be at least 1");
        self.core.max_iterations = bound.max(1);
    }

    /// Index of the selecting member, if any.
    pub fn best_index(&self) -> Option<usize> {
        self.core.best
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.core.children.len()
    }

    /// Whether the group has no members. Never true for a well-formed
    /// group.
    pub fn is_empty(&self) -> bool {
        self.core.children.is_empty()
    }

    /// Borrow a member.
    pub fn child(&self, index: usize) -> Option<&dyn Interactor<P>> {
        self.core.children.get(index).map(Box::as_ref)
    }

    /// Mutably borrow a member.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Interactor<P> + 'static)> {
        self.core.children.get_mut(index).map(Box::as_mut)
    }

    /// Observe group state changes; fires strictly after the flip.
    pub fn subscribe_state_changed(
        &mut self,
        handler: impl FnMut(&StateChange<InteractorState>) + 'static,
    ) -> HandlerId {
        self.core.when_state_changed.subscribe(handler)
    }

    /// Remove a state-change handler.
    pub fn unsubscribe_state_changed(&mut self, handler: HandlerId) -> bool {
        self.core.when_state_changed.unsubscribe(handler)
    }
}

impl<P> Interactor<P> for BestSelectGroup<P> {
    fn id(&self) -> Identifier {
        self.core.id
    }

    fn state(&self) -> InteractorState {
        self.core.state
    }

    fn host_active(&self) -> bool {
        self.core.host_active
    }

    fn set_host_active(&mut self, active: bool) {
        self.core.host_active = active;
    }

    fn max_iterations(&self) -> usize {
        self.core.max_iterations
    }

    fn preprocess(&mut self, targets: &mut Targets<P>) {
        self.core.preprocess_children(targets);
        if self.core.host_active {
            self.core.enable_group();
        } else {
            self.disable(targets);
        }
    }

    /// Runs member work and lets members hover and unhover on their own
    /// predicates, one step per member per round. While a selection is
    /// held, only the winner runs.
    fn process(&mut self, targets: &mut Targets<P>) {
        if self.core.state == InteractorState::Select {
            if let Some(winner) = self.core.best {
                self.core.children[winner].process(targets);
            }
            return;
        }
        for i in 0..self.core.children.len() {
            let child = &mut self.core.children[i];
            if child.state() == InteractorState::Disabled {
                continue;
            }
            child.process(targets);
            match child.state() {
                InteractorState::Normal => {
                    if child.should_hover(targets) {
                        child.hover(targets);
                    }
                }
                InteractorState::Hover => {
                    if child.should_unhover(targets) {
                        child.unhover(targets);
                    }
                }
                _ => {}
            }
        }
    }

    fn postprocess(&mut self, targets: &mut Targets<P>) {
        self.core.postprocess_children(targets);
    }

    fn process_candidate(&mut self, targets: &mut Targets<P>) {
        self.core.process_candidates(targets);
    }

    fn has_candidate(&self) -> bool {
        self.core.any_candidate()
    }

    fn candidate_props(&self) -> Option<&dyn Any> {
        self.core
            .best
            .and_then(|i| self.core.children[i].candidate_props())
    }

    fn should_hover(&self, _targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Normal && self.core.any_engaged()
    }

    fn should_unhover(&self, _targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Hover && !self.core.any_engaged()
    }

    fn should_select(&self, targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Hover
            && self.core.children.iter().any(|child| {
                child.state() == InteractorState::Hover && child.should_select(targets)
            })
    }

    fn should_unselect(&self, targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Select
            && (!self.core.best_is_engaged()
                || self
                    .core
                    .best
                    .is_some_and(|i| self.core.children[i].should_unselect(targets)))
    }

    fn enable(&mut self, _targets: &mut Targets<P>) {
        self.core.enable_group();
    }

    fn disable(&mut self, targets: &mut Targets<P>) {
        match self.core.state {
            InteractorState::Disabled => return,
            InteractorState::Select => {
                self.unselect(targets);
                self.unhover(targets);
            }
            InteractorState::Hover => self.unhover(targets),
            InteractorState::Normal => {}
        }
        self.core.finish_disable(targets);
    }

    /// The group state only mirrors its members here; no commitment is
    /// made at hover time.
    fn hover(&mut self, _targets: &mut Targets<P>) {
        if self.core.state != InteractorState::Normal {
            return;
        }
        self.core.set_state(InteractorState::Hover);
    }

    fn unhover(&mut self, _targets: &mut Targets<P>) {
        if self.core.state != InteractorState::Hover {
            return;
        }
        self.core.set_state(InteractorState::Normal);
    }

    fn select(&mut self, targets: &mut Targets<P>) {
        if self.core.state != InteractorState::Hover {
            return;
        }
        let mut winner: Option<usize> = None;
        for i in 0..self.core.children.len() {
            let child = &self.core.children[i];
            if child.state() != InteractorState::Hover || !child.should_select(targets) {
                continue;
            }
            winner = Some(match winner {
                None => i,
                Some(held) => {
                    if let Some(cmp) = &self.core.comparer
                        && let (Some(a), Some(b)) = (
                            self.core.children[i].candidate_props(),
                            self.core.children[held].candidate_props(),
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
        if let Some(w) = winner {
            self.core.children[w].select(targets);
            self.core.bench_siblings(w, targets);
            self.core.best = Some(w);
        }
        self.core.set_state(InteractorState::Select);
    }

    fn unselect(&mut self, targets: &mut Targets<P>) {
        if self.core.state != InteractorState::Select {
            return;
        }
        if let Some(winner) = self.core.best.take() {
            self.core.children[winner].unselect(targets);
            self.core.revive_siblings(winner, targets);
        }
        self.core.set_state(InteractorState::Hover);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::member;
    use alloc::vec;
    use tactile_core::comparer::ScopedComparer;
    use tactile_core::identifier::IdentifierPool;

    #[test]
    fn members_hover_concurrently() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);

        assert_eq!(g.state(), InteractorState::Hover);
        assert_eq!(g.best_index(), None);
        assert_eq!(g.child(0).unwrap().state(), InteractorState::Hover);
        assert_eq!(g.child(1).unwrap().state(), InteractorState::Hover);
        assert_eq!(targets.interactor_count(t1), 1);
        assert_eq!(targets.interactor_count(t2), 1);
    }

    // Selection picks one winner and benches the other hoverers, clearing
    // their target associations.
    #[test]
    fn selection_benches_the_other_hoverers() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);

        c1.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Select);
        assert_eq!(g.best_index(), Some(1));
        assert_eq!(g.child(0).unwrap().state(), InteractorState::Disabled);
        assert_eq!(targets.interactor_count(t1), 0);
        assert_eq!(targets.selecting_count(t2), 1);
    }

    // Two members want to select in the same drive: the comparer decides.
    #[test]
    fn simultaneous_selects_go_to_the_comparer() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 2);
        let (m1, c1) = member(&mut pool, 9);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0, m1]);
        g.set_comparer(Some(Box::new(ScopedComparer::new(|a: &u32, b: &u32| {
            b.cmp(a)
        }))));
        g.drive(&mut targets);

        c0.select.set(true);
        c1.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.best_index(), Some(1));
        assert_eq!(targets.selecting_count(t2), 1);
        assert_eq!(targets.selecting_count(t1), 0);
    }

    // Without a comparer the lowest index wins a simultaneous select.
    #[test]
    fn simultaneous_selects_default_to_lowest_index() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);
        c0.select.set(true);
        c1.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.best_index(), Some(0));
    }

    // Releasing the selection revives the bench; hovering resumes for
    // everyone by the next drive.
    #[test]
    fn unselect_revives_the_bench() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);
        c0.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.best_index(), Some(0));

        c0.select.set(false);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Hover);
        assert_eq!(g.best_index(), None);
        assert_eq!(targets.selecting_count(t1), 0);
        assert_eq!(targets.interactor_count(t1), 1);

        g.drive(&mut targets);
        assert_eq!(targets.interactor_count(t2), 1);
    }

    #[test]
    fn group_goes_normal_when_everyone_unhovers() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);

        let mut g = BestSelectGroup::new(pool.issue(), vec![m0]);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Hover);

        c0.ranked.borrow_mut().clear();
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Normal);
        assert_eq!(targets.interactor_count(t1), 0);
    }
}
