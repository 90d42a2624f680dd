// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Best-Hover policy: one winner, chosen when hover begins.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use tactile_core::comparer::CandidateComparer;
use tactile_core::event::HandlerId;
use tactile_core::identifier::Identifier;
use tactile_core::state::{InteractorState, StateChange};
use tactile_interaction::interactor::Interactor;
use tactile_interaction::target::Targets;

use crate::group::GroupCore;

/// A group that lets exactly one member engage at a time.
///
/// While every member is `Normal` the group is `Normal`. The moment at
/// least one member is ready to hover, the group hovers: the winner is
/// the lowest-indexed hover-ready member, unless a comparer over the
/// members' published candidate properties prefers a later one. All
/// other members are benched (host inactive, disabled) for as long as
/// the winner stays engaged; select and unselect are delegated to the
/// winner. When the winner lets go, the bench is revived and
/// arbitration starts over, possibly within the same drive.
pub struct BestHoverGroup<P> {
    core: GroupCore<P>,
}

impl<P> core::fmt::Debug for BestHoverGroup<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BestHoverGroup")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<P> BestHoverGroup<P> {
    /// Create a group over `children`. Must not be empty.
    pub fn new(id: Identifier, children: Vec<Box<dyn Interactor<P>>>) -> Self {
        Self {
            core: GroupCore::new(id, children),
        }
    }

    /// Install or remove the cross-member preference. Members publish
    /// candidate properties as `&dyn Any`; pairs the comparer does not
    /// recognize count as "no preference".
    pub fn set_comparer(&mut self, cmp: Option<Box<dyn CandidateComparer<dyn Any>>>) {
        self.core.comparer = cmp;
    }

    /// Set the per-drive transition bound. Must be at least 1.
    pub fn set_max_iterations(&mut self, bound: usize) {
        debug_assert!(bound >= 1, "iteration bound must be at least 1");
        self.core.max_iterations = bound.max(1);
    }

    /// Index of the currently engaged member, if any.
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

impl<P> Interactor<P> for BestHoverGroup<P> {
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

    fn process(&mut self, targets: &mut Targets<P>) {
        if let Some(winner) = self.core.best {
            self.core.children[winner].process(targets);
        } else {
            for child in &mut self.core.children {
                if child.state() != InteractorState::Disabled {
                    child.process(targets);
                }
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

    fn should_hover(&self, targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Normal
            && self.core.select_best(targets, None).is_some()
    }

    fn should_unhover(&self, targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Hover
            && (!self.core.best_is_engaged()
                || self
                    .core
                    .best
                    .is_some_and(|i| self.core.children[i].should_unhover(targets)))
    }

    fn should_select(&self, targets: &Targets<P>) -> bool {
        self.core.state == InteractorState::Hover
            && self
                .core
                .best
                .is_some_and(|i| self.core.children[i].should_select(targets))
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
                self.core.unselect_exclusive(targets);
                self.core.unhover_exclusive(targets);
            }
            InteractorState::Hover => self.core.unhover_exclusive(targets),
            InteractorState::Normal => {}
        }
        self.core.finish_disable(targets);
    }

    fn hover(&mut self, targets: &mut Targets<P>) {
        self.core.hover_exclusive(targets, None);
    }

    fn unhover(&mut self, targets: &mut Targets<P>) {
        self.core.unhover_exclusive(targets);
    }

    fn select(&mut self, targets: &mut Targets<P>) {
        self.core.select_exclusive(targets);
    }

    fn unselect(&mut self, targets: &mut Targets<P>) {
        self.core.unselect_exclusive(targets);
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
    fn lowest_index_wins_and_losers_are_benched() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestHoverGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);

        assert_eq!(g.state(), InteractorState::Hover);
        assert_eq!(g.best_index(), Some(0));
        assert_eq!(g.child(0).unwrap().state(), InteractorState::Hover);
        assert_eq!(g.child(1).unwrap().state(), InteractorState::Disabled);
        assert_eq!(targets.interactor_count(t1), 1);
        assert_eq!(targets.interactor_count(t2), 0);
    }

    // A comparer over published candidate properties can overrule the
    // index order.
    #[test]
    fn comparer_prefers_higher_scoring_member() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 2);
        let (m1, c1) = member(&mut pool, 9);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestHoverGroup::new(pool.issue(), vec![m0, m1]);
        g.set_comparer(Some(Box::new(ScopedComparer::new(|a: &u32, b: &u32| {
            b.cmp(a)
        }))));
        g.drive(&mut targets);

        assert_eq!(g.best_index(), Some(1));
        assert_eq!(targets.interactor_count(t2), 1);
    }

    // Losing the hovered target revives the bench, and a sibling can take
    // over within the same drive.
    #[test]
    fn released_hover_hands_over_to_a_sibling() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let t2 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);
        c1.ranked.borrow_mut().push(t2);

        let mut g = BestHoverGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);
        assert_eq!(g.best_index(), Some(0));

        c0.ranked.borrow_mut().clear();
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Hover);
        assert_eq!(g.best_index(), Some(1));
        assert_eq!(targets.interactor_count(t1), 0);
        assert_eq!(targets.interactor_count(t2), 1);
    }

    #[test]
    fn select_and_unselect_delegate_to_the_winner() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);

        let mut g = BestHoverGroup::new(pool.issue(), vec![m0]);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Hover);

        c0.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Select);
        assert_eq!(g.child(0).unwrap().state(), InteractorState::Select);
        assert_eq!(targets.selecting_count(t1), 1);

        c0.select.set(false);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Hover);
        assert_eq!(targets.selecting_count(t1), 0);
        assert_eq!(targets.interactor_count(t1), 1);
    }

    // An inactive host unwinds the whole group, leaving target sets clean.
    #[test]
    fn inactive_host_unwinds_selection() {
        let mut pool = IdentifierPool::new();
        let mut targets: Targets<()> = Targets::new();
        let t1 = targets.insert(());
        let (m0, c0) = member(&mut pool, 1);
        let (m1, _c1) = member(&mut pool, 1);
        c0.ranked.borrow_mut().push(t1);

        let mut g = BestHoverGroup::new(pool.issue(), vec![m0, m1]);
        g.drive(&mut targets);
        c0.select.set(true);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Select);

        g.set_host_active(false);
        g.drive(&mut targets);
        assert_eq!(g.state(), InteractorState::Disabled);
        assert_eq!(g.child(0).unwrap().state(), InteractorState::Disabled);
        assert_eq!(g.child(1).unwrap().state(), InteractorState::Disabled);
        assert_eq!(targets.interactor_count(t1), 0);
        assert_eq!(targets.selecting_count(t1), 0);
    }
}
