// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol states shared by interactors and targets.
//!
//! Both sides of the protocol derive or hold a four-state value:
//! `Disabled → Normal → Hover → Select`, with reverse transitions back down
//! and `Disabled` reachable from every state via a cascade. The enums are
//! separate types because they mean different things: an interactor *is* in
//! a state, while a target's state is *derived* from its association sets.

/// State of an intent source (interactor).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InteractorState {
    /// Not participating; forced by the enable gate or an owner.
    Disabled,
    /// Participating but not associated with any target.
    Normal,
    /// Associated with a target (or committed to a candidate-less hover)
    /// without acting on it yet.
    Hover,
    /// Actively acting on the committed target.
    Select,
}

impl InteractorState {
    /// True for `Hover` and `Select`: the states in which the interactor
    /// holds an opportunity that mutual-exclusion coordinators care about.
    pub const fn is_engaged(self) -> bool {
        matches!(self, Self::Hover | Self::Select)
    }
}

/// Derived state of a target (interactable).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetState {
    /// Explicitly disabled; association sets are empty.
    Disabled,
    /// Enabled with no associated interactors.
    Normal,
    /// At least one associated interactor, none selecting.
    Hover,
    /// At least one selecting interactor.
    Select,
}

/// Payload of a state-changed event.
///
/// Emitted strictly after the backing state has changed, so an observer
/// reading the owner during dispatch never sees a stale state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StateChange<S> {
    /// State before the transition.
    pub previous: S,
    /// State after the transition (the owner's current state).
    pub current: S,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engaged_covers_hover_and_select() {
        assert!(InteractorState::Hover.is_engaged());
        assert!(InteractorState::Select.is_engaged());
        assert!(!InteractorState::Normal.is_engaged());
        assert!(!InteractorState::Disabled.is_engaged());
    }
}
