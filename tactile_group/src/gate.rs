// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutual exclusion between two sets of interactors.

use alloc::boxed::Box;

use tactile_interaction::interactor::Interactor;
use tactile_interaction::target::Targets;

/// The two sides of an [`ExclusionGate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GateSide {
    /// The first side; wins simultaneous engagement.
    A,
    /// The second side.
    B,
}

/// Keeps two sets of interactors from being engaged at the same time.
///
/// Call [`update`](ExclusionGate::update) once per tick, after both sides
/// have been driven. The moment any member of one side engages (hovers or
/// selects), the whole opposite side is suppressed: hosts marked
/// inactive, members disabled. The suppression holds until the engaged
/// side has fully disengaged, at which point the suppressed side's hosts
/// are reactivated and its members re-enable at their next drive. If both
/// sides engage in the same tick, side A wins.
///
/// The typical pairing is near-field direct interactors against far-field
/// ray interactors on the same hand.
#[derive(Debug, Default)]
pub struct ExclusionGate {
    suppressed: Option<GateSide>,
}

impl ExclusionGate {
    /// Create a gate with neither side suppressed.
    pub fn new() -> Self {
        Self { suppressed: None }
    }

    /// Which side is currently suppressed, if any.
    pub fn suppressed(&self) -> Option<GateSide> {
        self.suppressed
    }

    /// Re-evaluate both sides and apply or lift suppression.
    pub fn update<P>(
        &mut self,
        targets: &mut Targets<P>,
        side_a: &mut [Box<dyn Interactor<P>>],
        side_b: &mut [Box<dyn Interactor<P>>],
    ) {
        let engaged_a = Self::engaged(side_a);
        let engaged_b = Self::engaged(side_b);
        match self.suppressed {
            None => {
                if engaged_a > 0 {
                    Self::suppress(side_b, targets);
                    self.suppressed = Some(GateSide::B);
                } else if engaged_b > 0 {
                    Self::suppress(side_a, targets);
                    self.suppressed = Some(GateSide::A);
                }
            }
            Some(GateSide::B) => {
                if engaged_a == 0 {
                    Self::release(side_b);
                    self.suppressed = None;
                }
            }
            Some(GateSide::A) => {
                if engaged_b == 0 {
                    Self::release(side_a);
                    self.suppressed = None;
                }
            }
        }
    }

    fn engaged<P>(side: &[Box<dyn Interactor<P>>]) -> usize {
        side.iter().filter(|m| m.state().is_engaged()).count()
    }

    fn suppress<P>(side: &mut [Box<dyn Interactor<P>>], targets: &mut Targets<P>) {
        for member in side {
            member.set_host_active(false);
            member.disable(targets);
        }
    }

    fn release<P>(side: &mut [Box<dyn Interactor<P>>]) {
        for member in side {
            member.set_host_active(true);
        }
    }
}
