// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test scaffolding shared by the policy test modules.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Cell, RefCell};

use tactile_core::identifier::IdentifierPool;
use tactile_interaction::interactor::Interactor;
use tactile_interaction::machine::{Behavior, Machine};
use tactile_interaction::target::{TargetId, Targets};

/// A remotely steerable behavior: tests adjust its ranking and its select
/// intent after the machine has been boxed into a group.
pub(crate) struct Remote {
    ranked: Rc<RefCell<Vec<TargetId>>>,
    select: Rc<Cell<bool>>,
    drop_once: Rc<Cell<bool>>,
    score: u32,
}

/// The steering side of a [`Remote`].
pub(crate) struct RemoteControls {
    pub(crate) ranked: Rc<RefCell<Vec<TargetId>>>,
    pub(crate) select: Rc<Cell<bool>>,
    /// Makes the next candidate recompute come up empty, once.
    pub(crate) drop_once: Rc<Cell<bool>>,
}

impl Behavior<()> for Remote {
    fn candidates(&mut self, _targets: &Targets<()>) -> Vec<TargetId> {
        if self.drop_once.take() {
            return Vec::new();
        }
        self.ranked.borrow().clone()
    }

    fn candidate_props(&self) -> Option<&dyn Any> {
        Some(&self.score)
    }

    fn select_intent(&self) -> Option<bool> {
        Some(self.select.get())
    }

    fn unselect_intent(&self) -> Option<bool> {
        Some(!self.select.get())
    }
}

/// A boxed machine around a [`Remote`], plus its controls.
pub(crate) fn member(
    pool: &mut IdentifierPool,
    score: u32,
) -> (Box<dyn Interactor<()>>, RemoteControls) {
    let ranked = Rc::new(RefCell::new(Vec::new()));
    let select = Rc::new(Cell::new(false));
    let drop_once = Rc::new(Cell::new(false));
    let remote = Remote {
        ranked: Rc::clone(&ranked),
        select: Rc::clone(&select),
        drop_once: Rc::clone(&drop_once),
        score,
    };
    let controls = RemoteControls {
        ranked,
        select,
        drop_once,
    };
    (Box::new(Machine::new(pool.issue(), remote)), controls)
}
