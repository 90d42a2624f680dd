// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Near/far mutual exclusion with an [`ExclusionGate`].
//!
//! A near-field "touch" interactor and a far-field "ray" interactor share
//! one scene. Whichever engages first suppresses the other until it lets
//! go, so the user never touches and ray-points at the same time.
//!
//! Run:
//! - `cargo run -p tactile_demos --example gate_modes`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Circle, Point};
use tactile_core::identifier::IdentifierPool;
use tactile_core::state::InteractorState;
use tactile_group::{ExclusionGate, GateSide};
use tactile_interaction::interactor::Interactor;
use tactile_interaction::machine::{Behavior, Machine};
use tactile_interaction::target::{TargetId, Targets};

/// Distance ranking from a shared, externally updated position, with an
/// on/off switch standing in for "is this modality active".
struct Tracked {
    pos: Rc<Cell<Point>>,
    active: Rc<Cell<bool>>,
    reach: f64,
}

impl Behavior<Circle> for Tracked {
    fn candidates(&mut self, targets: &Targets<Circle>) -> Vec<TargetId> {
        if !self.active.get() {
            return Vec::new();
        }
        let pos = self.pos.get();
        let mut ranked: Vec<(f64, TargetId)> = targets
            .iter()
            .filter_map(|(id, circle)| {
                let d = (pos - circle.center).hypot() - circle.radius;
                (d <= self.reach).then_some((d, id))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, id)| id).collect()
    }
}

fn main() {
    let mut pool = IdentifierPool::new();
    let mut targets: Targets<Circle> = Targets::new();
    let button = targets.insert(Circle::new((0.0, 0.0), 0.2));
    let panel = targets.insert(Circle::new((5.0, 0.0), 1.0));

    let hand = Rc::new(Cell::new(Point::new(9.0, 0.0)));
    let pointing = Rc::new(Cell::new(true));

    let mut touch: Vec<Box<dyn Interactor<Circle>>> = vec![Box::new(Machine::new(
        pool.issue(),
        Tracked {
            pos: Rc::clone(&hand),
            active: Rc::new(Cell::new(true)),
            reach: 0.3,
        },
    ))];
    let mut ray: Vec<Box<dyn Interactor<Circle>>> = vec![Box::new(Machine::new(
        pool.issue(),
        Tracked {
            pos: Rc::clone(&hand),
            active: Rc::clone(&pointing),
            reach: 10.0,
        },
    ))];

    let mut gate = ExclusionGate::new();
    let mut tick = |targets: &mut Targets<Circle>,
                    touch: &mut Vec<Box<dyn Interactor<Circle>>>,
                    ray: &mut Vec<Box<dyn Interactor<Circle>>>,
                    gate: &mut ExclusionGate,
                    label: &str| {
        for m in touch.iter_mut() {
            m.drive(targets);
        }
        for m in ray.iter_mut() {
            m.drive(targets);
        }
        gate.update(targets, touch, ray);
        println!(
            "{label}: touch={:?} ray={:?} suppressed={:?}",
            touch[0].state(),
            ray[0].state(),
            gate.suppressed()
        );
    };

    // Hand far away, pointing: the ray engages the panel and the touch
    // side is locked out.
    tick(&mut targets, &mut touch, &mut ray, &mut gate, "pointing");
    assert_eq!(ray[0].state(), InteractorState::Hover);
    assert_eq!(gate.suppressed(), Some(GateSide::A));

    // Pointing stops: the ray disengages and the lock lifts.
    pointing.set(false);
    hand.set(Point::new(0.1, 0.0));
    tick(&mut targets, &mut touch, &mut ray, &mut gate, "reaching in");
    assert_eq!(gate.suppressed(), None);

    // The hand is on the button now: touch engages and locks the ray out.
    tick(&mut targets, &mut touch, &mut ray, &mut gate, "touching");
    assert_eq!(touch[0].state(), InteractorState::Hover);
    assert_eq!(gate.suppressed(), Some(GateSide::B));
    assert_eq!(targets.interactor_count(button), 1);
    assert_eq!(targets.interactor_count(panel), 0);

    println!("done: modalities never overlapped");
}
