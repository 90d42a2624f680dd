// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A pointer sweeping over circular targets.
//!
//! A single machine ranks targets by signed distance from the pointer,
//! hovers the nearest one in reach, and selects on an external signal.
//!
//! Run:
//! - `cargo run -p tactile_demos --example pointer_hover`

use kurbo::{Circle, Point};
use tactile_core::identifier::IdentifierPool;
use tactile_core::state::InteractorState;
use tactile_interaction::interactor::Interactor;
use tactile_interaction::machine::{Behavior, Machine};
use tactile_interaction::target::{TargetId, Targets};

/// Ranks every target within `reach` by signed distance to the pointer.
struct PointerProbe {
    pos: Point,
    reach: f64,
}

impl Behavior<Circle> for PointerProbe {
    fn candidates(&mut self, targets: &Targets<Circle>) -> Vec<TargetId> {
        let mut ranked: Vec<(f64, TargetId)> = targets
            .iter()
            .filter_map(|(id, circle)| {
                let d = (self.pos - circle.center).hypot() - circle.radius;
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
    let left = targets.insert(Circle::new((0.0, 0.0), 0.5));
    let right = targets.insert(Circle::new((4.0, 0.0), 0.5));

    let mut machine = Machine::new(
        pool.issue(),
        PointerProbe {
            pos: Point::new(-10.0, 0.0),
            reach: 1.0,
        },
    );
    machine.subscribe_state_changed(|change| {
        println!("  machine: {:?} -> {:?}", change.previous, change.current);
    });

    // Sweep left to right, squeezing between the two circles.
    let frames: [(f64, &str); 6] = [
        (-10.0, "far away"),
        (0.2, "over the left circle"),
        (0.2, "select signalled"),
        (0.2, "select released"),
        (4.1, "over the right circle"),
        (10.0, "past everything"),
    ];

    for (i, (x, label)) in frames.iter().enumerate() {
        machine.behavior_mut().pos = Point::new(*x, 0.0);
        if i == 2 {
            machine.notify_selected();
        }
        if i == 3 {
            machine.notify_unselected();
        }
        println!("frame {i}: pointer at x={x} ({label})");
        machine.drive(&mut targets);
    }

    assert_eq!(machine.state(), InteractorState::Normal);
    assert_eq!(targets.interactor_count(left), 0);
    assert_eq!(targets.interactor_count(right), 0);
    println!("done: both circles released");
}
