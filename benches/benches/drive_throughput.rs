// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use tactile_core::identifier::IdentifierPool;
use tactile_interaction::interactor::Interactor;
use tactile_interaction::machine::{Behavior, Machine};
use tactile_interaction::target::{TargetId, Targets};
use tactile_group::BestHoverGroup;

/// Stable ranking: the same target wins every recompute, so drives stay
/// on the cheap no-transition path.
struct Fixed {
    all: Vec<TargetId>,
}

impl Behavior<u32> for Fixed {
    fn candidates(&mut self, _targets: &Targets<u32>) -> Vec<TargetId> {
        self.all.clone()
    }
}

/// Rotating ranking: the best-ranked target changes on every recompute,
/// forcing an unhover plus re-hover on most drives.
struct Sweep {
    all: Vec<TargetId>,
    cursor: usize,
}

impl Behavior<u32> for Sweep {
    fn candidates(&mut self, _targets: &Targets<u32>) -> Vec<TargetId> {
        self.cursor = (self.cursor + 1) % self.all.len();
        let mut out = Vec::with_capacity(self.all.len());
        out.extend_from_slice(&self.all[self.cursor..]);
        out.extend_from_slice(&self.all[..self.cursor]);
        out
    }
}

fn machine_drive(c: &mut Criterion) {
    const N: usize = 256;
    let mut group = c.benchmark_group("machine_drive");
    group.throughput(Throughput::Elements(N as u64));

    let mut pool = IdentifierPool::new();
    let mut targets: Targets<u32> = Targets::new();
    let all: Vec<_> = (0..N).map(|i| targets.insert(i as u32)).collect();

    let mut steady = Machine::new(pool.issue(), Fixed { all: all.clone() });
    group.bench_function("steady", |b| {
        b.iter(|| steady.drive(black_box(&mut targets)));
    });

    let mut churn = Machine::new(pool.issue(), Sweep { all, cursor: 0 });
    group.bench_function("churn", |b| {
        b.iter(|| churn.drive(black_box(&mut targets)));
    });

    group.finish();
}

fn machine_drive_with_tiebreaker(c: &mut Criterion) {
    const N: usize = 256;
    let mut group = c.benchmark_group("machine_drive_tiebreaker");
    group.throughput(Throughput::Elements(N as u64));

    let mut pool = IdentifierPool::new();
    let mut targets: Targets<u32> = Targets::new();
    let all: Vec<_> = (0..N).map(|i| targets.insert(i as u32)).collect();

    let mut m = Machine::new(pool.issue(), Fixed { all });
    m.set_tiebreaker(Some(Box::new(|a: &u32, b: &u32| b.cmp(a))));
    group.bench_function("full_scan", |b| {
        b.iter(|| m.drive(black_box(&mut targets)));
    });

    group.finish();
}

fn group_drive(c: &mut Criterion) {
    const MEMBERS: usize = 8;
    const PER_MEMBER: usize = 32;
    let mut group = c.benchmark_group("best_hover_group_drive");
    group.throughput(Throughput::Elements((MEMBERS * PER_MEMBER) as u64));

    let mut pool = IdentifierPool::new();
    let mut targets: Targets<u32> = Targets::new();

    let mut steady_members: Vec<Box<dyn Interactor<u32>>> = Vec::new();
    for m in 0..MEMBERS {
        let all: Vec<_> = (0..PER_MEMBER)
            .map(|i| targets.insert((m * PER_MEMBER + i) as u32))
            .collect();
        steady_members.push(Box::new(Machine::new(pool.issue(), Fixed { all })));
    }
    let mut steady = BestHoverGroup::new(pool.issue(), steady_members);
    group.bench_function("steady", |b| {
        b.iter(|| steady.drive(black_box(&mut targets)));
    });

    // The winning member keeps changing its mind, so every drive pays for
    // an unhover, a bench revival, and a fresh arbitration pass.
    let mut churn_members: Vec<Box<dyn Interactor<u32>>> = Vec::new();
    for m in 0..MEMBERS {
        let all: Vec<_> = (0..PER_MEMBER)
            .map(|i| targets.insert((m * PER_MEMBER + i) as u32))
            .collect();
        churn_members.push(Box::new(Machine::new(pool.issue(), Sweep { all, cursor: 0 })));
    }
    let mut churn = BestHoverGroup::new(pool.issue(), churn_members);
    group.bench_function("churn", |b| {
        b.iter(|| churn.drive(black_box(&mut targets)));
    });

    group.finish();
}

criterion_group!(
    benches,
    machine_drive,
    machine_drive_with_tiebreaker,
    group_drive
);
criterion_main!(benches);
