// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tactile_interaction --heading-base-level=0

//! Tactile Interaction: the bounded, deterministic interactor protocol.
//!
//! ## Overview
//!
//! Interaction sources are [`Interactor`]s: four-state machines
//! (`Disabled` / `Normal` / `Hover` / `Select`) driven once per tick by
//! [`Interactor::drive`]. Each drive runs preprocess, then a bounded loop
//! of candidate recompute / per-state work / at most one transition, then
//! postprocess; nothing in the protocol reacts to input directly, so a
//! tick is fully deterministic given its inputs.
//!
//! Interaction targets live in a [`Targets`] arena and are addressed by
//! generational [`TargetId`] handles. A target never initiates anything:
//! it tracks which interactors are on it, derives its own state from
//! those sets, bounds how many may pair with it, and announces changes
//! through [`TargetEvent`]s.
//!
//! [`Machine`] is the standard interactor: it owns the protocol state and
//! defers candidate supply, select intent and per-state work to a
//! [`Behavior`]. External input reaches a machine only through its
//! selector queue ([`Machine::notify_selected`]) or its override slots,
//! both of which are sampled by the drive, never acted on inline.
//!
//! See `tactile_group` for arbitration when several interactors compete.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod interactor;
pub mod machine;
pub mod target;

pub use interactor::{DEFAULT_MAX_ITERATIONS, Interactor};
pub use machine::{Behavior, CandidateFn, GateFn, IntentFn, Machine, OverrideSlot};
pub use target::{TargetEvent, TargetId, Targets};
