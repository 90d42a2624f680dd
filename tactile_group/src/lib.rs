// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tactile_group --heading-base-level=0

//! Tactile Group: arbitration between competing interactors.
//!
//! ## Overview
//!
//! When several interaction sources could plausibly act at once (two
//! hands, a hand and a ray, several rays), something has to decide who
//! gets the floor. This crate provides that layer on top of
//! `tactile_interaction`:
//!
//! - [`BestHoverGroup`]: one winner, chosen the moment hover begins;
//!   everyone else is benched until the winner lets go.
//! - [`FirstHoverGroup`]: like Best-Hover, but a winner who releases its
//!   hover sits out re-acquisition for the rest of that drive, so
//!   flickering candidates hand over instead of recapturing.
//! - [`BestSelectGroup`]: members hover freely and concurrently;
//!   arbitration only happens when someone wants to select.
//! - [`ExclusionGate`]: mutual exclusion between two independent sets of
//!   interactors, edge-triggered on engagement.
//!
//! Groups implement `Interactor` themselves, so they nest: a Best-Select
//! group of two hands can be a member of a larger Best-Hover group.
//! Cross-member preferences are expressed as a
//! [`CandidateComparer`](tactile_core::comparer::CandidateComparer) over
//! the candidate properties members publish as `&dyn Any`, typically via
//! [`ScopedComparer`](tactile_core::comparer::ScopedComparer).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod best_hover;
pub mod best_select;
pub mod first_hover;
pub mod gate;
mod group;
#[cfg(test)]
mod testing;

pub use best_hover::BestHoverGroup;
pub use best_select::BestSelectGroup;
pub use first_hover::FirstHoverGroup;
pub use gate::{ExclusionGate, GateSide};
