// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tactile_core --heading-base-level=0

//! Tactile Core: shared plumbing for the Tactile interaction protocol.
//!
//! ## Overview
//!
//! This crate holds the small, dependency-light pieces the protocol crates
//! build on:
//!
//! - [`identifier`]: process-unique [`Identifier`]s from a monotonic
//!   [`IdentifierPool`], plus an [`InstanceRegistry`] to resolve raw ids
//!   back to owning instances.
//! - [`state`]: the four-state protocol enums ([`InteractorState`],
//!   [`TargetState`]) and the [`StateChange`] event payload.
//! - [`event`]: [`Emitter`], a deterministic observer list that fires
//!   strictly after the backing state has changed.
//! - [`selector`]: [`SelectorQueue`], the FIFO decoupling external boolean
//!   intent ("select"/"unselect") from the per-tick state machine.
//! - [`filter`]: capability [`Filter`]s (`true` ⇒ include, AND-composed)
//!   over [`Peer`] profiles with application-defined [`TagMask`] bits.
//! - [`comparer`]: [`CandidateComparer`] tie-breaks, including
//!   [`ScopedComparer`] which treats foreign candidate types as "no
//!   preference".
//!
//! Nothing here drives a state machine; see `tactile_interaction` for the
//! protocol itself and `tactile_group` for arbitration between sources.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod comparer;
pub mod event;
pub mod filter;
pub mod identifier;
pub mod selector;
pub mod state;

pub use comparer::{CandidateComparer, ComparerChain, ScopedComparer};
pub use event::{Emitter, HandlerId};
pub use filter::{Filter, Peer, TagFilter, TagMask, include_all};
pub use identifier::{Identifier, IdentifierPool, InstanceRegistry};
pub use selector::{SelectorQueue, SelectorSignal};
pub use state::{InteractorState, StateChange, TargetState};
