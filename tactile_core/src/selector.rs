// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector signal queue.
//!
//! ## Overview
//!
//! A selector is an external boolean-intent source (a trigger, a pinch, a
//! key) that emits paired select/unselect signals, strictly alternating.
//! Signals are not applied to the state machine synchronously; they are
//! queued here and consumed by the per-tick protocol, which prevents a
//! mid-tick signal from racing a transition already in flight.
//!
//! ## Contract
//!
//! - Sources alternate: every `Select` is paired with one later `Unselect`.
//!   The queue enforces this defensively; a signal equal to the most
//!   recently queued one is dropped rather than enqueued twice.
//! - Only the head is observable ([`SelectorQueue::peek`]).
//! - The owning machine consumes at most one matching head per completed
//!   transition and clears the queue at postprocess, so a signal never
//!   leaks into the next tick.

use alloc::collections::VecDeque;

/// One boolean intent signal from a selector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SelectorSignal {
    /// The selector engaged ("when selected").
    Select,
    /// The selector released ("when unselected").
    Unselect,
}

/// FIFO of pending selector signals with defensive 1:1 alternation.
#[derive(Clone, Debug, Default)]
pub struct SelectorQueue {
    pending: VecDeque<SelectorSignal>,
    // Most recently *queued* signal, surviving pops and clears, so
    // alternation is judged against the emission stream, not the queue.
    last_queued: Option<SelectorSignal>,
}

impl SelectorQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            last_queued: None,
        }
    }

    /// Queue a signal. Returns `false` when the signal repeats the most
    /// recently queued one and was dropped to preserve alternation.
    pub fn push(&mut self, signal: SelectorSignal) -> bool {
        if self.last_queued == Some(signal) {
            return false;
        }
        self.last_queued = Some(signal);
        self.pending.push_back(signal);
        true
    }

    /// The head signal, if any. Only the head is ever acted on.
    pub fn peek(&self) -> Option<SelectorSignal> {
        self.pending.front().copied()
    }

    /// Pop the head iff it equals `expected`. Returns whether a signal was
    /// consumed. Called once per completed select/unselect transition.
    pub fn consume(&mut self, expected: SelectorSignal) -> bool {
        if self.pending.front() == Some(&expected) {
            self.pending.pop_front();
            return true;
        }
        false
    }

    /// Drop all pending signals (end-of-tick postprocess). Alternation
    /// tracking is kept so a source may not replay a dropped signal's twin.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of queued signals.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
