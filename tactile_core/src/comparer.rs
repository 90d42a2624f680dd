// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate comparers: strict-weak-ordering tie-breaks between candidates.
//!
//! ## Contract
//!
//! [`CandidateComparer::compare`] follows the standard three-way contract:
//! `Less` means the *first* argument is preferred. `Equal` means "no
//! preference", in which case callers keep their deterministic base order
//! (stable: the earlier candidate survives).
//!
//! Comparers written against a concrete type can be lifted to heterogeneous
//! candidate sets with [`ScopedComparer`]: a pair the comparer does not
//! understand degrades to `Equal` instead of panicking.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp::Ordering;
use core::marker::PhantomData;

/// A three-way preference between two candidates. `Less` prefers `a`.
pub trait CandidateComparer<C: ?Sized> {
    /// Compare two candidates; `Less` means `a` is preferred.
    fn compare(&self, a: &C, b: &C) -> Ordering;
}

impl<C: ?Sized, F: Fn(&C, &C) -> Ordering> CandidateComparer<C> for F {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        self(a, b)
    }
}

/// Lifts a comparer over a concrete candidate type `D` to `dyn Any`
/// candidates. Pairs that are not both `D` compare `Equal` (no preference),
/// so heterogeneous candidate sets degrade gracefully.
pub struct ScopedComparer<D, F> {
    cmp: F,
    _marker: PhantomData<fn(&D)>,
}

impl<D, F> ScopedComparer<D, F> {
    /// Wrap a comparison function over the concrete type `D`.
    pub const fn new(cmp: F) -> Self {
        Self {
            cmp,
            _marker: PhantomData,
        }
    }
}

impl<D, F> core::fmt::Debug for ScopedComparer<D, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedComparer").finish_non_exhaustive()
    }
}

impl<D: 'static, F: Fn(&D, &D) -> Ordering> CandidateComparer<dyn Any> for ScopedComparer<D, F> {
    fn compare(&self, a: &dyn Any, b: &dyn Any) -> Ordering {
        match (a.downcast_ref::<D>(), b.downcast_ref::<D>()) {
            (Some(a), Some(b)) => (self.cmp)(a, b),
            _ => Ordering::Equal,
        }
    }
}

/// Chains comparers: the first link reporting a preference wins.
pub struct ComparerChain<C: ?Sized> {
    links: Vec<Box<dyn CandidateComparer<C>>>,
}

impl<C: ?Sized> Default for ComparerChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> core::fmt::Debug for ComparerChain<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComparerChain")
            .field("links", &self.links.len())
            .finish_non_exhaustive()
    }
}

impl<C: ?Sized> ComparerChain<C> {
    /// Create an empty chain (always `Equal`).
    pub const fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Append a link; earlier links take precedence.
    pub fn push(&mut self, link: Box<dyn CandidateComparer<C>>) {
        self.links.push(link);
    }
}

impl<C: ?Sized> CandidateComparer<C> for ComparerChain<C> {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        for link in &self.links {
            let ord = link.compare(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
