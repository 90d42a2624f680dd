// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit observer lists.
//!
//! ## Overview
//!
//! [`Emitter`] is the event surface of this workspace: subscribers register
//! a handler and receive every later emission, in subscription order, on the
//! emitting thread. There is no multicast-delegate magic and no channel:
//! dispatch is a plain loop, deterministic and allocation-free per emit.
//!
//! ## Ordering contract
//!
//! Owners emit *after* the backing state has changed. A handler that reads
//! the owner during dispatch therefore observes the post-transition state.
//! All emitters in this workspace follow that rule.
//!
//! ```
//! use tactile_core::event::Emitter;
//!
//! let mut hits: Emitter<u32> = Emitter::new();
//! let sub = hits.subscribe(|n| assert_eq!(*n, 7));
//! hits.emit(&7);
//! assert!(hits.unsubscribe(sub));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Handle returned by [`Emitter::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HandlerId(u64);

/// A deterministic, single-threaded observer list.
pub struct Emitter<E> {
    next: u64,
    handlers: Vec<(HandlerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl<E> Emitter<E> {
    /// Create an emitter with no subscribers.
    pub const fn new() -> Self {
        Self {
            next: 0,
            handlers: Vec::new(),
        }
    }

    /// Register a handler; it receives every later [`Emitter::emit`].
    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> HandlerId {
        self.next += 1;
        let id = HandlerId(self.next);
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    /// Dispatch `event` to every handler, in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    // Handlers fire in subscription order.
    #[test]
    fn dispatch_order_is_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut e: Emitter<u32> = Emitter::new();
        for tag in 0..3 {
            let seen = Rc::clone(&seen);
            e.subscribe(move |n| seen.borrow_mut().push((tag, *n)));
        }
        e.emit(&5);
        assert_eq!(*seen.borrow(), vec![(0, 5), (1, 5), (2, 5)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut e: Emitter<()> = Emitter::new();
        let sub = {
            let count = Rc::clone(&count);
            e.subscribe(move |()| *count.borrow_mut() += 1)
        };
        e.emit(&());
        assert!(e.unsubscribe(sub));
        assert!(!e.unsubscribe(sub));
        e.emit(&());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let mut e: Emitter<u32> = Emitter::new();
        e.emit(&1);
        assert!(e.is_empty());
    }
}
