// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit subscribe/unsubscribe callback registries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Handle returned by [`Listeners::subscribe`]; pass it to [`Listeners::unsubscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// An owned registry of callbacks for events of type `E`.
///
/// The owner is responsible for calling [`Listeners::clear`] on teardown; the
/// scene tree does so for every node it unmounts.
///
/// ```
/// use trellis_scene::Listeners;
///
/// let seen = std::rc::Rc::new(std::cell::Cell::new(0));
/// let mut listeners = Listeners::<u32>::new();
/// let sink = seen.clone();
/// let sub = listeners.subscribe(move |v| sink.set(sink.get() + *v));
/// listeners.emit(&5);
/// listeners.unsubscribe(sub);
/// listeners.emit(&5);
/// assert_eq!(seen.get(), 5);
/// ```
pub struct Listeners<E> {
    entries: Vec<(Subscription, Box<dyn FnMut(&E)>)>,
    next: u64,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<E> Listeners<E> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next: 0,
        }
    }

    /// Registers `f`; callbacks run in subscription order.
    pub fn subscribe(&mut self, f: impl FnMut(&E) + 'static) -> Subscription {
        let sub = Subscription(self.next);
        self.next += 1;
        self.entries.push((sub, Box::new(f)));
        sub
    }

    /// Removes a callback. Unknown subscriptions are ignored.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(s, _)| *s != sub);
        before != self.entries.len()
    }

    /// Invokes every registered callback with `event`.
    pub fn emit(&mut self, event: &E) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    /// Drops every callback.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
