// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticker with priority buckets.
//!
//! The host drives [`Ticker::tick`] once per animation frame. Buckets run from
//! [`Priority::Highest`] to [`Priority::Lowest`]; within a bucket callbacks
//! run in registration order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

/// Scheduling priority. Lower discriminants run earlier in a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Runs first.
    Highest,
    /// Runs after [`Priority::Highest`].
    High,
    /// Default priority.
    Medium,
    /// Runs after [`Priority::Medium`].
    Low,
    /// Runs last.
    Lowest,
}

impl Priority {
    /// All priorities in execution order.
    pub const ALL: [Self; 5] = [
        Self::Highest,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Lowest,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Handle for a registration; pass it to [`Ticker::cancel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

/// Returned by a ticker callback to keep or drop its registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TickControl {
    /// Run again next frame.
    #[default]
    Keep,
    /// Unregister after this call.
    Remove,
}

/// Timing information for the frame being ticked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic frame counter, starting at `1` for the first tick.
    pub index: u64,
    /// Host-provided timestamp for this frame.
    pub now: Duration,
}

type Callback<C> = Box<dyn FnMut(&mut C, &Frame) -> TickControl>;

struct Entry<C> {
    token: CancelToken,
    callback: Callback<C>,
}

/// Priority-bucketed frame ticker over a shared context `C`.
pub struct Ticker<C> {
    buckets: [Vec<Entry<C>>; 5],
    next_token: u64,
    frame: u64,
}

impl<C> fmt::Debug for Ticker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lens: [usize; 5] = core::array::from_fn(|i| self.buckets[i].len());
        f.debug_struct("Ticker")
            .field("buckets", &lens)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl<C> Default for Ticker<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Ticker<C> {
    /// Creates an empty ticker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: core::array::from_fn(|_| Vec::new()),
            next_token: 0,
            frame: 0,
        }
    }

    /// Registers `callback` in the bucket for `priority`.
    pub fn register(
        &mut self,
        priority: Priority,
        callback: impl FnMut(&mut C, &Frame) -> TickControl + 'static,
    ) -> CancelToken {
        let token = CancelToken(self.next_token);
        self.next_token += 1;
        self.buckets[priority.index()].push(Entry {
            token,
            callback: Box::new(callback),
        });
        token
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        for bucket in &mut self.buckets {
            if let Some(pos) = bucket.iter().position(|e| e.token == token) {
                bucket.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of live registrations across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of frames ticked so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Runs one frame: every bucket in priority order, registration order within a bucket.
    pub fn tick(&mut self, ctx: &mut C, now: Duration) -> Frame {
        self.frame += 1;
        let frame = Frame {
            index: self.frame,
            now,
        };
        for bucket in &mut self.buckets {
            bucket.retain_mut(|entry| (entry.callback)(ctx, &frame) == TickControl::Keep);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn buckets_run_in_priority_then_registration_order() {
        let mut ticker = Ticker::<Vec<&'static str>>::new();
        ticker.register(Priority::Low, |log, _| {
            log.push("low");
            TickControl::Keep
        });
        ticker.register(Priority::Highest, |log, _| {
            log.push("highest-a");
            TickControl::Keep
        });
        ticker.register(Priority::Medium, |log, _| {
            log.push("medium");
            TickControl::Keep
        });
        ticker.register(Priority::Highest, |log, _| {
            log.push("highest-b");
            TickControl::Keep
        });

        let mut log = Vec::new();
        ticker.tick(&mut log, Duration::ZERO);
        assert_eq!(log, vec!["highest-a", "highest-b", "medium", "low"]);
    }

    #[test]
    fn cancel_and_self_removal() {
        let mut ticker = Ticker::<u32>::new();
        let a = ticker.register(Priority::Medium, |n, _| {
            *n += 1;
            TickControl::Keep
        });
        ticker.register(Priority::Medium, |n, _| {
            *n += 100;
            TickControl::Remove
        });

        let mut n = 0;
        ticker.tick(&mut n, Duration::ZERO);
        assert_eq!(n, 101);
        assert_eq!(ticker.len(), 1);

        assert!(ticker.cancel(a));
        assert!(!ticker.cancel(a));
        ticker.tick(&mut n, Duration::ZERO);
        assert_eq!(n, 101);
        assert!(ticker.is_empty());
    }

    #[test]
    fn frames_are_numbered() {
        let mut ticker = Ticker::<()>::new();
        let f1 = ticker.tick(&mut (), Duration::from_millis(16));
        let f2 = ticker.tick(&mut (), Duration::from_millis(32));
        assert_eq!(f1.index, 1);
        assert_eq!(f2.index, 2);
        assert_eq!(f2.now, Duration::from_millis(32));
        assert_eq!(ticker.frame_index(), 2);
    }
}
