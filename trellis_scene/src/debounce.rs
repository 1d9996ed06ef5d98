// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing deferral over host-supplied timestamps.

use core::time::Duration;

/// Coalesces bursts of requests into a single execution.
///
/// The first [`request`](Debounce::request) opens a window ending `window`
/// later; further requests before the deadline join that window instead of
/// extending it, so work is never deferred by more than one window.
///
/// `Debounce` owns no timer. Callers poll it from their frame loop:
///
/// ```
/// use core::time::Duration;
/// use trellis_scene::Debounce;
///
/// let mut rebuild = Debounce::new(Duration::from_millis(50));
/// rebuild.request(Duration::from_millis(0));
/// rebuild.request(Duration::from_millis(20));
/// assert!(!rebuild.poll(Duration::from_millis(40)));
/// assert!(rebuild.poll(Duration::from_millis(50)));
/// assert!(!rebuild.poll(Duration::from_millis(60)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    /// Creates an idle debouncer with the given window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Returns the configured window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Changes the window; an open window keeps its deadline.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Requests execution. Returns `true` if this opened a new window.
    pub fn request(&mut self, now: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.window);
        true
    }

    /// Returns `true` exactly once when the open window has elapsed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Closes the open window early. Returns `true` if a request was pending,
    /// in which case the caller should run the work now.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Drops any pending request without running it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a window is open.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Deadline of the open window, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn requests_within_window_coalesce() {
        let mut d = Debounce::new(ms(50));
        assert!(d.request(ms(10)));
        assert!(!d.request(ms(30)));
        assert!(!d.request(ms(59)));
        assert_eq!(d.deadline(), Some(ms(60)));
        assert!(!d.poll(ms(59)));
        assert!(d.poll(ms(60)));
        assert!(!d.is_pending());
    }

    #[test]
    fn flush_runs_early_and_cancel_drops() {
        let mut d = Debounce::new(ms(50));
        assert!(!d.flush());
        d.request(ms(0));
        assert!(d.flush());
        assert!(!d.poll(ms(100)));

        d.request(ms(100));
        d.cancel();
        assert!(!d.poll(ms(200)));
        assert!(!d.flush());
    }

    #[test]
    fn new_window_after_firing() {
        let mut d = Debounce::new(ms(50));
        d.request(ms(0));
        assert!(d.poll(ms(50)));
        assert!(d.request(ms(70)));
        assert!(!d.poll(ms(100)));
        assert!(d.poll(ms(120)));
    }
}
