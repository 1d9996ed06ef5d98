// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incrementally maintained union of boxes.

use crate::types::Aabb2D;

/// Union of a changing set of boxes, the "usable" extent of a diagram.
///
/// Growing is O(1). Shrinking or removing a box that touches the current
/// boundary marks the aggregate stale; the O(n) recomputation happens on the
/// next [`UsableRect::get`]. Non-finite boxes are ignored throughout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UsableRect {
    bounds: Option<Aabb2D>,
    stale: bool,
}

impl UsableRect {
    /// Grows the aggregate to include `aabb`.
    pub fn include(&mut self, aabb: Aabb2D) {
        if !aabb.is_finite() || self.stale {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(&aabb),
            None => aabb,
        });
    }

    /// Accounts for `aabb` leaving the set.
    pub fn exclude(&mut self, aabb: Aabb2D) {
        if !aabb.is_finite() {
            return;
        }
        if self.bounds.is_some_and(|b| b.touched_by(&aabb)) {
            self.stale = true;
        }
    }

    /// Accounts for a box changing from `old` to `new`.
    pub fn replace(&mut self, old: Aabb2D, new: Aabb2D) {
        self.exclude(old);
        self.include(new);
    }

    /// Returns `true` if the next read will recompute.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Cached aggregate, `None` when empty or stale.
    #[must_use]
    pub fn peek(&self) -> Option<Aabb2D> {
        if self.stale { None } else { self.bounds }
    }

    /// Current aggregate, recomputed from `all` if stale.
    ///
    /// `all` must yield every box currently in the set.
    pub fn get(&mut self, all: impl IntoIterator<Item = Aabb2D>) -> Option<Aabb2D> {
        if self.stale {
            self.bounds = all
                .into_iter()
                .filter(Aabb2D::is_finite)
                .reduce(|acc, b| acc.union(&b));
            self.stale = false;
        }
        self.bounds
    }
}
