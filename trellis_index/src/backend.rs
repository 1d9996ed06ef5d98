// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial structures behind [`HitIndex`](crate::HitIndex).

use alloc::vec::Vec;

use crate::types::Aabb2D;

/// Spatial backend used by [`HitIndex`](crate::HitIndex).
///
/// Backends are rebuilt wholesale: the index buffers changes and hands the
/// backend every committed `(slot, box)` pair in one [`Backend::load`] call.
/// Slots are dense indices assigned by the index; backends only report them
/// back through the visit callbacks.
pub trait Backend: Default {
    /// Replaces the whole contents with `entries`.
    ///
    /// Entries are finite; the index filters non-finite boxes before loading.
    fn load(&mut self, entries: &[(usize, Aabb2D)]);

    /// Drops every entry.
    fn clear(&mut self);

    /// Number of loaded entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is loaded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit slots whose box contains the point.
    fn visit_point<F: FnMut(usize)>(&self, x: f64, y: f64, f: F);

    /// Visit slots whose box intersects `rect`.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, f: F);

    /// Collects [`Backend::visit_point`] into a vector.
    fn query_point(&self, x: f64, y: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_point(x, y, |i| out.push(i));
        out
    }

    /// Collects [`Backend::visit_rect`] into a vector.
    fn query_rect(&self, rect: Aabb2D) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_rect(rect, |i| out.push(i));
        out
    }
}
