// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::BezPath;

use crate::surface::{DrawSurface, PathStyle};

/// Placement of an item: which group it joins.
///
/// Items with equal parameters are drawn together in one group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BatchParams {
    /// Groups with higher z-index are drawn first.
    pub z_index: i32,
    /// Opaque signature of the item's style. Items sharing a key must
    /// report equal [`BatchItem::style`]s.
    pub style_key: u64,
}

impl BatchParams {
    /// Creates parameters for a group.
    #[must_use]
    pub const fn new(z_index: i32, style_key: u64) -> Self {
        Self { z_index, style_key }
    }
}

/// Capability of things drawn through a [`BatchRenderer`](crate::BatchRenderer).
pub trait BatchItem {
    /// Appends this item's geometry to the chunk's combined path.
    fn append_path(&self, path: &mut BezPath);

    /// Style of this item.
    fn style(&self) -> PathStyle;

    /// Invisible items are left out of the combined path.
    ///
    /// A change in visibility takes effect once the item is marked dirty.
    fn is_visible(&self) -> bool {
        true
    }

    /// Draws anything that cannot be part of the combined path, such as a
    /// label. Runs after the item's group was drawn.
    fn post_draw(&self, surface: &mut dyn DrawSurface) {
        let _ = surface;
    }
}
