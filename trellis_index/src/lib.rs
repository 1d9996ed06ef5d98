// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Index: a debounced hit-test index for diagram canvases.
//!
//! Bounding-box trees are fast to query and slow to update one entry at a
//! time, so [`HitIndex`] buffers changes and commits them with a single bulk
//! load. A commit happens when the flush window elapses, polled once per
//! frame through [`HitIndex::poll`], or synchronously when a caller passes
//! `force` to [`HitIndex::add`] or calls [`HitIndex::flush`].
//!
//! - Queries see the last committed geometry. Removals are the exception and
//!   take effect immediately.
//! - Coarse candidates are refined by each owner's [`HitTestable::on_hit_box`]
//!   and sorted by descending [`HitTestable::hit_z_index`]. Owners without a
//!   z-index sort as [`UNTAGGED_Z_INDEX`].
//! - Non-finite boxes are kept as records but never loaded into the tree.
//!
//! Backends implement [`Backend`]: [`RTree`] (Sort-Tile-Recursive packing,
//! the default) and [`FlatVec`] (linear scan, for tiny sets and testing).
//!
//! Also included:
//! - [`UsableRect`]: the union of all boxes with lazy recomputation on shrink.
//! - [`StrokedPolyline`]: stroke-distance refinement for links.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
mod backends;
mod bounds;
mod hit;
mod stroke;
mod types;

pub use backend::Backend;
pub use backends::{FlatVec, NODE_CAPACITY, RTree};
pub use bounds::UsableRect;
pub use hit::{DEFAULT_FLUSH_WINDOW, HitIndex, HitShape, HitTestable, UNTAGGED_Z_INDEX};
pub use stroke::StrokedPolyline;
pub use types::Aabb2D;
