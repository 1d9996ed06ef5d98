// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Batch: draw many small styled paths with few draw calls.
//!
//! A diagram at low zoom shows hundreds of simple shapes that share a
//! handful of styles. Issuing one fill per shape makes the draw cost
//! proportional to the item count; this crate combines them instead.
//!
//! # Model
//!
//! - Every item is added with [`BatchParams`]: a z-index and a style key.
//! - Items with equal parameters form a [`PathGroup`]. A group holds
//!   [`PathChunk`]s capped at a fixed member count
//!   ([`DEFAULT_CHUNK_SIZE`] unless configured), so a combined path never
//!   grows without bound and invalidation stays local.
//! - A chunk caches its combined path and style. It is rebuilt lazily on the
//!   next draw after a membership change or [`BatchRenderer::mark_dirty`].
//!   Invisible members are skipped when combining.
//! - [`BatchRenderer::render`] walks groups in descending z-index. Each group
//!   sets its style once, fills or strokes its chunk paths, then runs the
//!   [`BatchItem::post_draw`] hooks of its visible members.
//!
//! Drawing goes through the [`DrawSurface`] trait, so the renderer is
//! independent of the 2D backend. [`RecordingSurface`] captures calls for
//! tests and debugging.
//!
//! # Example
//!
//! ```
//! use kurbo::{BezPath, Rect, Shape};
//! use peniko::color::palette;
//! use trellis_batch::{BatchItem, BatchParams, BatchRenderer, PathStyle, RecordingSurface};
//!
//! struct Dot(Rect);
//!
//! impl BatchItem for Dot {
//!     fn append_path(&self, path: &mut BezPath) {
//!         path.extend(self.0.path_elements(0.1));
//!     }
//!
//!     fn style(&self) -> PathStyle {
//!         PathStyle::fill(palette::css::STEEL_BLUE)
//!     }
//! }
//!
//! let mut batch = BatchRenderer::with_chunk_size(100);
//! for i in 0..250_u32 {
//!     let x = f64::from(i) * 4.0;
//!     batch.add(i, Dot(Rect::new(x, 0.0, x + 2.0, 2.0)), BatchParams::new(0, 7));
//! }
//!
//! let mut surface = RecordingSurface::new();
//! let stats = batch.render(&mut surface);
//! // 250 dots, one style change, three fills.
//! assert_eq!(stats.chunks, 3);
//! assert_eq!(surface.style_changes(), 1);
//! assert_eq!(surface.draw_calls(), 3);
//! ```

#![no_std]

extern crate alloc;

mod chunk;
mod item;
mod renderer;
mod surface;

pub use chunk::{DEFAULT_CHUNK_SIZE, PathChunk, PathGroup};
pub use item::{BatchItem, BatchParams};
pub use renderer::{BatchRenderer, BatchStats};
pub use surface::{DrawSurface, PathStyle, RecordingSurface, SurfaceOp};
