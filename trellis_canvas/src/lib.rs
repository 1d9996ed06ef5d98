// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Canvas: an interactive node/link diagram surface.
//!
//! This crate wires the Trellis building blocks into one object the host UI
//! drives:
//!
//! - a [`SceneTree`](trellis_scene::SceneTree) holding the diagram's nodes,
//! - a [`HitIndex`](trellis_index::HitIndex) kept in sync with node bounds,
//! - a [`Camera`](trellis_view::Camera) mapping screen and world coordinates,
//! - a [`DragEngine`](trellis_drag::DragEngine) with the modifier chain from
//!   the [`DragConfig`],
//! - a [`Ticker`](trellis_scene::Ticker) that flushes the index and renders
//!   the scene once per frame,
//! - a [`Selection`].
//!
//! Pointer input arrives in screen coordinates. A press on a node selects it
//! and arms a drag; a press on empty space pans. Wheel input zooms around
//! the pointer.
//!
//! Tuning lives in [`CanvasConfig`], which deserializes with `serde` and is
//! validated by [`Canvas::new`].
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Point, Rect, Size};
//! use trellis_canvas::{Canvas, CanvasConfig, CanvasNode};
//! use trellis_drag::{DragEvent, Draggable};
//! use trellis_index::HitTestable;
//! use trellis_scene::Renderable;
//!
//! struct Block {
//!     rect: Option<Rect>,
//! }
//!
//! impl Renderable for Block {}
//! impl HitTestable for Block {}
//!
//! impl Draggable for Block {
//!     fn drag_origin(&self) -> Point {
//!         self.rect.map_or(Point::ORIGIN, |r| r.origin())
//!     }
//!
//!     fn on_drag(&mut self, event: &DragEvent) {
//!         self.rect = self.rect.map(|r| r.with_origin(event.position));
//!     }
//!
//!     fn on_drag_end(&mut self, event: &DragEvent) {
//!         self.on_drag(event);
//!     }
//! }
//!
//! impl CanvasNode for Block {
//!     fn bounds(&self) -> Option<Rect> {
//!         self.rect
//!     }
//!
//!     fn is_draggable(&self) -> bool {
//!         self.rect.is_some()
//!     }
//!
//!     fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
//!         Some(self)
//!     }
//! }
//!
//! let mut config = CanvasConfig::default();
//! config.drag.grid_size = Some(20.0);
//! let mut canvas = Canvas::new(Block { rect: None }, Size::new(800.0, 600.0), config).unwrap();
//! let root = canvas.root();
//! let block = canvas
//!     .mount(root, 1, Block { rect: Some(Rect::new(40.0, 40.0, 100.0, 80.0)) })
//!     .unwrap();
//! // The index commits once the flush window has elapsed.
//! canvas.frame(Duration::ZERO);
//! canvas.frame(Duration::from_millis(60));
//!
//! assert_eq!(canvas.pointer_down(Point::new(50.0, 50.0), false), Some(block));
//! canvas.pointer_move(Point::new(117.0, 203.0));
//! canvas.pointer_up(Point::new(117.0, 203.0));
//!
//! let moved = canvas.node(block).unwrap().rect.unwrap();
//! assert_eq!(moved.origin(), Point::new(100.0, 200.0));
//! assert_eq!(canvas.target_at(Point::new(105.0, 205.0)), Some(block));
//! assert_eq!(canvas.selection().items(), &[block]);
//! ```

mod canvas;
mod config;
mod error;
mod selection;

pub use canvas::{Canvas, CanvasNode, Document};
pub use config::{
    BatchConfig, CameraConfig, CanvasConfig, ClampSetting, DragConfig, GridStage, IndexConfig,
};
pub use error::ConfigError;
pub use selection::Selection;
