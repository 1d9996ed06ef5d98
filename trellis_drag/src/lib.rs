// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Drag: drag sessions and position modifiers for diagram canvases.
//!
//! [`DragEngine`] turns pointer-down/move/up events into drag sessions over
//! application keys. It works with any scene structure: the application
//! implements [`DragHost`] to answer which keys are draggable and selected,
//! and [`Draggable`] on the items that move.
//!
//! - A session starts on the first move after a qualifying pointer-down, so
//!   plain clicks never produce drag callbacks.
//! - Participants are resolved once per session: the whole selection if the
//!   pointer-down target is selected, otherwise just the target.
//! - Every event carries both the displacement from the start (`diff`) and
//!   the change since the previous event (`delta`).
//! - A camera change during a drag re-emits the drag with the pointer's new
//!   world position ([`DragEngine::camera_changed`]).
//!
//! Positions run through a [`ModifierChain`] of [`PositionModifier`]s in
//! descending priority. The crate ships [`GridSnap`], [`PointMagnet`], and
//! [`BorderMagnet`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_drag::{DragEngine, DragEvent, DragHost, Draggable, GridSnap};
//! use trellis_view::Camera;
//!
//! struct Block {
//!     pos: Point,
//! }
//!
//! impl Draggable for Block {
//!     fn drag_origin(&self) -> Point {
//!         self.pos
//!     }
//!     fn on_drag(&mut self, event: &DragEvent) {
//!         self.pos = event.position;
//!     }
//!     fn on_drag_end(&mut self, event: &DragEvent) {
//!         self.pos = event.position;
//!     }
//! }
//!
//! struct Doc {
//!     block: Block,
//! }
//!
//! impl DragHost<u32> for Doc {
//!     fn is_draggable(&self, _: &u32) -> bool {
//!         true
//!     }
//!     fn selection(&self) -> &[u32] {
//!         &[]
//!     }
//!     fn draggable(&mut self, _: &u32) -> Option<&mut dyn Draggable> {
//!         Some(&mut self.block)
//!     }
//! }
//!
//! let camera = Camera::new(Size::new(800.0, 600.0));
//! let mut doc = Doc { block: Block { pos: Point::new(100.0, 100.0) } };
//! let mut drag = DragEngine::new();
//! drag.modifiers_mut().push(GridSnap::on_drop(20.0));
//!
//! drag.pointer_down(1, Point::new(110.0, 110.0), &camera, &doc);
//! drag.pointer_move(Point::new(140.0, 150.0), &camera, &mut doc);
//! assert_eq!(doc.block.pos, Point::new(130.0, 140.0));
//! drag.pointer_up(Point::new(141.0, 152.0), &camera, &mut doc);
//! assert_eq!(doc.block.pos, Point::new(140.0, 140.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod modifier;
mod modifiers;
mod state;

pub use engine::{DragEngine, DragEvent, DragHost, Draggable};
pub use modifier::{
    Axis, DragStage, ModifierChain, ModifierContext, PositionModifier, SessionInfo, SnapTarget,
};
pub use modifiers::{Axes, BorderMagnet, DEFAULT_MIN_MOVEMENT, GridSnap, PointMagnet};
pub use state::{DragState, DragStep};
