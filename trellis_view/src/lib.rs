// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis View: the camera of a diagram canvas.
//!
//! [`Camera`] is a small, headless model of a pan/zoom view over a world
//! plane. It focuses on:
//! - Conversion between screen pixels and world coordinates.
//! - Zooming about a pivot and panning in screen space.
//! - Viewport insets that shrink the usable area for fitting operations,
//!   for split layouts or overlay panels.
//! - Clamping against optional world bounds (see [`ClampMode`]).
//! - Level-of-detail tiers ([`ScaleLevel`]) derived from the scale, which
//!   renderers and hit testing read to decide what work to skip.
//!
//! It does **not** own a scene or rendering backend.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Insets, Point, Rect, Size};
//! use trellis_view::{Camera, Maintain, ScaleLevel};
//!
//! let mut camera = Camera::new(Size::new(800.0, 600.0));
//!
//! // Zoom out around the cursor; the world point under it stays put.
//! let cursor = Point::new(200.0, 150.0);
//! let under_cursor = camera.apply_to_point(cursor);
//! camera.zoom(cursor, 0.1);
//! assert!((camera.apply_to_point(cursor) - under_cursor).hypot() < 1e-9);
//! assert_eq!(camera.scale_level(None), ScaleLevel::Minimalistic);
//!
//! // A side panel covers the left 200 pixels; fit a selection into the rest.
//! camera.set_viewport_insets(Insets::new(200.0, 0.0, 0.0, 0.0), Some(Maintain::Center));
//! camera.zoom_to_rect(Rect::new(0.0, 0.0, 300.0, 300.0), 0.0);
//! let fitted = camera.to_screen(Point::new(150.0, 150.0));
//! assert!((fitted - Point::new(500.0, 300.0)).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod camera;
mod modes;

pub use camera::{Camera, CameraDebugInfo, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};
pub use modes::{ClampMode, LodThresholds, Maintain, ScaleLevel};
