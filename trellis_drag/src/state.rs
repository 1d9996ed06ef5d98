// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer displacement tracking for one drag session.
//!
//! ## Usage
//!
//! 1) Start tracking with [`DragState::start`] at the initial world position.
//! 2) On each move call [`DragState::update`] to get both displacements.
//! 3) Reset with [`DragState::end`].
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use trellis_drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//!
//! let step = drag.update(Point::new(15.0, 25.0)).unwrap();
//! assert_eq!(step.diff, Vec2::new(5.0, 5.0));
//! assert_eq!(step.delta, Vec2::new(5.0, 5.0));
//!
//! let step = drag.update(Point::new(12.0, 25.0)).unwrap();
//! assert_eq!(step.diff, Vec2::new(2.0, 5.0));
//! assert_eq!(step.delta, Vec2::new(-3.0, 0.0));
//! ```

use kurbo::{Point, Vec2};

/// Displacements reported by [`DragState::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    /// Displacement from the drag start.
    pub diff: Vec2,
    /// Displacement since the previous update.
    pub delta: Vec2,
}

/// Start, previous and current pointer positions of a drag.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Start position of the drag operation.
    pub start: Option<Point>,
    /// Position before the most recent update.
    pub previous: Option<Point>,
    /// Most recent position.
    pub current: Option<Point>,
}

impl DragState {
    /// Start tracking a new drag from `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start = Some(pos);
        self.previous = Some(pos);
        self.current = Some(pos);
    }

    /// Record a new position. Returns `None` when not dragging.
    pub fn update(&mut self, pos: Point) -> Option<DragStep> {
        let start = self.start?;
        let last = self.current.unwrap_or(start);
        self.previous = Some(last);
        self.current = Some(pos);
        Some(DragStep {
            diff: pos - start,
            delta: pos - last,
        })
    }

    /// Displacement of the current position from the start.
    pub fn total_offset(&self) -> Option<Vec2> {
        Some(self.current? - self.start?)
    }

    /// End the current drag and reset state.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a drag is tracked.
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }
}
