// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position modifier pipeline.
//!
//! A modifier looks at a suggested position for the dragged item and may
//! return a different one. Modifiers run in descending priority and each
//! receives the previous modifier's output, so they compose rather than
//! compete. Anything a modifier wants to show the user, such as the anchor
//! it snapped to, goes into the [`ModifierContext`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Vec2};

/// Phase of a drag session a position is being computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragStage {
    /// The session just started; positions equal the origins.
    Start,
    /// The pointer is moving.
    Dragging,
    /// The pointer was released; this position is committed.
    Drop,
}

/// Axis of a snap line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// A vertical line, constraining x.
    X,
    /// A horizontal line, constraining y.
    Y,
}

/// Something a modifier snapped to, recorded for visualization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapTarget {
    /// An anchor point.
    Point(Point),
    /// An infinite line at `at` along `axis`.
    Line {
        /// Which coordinate the line constrains.
        axis: Axis,
        /// World coordinate of the line.
        at: f64,
    },
}

/// Read-only facts about the running session handed to modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionInfo {
    /// Stage being computed.
    pub stage: DragStage,
    /// World position of the pointer at drag start.
    pub start: Point,
    /// Current world position of the pointer.
    pub current: Point,
    /// Unmodified displacement from the start, in world units.
    pub diff: Vec2,
    /// Origin of the primary dragged item at drag start.
    pub origin: Point,
    /// Number of participating items.
    pub participants: usize,
    /// Camera scale, for converting pixel thresholds into world units.
    pub scale: f64,
}

impl SessionInfo {
    /// Pointer displacement from the start in screen pixels.
    #[must_use]
    pub fn screen_distance(&self) -> f64 {
        self.diff.hypot() * self.scale
    }

    /// Returns `true` while the pointer has moved less than `threshold` pixels.
    ///
    /// Magnet modifiers use this to stay inactive on jitter right after the
    /// session starts.
    #[must_use]
    pub fn is_micro_movement(&self, threshold: f64) -> bool {
        self.screen_distance() < threshold
    }
}

/// Side channel shared by all modifiers of a session.
///
/// The host fills in candidate anchors and boxes when the session starts;
/// the engine refreshes `stage`, `viewport` and `scale` before each run and
/// clears the recorded targets.
#[derive(Clone, Debug)]
pub struct ModifierContext {
    /// Stage being computed.
    pub stage: DragStage,
    /// Visible world rect.
    pub viewport: Rect,
    /// Camera scale.
    pub scale: f64,
    /// Candidate anchor points for point magnetism.
    pub anchors: Vec<Point>,
    /// Candidate boxes for border magnetism.
    pub boxes: Vec<Rect>,
    targets: Vec<(&'static str, SnapTarget)>,
}

impl ModifierContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new(stage: DragStage, viewport: Rect, scale: f64) -> Self {
        Self {
            stage,
            viewport,
            scale,
            anchors: Vec::new(),
            boxes: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Records what the modifier `name` snapped to.
    pub fn record(&mut self, name: &'static str, target: SnapTarget) {
        self.targets.push((name, target));
    }

    /// Every target recorded in the current run, in modifier order.
    #[must_use]
    pub fn targets(&self) -> &[(&'static str, SnapTarget)] {
        &self.targets
    }

    /// Targets recorded by the modifier `name`.
    pub fn targets_of(&self, name: &'static str) -> impl Iterator<Item = SnapTarget> + '_ {
        self.targets
            .iter()
            .filter(move |(n, _)| *n == name)
            .map(|(_, t)| *t)
    }

    pub(crate) fn begin_run(&mut self, stage: DragStage, viewport: Rect, scale: f64) {
        self.stage = stage;
        self.viewport = viewport;
        self.scale = scale;
        self.targets.clear();
    }
}

/// A pluggable position suggestion.
pub trait PositionModifier {
    /// Name used for removal and for recorded targets.
    fn name(&self) -> &'static str;

    /// Higher priorities run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Gate checked before [`PositionModifier::suggest`].
    fn applicable(&self, pos: Point, session: &SessionInfo, ctx: &ModifierContext) -> bool;

    /// Returns the adjusted position. `pos` is the previous modifier's output.
    fn suggest(&self, pos: Point, session: &SessionInfo, ctx: &mut ModifierContext) -> Point;
}

/// Modifiers ordered by descending priority, registration order among equals.
#[derive(Default)]
pub struct ModifierChain {
    modifiers: Vec<Box<dyn PositionModifier>>,
}

impl fmt::Debug for ModifierChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.modifiers.iter().map(|m| (m.name(), m.priority())))
            .finish()
    }
}

impl ModifierChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a modifier after every modifier of equal or higher priority.
    pub fn push(&mut self, modifier: impl PositionModifier + 'static) {
        let p = modifier.priority();
        let at = self.modifiers.partition_point(|m| m.priority() >= p);
        self.modifiers.insert(at, Box::new(modifier));
    }

    /// Removes every modifier called `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.name() != name);
        before != self.modifiers.len()
    }

    /// Modifier names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modifiers.iter().map(|m| m.name())
    }

    /// Number of modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Returns `true` if the chain has no modifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Runs the pipeline over `pos`.
    pub fn apply(&self, pos: Point, session: &SessionInfo, ctx: &mut ModifierContext) -> Point {
        self.modifiers.iter().fold(pos, |pos, m| {
            if m.applicable(pos, session, ctx) {
                m.suggest(pos, session, ctx)
            } else {
                pos
            }
        })
    }
}
