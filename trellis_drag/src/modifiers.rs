// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference position modifiers: grid snapping and magnetism.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::modifier::{Axis, DragStage, ModifierContext, PositionModifier, SessionInfo, SnapTarget};

/// Pixels the pointer must travel before magnets engage.
pub const DEFAULT_MIN_MOVEMENT: f64 = 3.0;

/// Rounds positions to a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSnap {
    /// Grid spacing in world units. Non-positive spacing disables snapping.
    pub grid: f64,
    /// Stage the snap applies to; `None` applies it at every stage.
    pub stage: Option<DragStage>,
    /// Pipeline priority.
    pub priority: i32,
}

impl GridSnap {
    /// Name used in the chain.
    pub const NAME: &'static str = "grid-snap";

    /// Snaps to `grid` when the drag is dropped.
    #[must_use]
    pub fn on_drop(grid: f64) -> Self {
        Self {
            grid,
            stage: Some(DragStage::Drop),
            priority: 0,
        }
    }

    /// Snaps to `grid` at every stage.
    #[must_use]
    pub fn always(grid: f64) -> Self {
        Self {
            grid,
            stage: None,
            priority: 0,
        }
    }
}

impl PositionModifier for GridSnap {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn applicable(&self, _: Point, _: &SessionInfo, ctx: &ModifierContext) -> bool {
        self.grid > 0.0 && self.stage.is_none_or(|s| s == ctx.stage)
    }

    fn suggest(&self, pos: Point, _: &SessionInfo, _: &mut ModifierContext) -> Point {
        Point::new(
            (pos.x / self.grid).round() * self.grid,
            (pos.y / self.grid).round() * self.grid,
        )
    }
}

/// Snaps to the nearest anchor in [`ModifierContext::anchors`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMagnet {
    /// Search radius in screen pixels.
    pub distance: f64,
    /// Pointer travel in pixels before the magnet engages.
    pub min_movement: f64,
    /// Pipeline priority.
    pub priority: i32,
}

impl PointMagnet {
    /// Name used in the chain and for recorded targets.
    pub const NAME: &'static str = "point-magnet";

    /// Creates a magnet with the given pixel radius.
    #[must_use]
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            min_movement: DEFAULT_MIN_MOVEMENT,
            priority: 20,
        }
    }
}

impl PositionModifier for PointMagnet {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn applicable(&self, _: Point, session: &SessionInfo, ctx: &ModifierContext) -> bool {
        !ctx.anchors.is_empty() && !session.is_micro_movement(self.min_movement)
    }

    fn suggest(&self, pos: Point, _: &SessionInfo, ctx: &mut ModifierContext) -> Point {
        let radius = self.distance / ctx.scale.max(f64::MIN_POSITIVE);
        let nearest = ctx
            .anchors
            .iter()
            .map(|a| (*a, a.distance_squared(pos)))
            .filter(|(_, d2)| *d2 <= radius * radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((anchor, _)) => {
                ctx.record(Self::NAME, SnapTarget::Point(anchor));
                anchor
            }
            None => pos,
        }
    }
}

/// Which axes a [`BorderMagnet`] snaps along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Axes {
    /// Only x, against vertical edges.
    X,
    /// Only y, against horizontal edges.
    Y,
    /// Both axes independently.
    #[default]
    Both,
}

impl Axes {
    fn includes(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Both, _) | (Self::X, Axis::X) | (Self::Y, Axis::Y)
        )
    }
}

/// Aligns with the edges of [`ModifierContext::boxes`], treated as infinite lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderMagnet {
    /// Search distance in screen pixels. `None` considers every line of
    /// every box that intersects the visible viewport.
    pub distance: Option<f64>,
    /// Axes to snap along.
    pub axes: Axes,
    /// Pointer travel in pixels before the magnet engages.
    pub min_movement: f64,
    /// Pipeline priority.
    pub priority: i32,
}

impl BorderMagnet {
    /// Name used in the chain and for recorded targets.
    pub const NAME: &'static str = "border-magnet";

    /// Creates a magnet with an optional pixel search distance.
    #[must_use]
    pub fn new(distance: Option<f64>, axes: Axes) -> Self {
        Self {
            distance,
            axes,
            min_movement: DEFAULT_MIN_MOVEMENT,
            priority: 10,
        }
    }

    fn nearest_line(&self, value: f64, axis: Axis, ctx: &ModifierContext) -> Option<f64> {
        let limit = self
            .distance
            .map(|d| d / ctx.scale.max(f64::MIN_POSITIVE));
        let candidates = ctx.boxes.iter().filter(|b| {
            limit.is_some() || b.overlaps(ctx.viewport) || ctx.viewport.contains_rect(**b)
        });
        candidates
            .flat_map(|b| match axis {
                Axis::X => [b.x0, b.x1],
                Axis::Y => [b.y0, b.y1],
            })
            .map(|line| (line, (line - value).abs()))
            .filter(|(_, d)| limit.is_none_or(|l| *d <= l))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(line, _)| line)
    }
}

impl PositionModifier for BorderMagnet {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn applicable(&self, _: Point, session: &SessionInfo, ctx: &ModifierContext) -> bool {
        !ctx.boxes.is_empty() && !session.is_micro_movement(self.min_movement)
    }

    fn suggest(&self, pos: Point, _: &SessionInfo, ctx: &mut ModifierContext) -> Point {
        let mut out = pos;
        for axis in [Axis::X, Axis::Y] {
            if !self.axes.includes(axis) {
                continue;
            }
            let value = match axis {
                Axis::X => pos.x,
                Axis::Y => pos.y,
            };
            if let Some(at) = self.nearest_line(value, axis, ctx) {
                match axis {
                    Axis::X => out.x = at,
                    Axis::Y => out.y = at,
                }
                ctx.record(Self::NAME, SnapTarget::Line { axis, at });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::{Rect, Vec2};

    fn session(stage: DragStage, diff: Vec2) -> SessionInfo {
        SessionInfo {
            stage,
            start: Point::ORIGIN,
            current: Point::ORIGIN + diff,
            diff,
            origin: Point::ORIGIN,
            participants: 1,
            scale: 1.0,
        }
    }

    fn ctx(stage: DragStage) -> ModifierContext {
        ModifierContext::new(stage, Rect::new(0.0, 0.0, 1000.0, 1000.0), 1.0)
    }

    #[test]
    fn grid_snap_only_at_its_stage() {
        let grid = GridSnap::on_drop(20.0);
        let pos = Point::new(107.0, 193.0);
        let s = session(DragStage::Dragging, Vec2::new(50.0, 50.0));
        assert!(!grid.applicable(pos, &s, &ctx(DragStage::Dragging)));

        let mut drop = ctx(DragStage::Drop);
        assert!(grid.applicable(pos, &s, &drop));
        assert_eq!(grid.suggest(pos, &s, &mut drop), Point::new(100.0, 200.0));
        assert!(!GridSnap::always(0.0).applicable(pos, &s, &drop));
    }

    #[test]
    fn point_magnet_picks_nearest_anchor_in_range() {
        let magnet = PointMagnet::new(10.0);
        let mut c = ctx(DragStage::Dragging);
        c.anchors = vec![Point::new(50.0, 50.0), Point::new(58.0, 50.0), Point::new(200.0, 0.0)];
        let s = session(DragStage::Dragging, Vec2::new(40.0, 0.0));

        assert!(magnet.applicable(Point::ORIGIN, &s, &c));
        assert_eq!(magnet.suggest(Point::new(55.0, 51.0), &s, &mut c), Point::new(58.0, 50.0));
        assert_eq!(
            c.targets_of(PointMagnet::NAME).collect::<Vec<_>>(),
            vec![SnapTarget::Point(Point::new(58.0, 50.0))]
        );
        assert_eq!(magnet.suggest(Point::new(120.0, 0.0), &s, &mut c), Point::new(120.0, 0.0));

        let jitter = session(DragStage::Dragging, Vec2::new(1.0, 1.0));
        assert!(!magnet.applicable(Point::ORIGIN, &jitter, &c));
    }

    #[test]
    fn border_magnet_snaps_per_axis() {
        let mut c = ctx(DragStage::Dragging);
        c.boxes = vec![Rect::new(100.0, 300.0, 180.0, 360.0)];
        let s = session(DragStage::Dragging, Vec2::new(30.0, 30.0));

        let both = BorderMagnet::new(Some(8.0), Axes::Both);
        assert_eq!(both.suggest(Point::new(176.0, 295.0), &s, &mut c), Point::new(180.0, 300.0));
        assert_eq!(c.targets().len(), 2);

        let x_only = BorderMagnet::new(Some(8.0), Axes::X);
        assert_eq!(x_only.suggest(Point::new(95.0, 295.0), &s, &mut c), Point::new(100.0, 295.0));

        // Out of range on both axes.
        assert_eq!(both.suggest(Point::new(140.0, 500.0), &s, &mut c), Point::new(140.0, 500.0));
    }

    #[test]
    fn unbounded_border_magnet_stays_within_viewport() {
        let mut c = ctx(DragStage::Dragging);
        c.boxes = vec![
            Rect::new(5000.0, 5000.0, 5100.0, 5100.0),
            Rect::new(600.0, 600.0, 700.0, 700.0),
        ];
        let s = session(DragStage::Dragging, Vec2::new(30.0, 30.0));
        let magnet = BorderMagnet::new(None, Axes::Both);
        assert_eq!(magnet.suggest(Point::new(10.0, 990.0), &s, &mut c), Point::new(600.0, 700.0));
    }
}
