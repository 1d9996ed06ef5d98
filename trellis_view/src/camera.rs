// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Insets, Point, Rect, Size, Vec2};

use crate::modes::{ClampMode, LodThresholds, Maintain, ScaleLevel};

/// Smallest scale allowed by default.
pub const DEFAULT_MIN_SCALE: f64 = 0.01;
/// Largest scale allowed by default.
pub const DEFAULT_MAX_SCALE: f64 = 4.0;

/// Pan/zoom camera over a world-space plane.
///
/// Screen coordinates have their origin at the top-left corner of the
/// viewport. The mapping is `screen = world * scale + translation`.
///
/// - Scale is always within `[min_scale, max_scale]`.
/// - With world bounds set, every change is followed by a clamp according
///   to the [`ClampMode`].
/// - Insets carve a usable rect out of the viewport for fitting operations
///   such as [`Camera::zoom_to_rect`], without changing the viewport size.
#[derive(Clone, Debug)]
pub struct Camera {
    viewport: Size,
    insets: Insets,
    scale: f64,
    translation: Vec2,
    min_scale: f64,
    max_scale: f64,
    world_bounds: Option<Rect>,
    clamp_mode: ClampMode,
    lod: LodThresholds,
    world_to_screen: Affine,
    screen_to_world: Affine,
}

impl Camera {
    /// Creates a camera for a viewport of `viewport` pixels.
    ///
    /// - Initial scale is `1.0` and the world origin maps to the viewport origin.
    /// - Scale limits are [`DEFAULT_MIN_SCALE`] and [`DEFAULT_MAX_SCALE`].
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let mut camera = Self {
            viewport,
            insets: Insets::ZERO,
            scale: 1.0,
            translation: Vec2::ZERO,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            world_bounds: None,
            clamp_mode: ClampMode::default(),
            lod: LodThresholds::default(),
            world_to_screen: Affine::IDENTITY,
            screen_to_world: Affine::IDENTITY,
        };
        camera.rebuild_transforms();
        camera
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation in screen pixels.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Viewport size in screen pixels.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resizes the viewport. Scale and translation are kept, then clamped.
    pub fn set_viewport_size(&mut self, size: Size) {
        if self.viewport == size {
            return;
        }
        self.viewport = size;
        self.clamp_to_bounds();
    }

    /// Current viewport insets.
    #[must_use]
    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// Sets the viewport insets.
    ///
    /// With [`Maintain::Center`] the camera is translated so that the world
    /// point at the center of the old usable rect appears at the center of
    /// the new one.
    pub fn set_viewport_insets(&mut self, insets: Insets, maintain: Option<Maintain>) {
        let old_center = self.usable_rect().center();
        self.insets = insets;
        if maintain == Some(Maintain::Center) {
            let new_center = self.usable_rect().center();
            self.translation += new_center - old_center;
            self.rebuild_transforms();
        }
        self.clamp_to_bounds();
    }

    /// Viewport rect in screen coordinates.
    #[must_use]
    pub fn viewport_rect(&self) -> Rect {
        self.viewport.to_rect()
    }

    /// Viewport rect minus insets, in screen coordinates.
    ///
    /// Insets larger than the viewport collapse the rect to zero size.
    #[must_use]
    pub fn usable_rect(&self) -> Rect {
        let x0 = self.insets.x0.max(0.0);
        let y0 = self.insets.y0.max(0.0);
        let x1 = (self.viewport.width - self.insets.x1.max(0.0)).max(x0);
        let y1 = (self.viewport.height - self.insets.y1.max(0.0)).max(y0);
        Rect::new(x0, y0, x1, y1)
    }

    /// Scale limits as `(min, max)`.
    #[must_use]
    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Sets the scale limits.
    ///
    /// The range is normalized so that `min <= max`; non-positive or
    /// non-finite limits are ignored. The current scale is clamped into the
    /// new range around the usable rect center.
    pub fn set_scale_limits(&mut self, min: f64, max: f64) {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0) {
            return;
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_scale = min;
        self.max_scale = max;
        let center = self.usable_rect().center();
        self.zoom(center, self.scale);
    }

    /// Sets optional world bounds and clamps.
    pub fn set_world_bounds(&mut self, bounds: Option<Rect>) {
        let bounds = bounds.map(|b| b.abs());
        if self.world_bounds == bounds {
            return;
        }
        self.world_bounds = bounds;
        self.clamp_to_bounds();
    }

    /// Current world bounds.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Rect> {
        self.world_bounds
    }

    /// Sets the clamp mode.
    pub fn set_clamp_mode(&mut self, mode: ClampMode) {
        if self.clamp_mode != mode {
            self.clamp_mode = mode;
            self.clamp_to_bounds();
        }
    }

    /// Current clamp mode.
    #[must_use]
    pub fn clamp_mode(&self) -> ClampMode {
        self.clamp_mode
    }

    /// Sets the level-of-detail thresholds.
    pub fn set_lod_thresholds(&mut self, lod: LodThresholds) {
        self.lod = lod;
    }

    /// Current level-of-detail thresholds.
    #[must_use]
    pub fn lod_thresholds(&self) -> LodThresholds {
        self.lod
    }

    /// Level of detail for `scale`, or for the current scale if `None`.
    #[must_use]
    pub fn scale_level(&self, scale: Option<f64>) -> ScaleLevel {
        self.lod.level(scale.unwrap_or(self.scale))
    }

    /// Converts a screen point into world coordinates.
    #[must_use]
    pub fn apply_to_point(&self, screen: Point) -> Point {
        self.screen_to_world * screen
    }

    /// Converts a world point into screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        self.world_to_screen * world
    }

    /// Converts a screen rect into world coordinates.
    #[must_use]
    pub fn apply_to_rect(&self, screen: Rect) -> Rect {
        self.screen_to_world.transform_rect_bbox(screen)
    }

    /// Converts a world rect into screen coordinates.
    #[must_use]
    pub fn to_screen_rect(&self, world: Rect) -> Rect {
        self.world_to_screen.transform_rect_bbox(world)
    }

    /// World-space rect currently covered by the whole viewport.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.apply_to_rect(self.viewport_rect())
    }

    /// Transform mapping world coordinates to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self) -> Affine {
        self.world_to_screen
    }

    /// Zooms to `new_scale` keeping the world point under `pivot` fixed.
    ///
    /// `new_scale` is clamped into the scale limits; clamping against world
    /// bounds may move the pivot afterwards.
    pub fn zoom(&mut self, pivot: Point, new_scale: f64) {
        if !new_scale.is_finite() || new_scale <= 0.0 {
            return;
        }
        let scale = new_scale.clamp(self.min_scale, self.max_scale);
        let world = self.apply_to_point(pivot);
        self.scale = scale;
        self.translation = pivot.to_vec2() - world.to_vec2() * scale;
        self.rebuild_transforms();
        self.clamp_to_bounds();
    }

    /// Zooms by a multiplicative `factor` around `pivot`.
    pub fn zoom_by(&mut self, pivot: Point, factor: f64) {
        self.zoom(pivot, self.scale * factor);
    }

    /// Pans by a screen-space delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.translation += Vec2::new(dx, dy);
        self.rebuild_transforms();
        self.clamp_to_bounds();
    }

    /// Centers the usable rect on a world point.
    pub fn center_on(&mut self, world: Point) {
        let delta = self.usable_rect().center() - self.to_screen(world);
        self.move_by(delta.x, delta.y);
    }

    /// Fits a world rect into the usable rect with `padding` screen pixels
    /// on every side, preserving aspect ratio.
    ///
    /// Empty or non-finite rects are ignored.
    pub fn zoom_to_rect(&mut self, world: Rect, padding: f64) {
        let world = world.abs();
        if !(world.is_finite() && world.width() > 0.0 && world.height() > 0.0) {
            return;
        }
        let usable = self.usable_rect();
        let avail_w = (usable.width() - 2.0 * padding).max(1.0);
        let avail_h = (usable.height() - 2.0 * padding).max(1.0);
        let scale = (avail_w / world.width())
            .min(avail_h / world.height())
            .clamp(self.min_scale, self.max_scale);
        self.scale = scale;
        self.translation = usable.center().to_vec2() - world.center().to_vec2() * scale;
        self.rebuild_transforms();
        self.clamp_to_bounds();
    }

    /// Snapshot of the current camera state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> CameraDebugInfo {
        CameraDebugInfo {
            viewport: self.viewport,
            insets: self.insets,
            usable_rect: self.usable_rect(),
            world_bounds: self.world_bounds,
            visible_world_rect: self.visible_world_rect(),
            scale: self.scale,
            translation: self.translation,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            clamp_mode: self.clamp_mode,
            scale_level: self.scale_level(None),
        }
    }

    fn rebuild_transforms(&mut self) {
        self.world_to_screen = Affine::translate(self.translation) * Affine::scale(self.scale);
        self.screen_to_world = self.world_to_screen.inverse();
    }

    fn clamp_to_bounds(&mut self) {
        let bounds = match self.world_bounds {
            Some(b) if b.is_finite() && b.width() > 0.0 && b.height() > 0.0 => b,
            _ => return,
        };
        let (w, h) = (self.viewport.width, self.viewport.height);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        match self.clamp_mode {
            ClampMode::None => {}
            ClampMode::KeepSomeVisible => self.keep_some_visible(bounds),
            ClampMode::Contain => self.contain(bounds, w, h),
        }
    }

    fn keep_some_visible(&mut self, bounds: Rect) {
        let visible = self.visible_world_rect();
        let mut dx = 0.0;
        let mut dy = 0.0;
        if visible.max_x() < bounds.min_x() {
            dx = bounds.min_x() - visible.max_x();
        } else if visible.min_x() > bounds.max_x() {
            dx = bounds.max_x() - visible.min_x();
        }
        if visible.max_y() < bounds.min_y() {
            dy = bounds.min_y() - visible.max_y();
        } else if visible.min_y() > bounds.max_y() {
            dy = bounds.max_y() - visible.min_y();
        }
        if dx != 0.0 || dy != 0.0 {
            // Moving the visible rect by +d in world space is a -d*scale pan.
            self.translation -= Vec2::new(dx, dy) * self.scale;
            self.rebuild_transforms();
        }
    }

    fn contain(&mut self, bounds: Rect, w: f64, h: f64) {
        let needed = (w / bounds.width()).max(h / bounds.height());
        if needed > self.max_scale {
            tracing::trace!(needed, max = self.max_scale, "bounds too small, centering");
            self.scale = self.max_scale;
            let center = Vec2::new(w * 0.5, h * 0.5);
            self.translation = center - bounds.center().to_vec2() * self.scale;
            self.rebuild_transforms();
            return;
        }
        if self.scale < needed {
            self.scale = needed;
        }
        let s = self.scale;
        // Visible x0 = -tx / s must stay >= bounds.x0 and x1 = (w - tx) / s <= bounds.x1.
        let tx = clamp_span(self.translation.x, w - bounds.max_x() * s, -bounds.min_x() * s);
        let ty = clamp_span(self.translation.y, h - bounds.max_y() * s, -bounds.min_y() * s);
        self.translation = Vec2::new(tx, ty);
        self.rebuild_transforms();
    }
}

/// Clamps `v` into `[lo, hi]`, taking the midpoint when rounding left `lo > hi`.
fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi { (lo + hi) * 0.5 } else { v.clamp(lo, hi) }
}

/// Debug snapshot of a [`Camera`] state.
#[derive(Clone, Copy, Debug)]
pub struct CameraDebugInfo {
    /// Viewport size in screen pixels.
    pub viewport: Size,
    /// Viewport insets.
    pub insets: Insets,
    /// Viewport rect minus insets.
    pub usable_rect: Rect,
    /// Optional world bounds for clamping.
    pub world_bounds: Option<Rect>,
    /// World-space rect currently visible through the viewport.
    pub visible_world_rect: Rect,
    /// Current scale.
    pub scale: f64,
    /// Current translation in screen pixels.
    pub translation: Vec2,
    /// Minimum scale.
    pub min_scale: f64,
    /// Maximum scale.
    pub max_scale: f64,
    /// Clamp mode relative to bounds.
    pub clamp_mode: ClampMode,
    /// Level of detail at the current scale.
    pub scale_level: ScaleLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn screen_world_roundtrip() {
        let mut cam = Camera::new(Size::new(800.0, 600.0));
        cam.zoom(Point::new(100.0, 50.0), 2.5);
        cam.move_by(-30.0, 12.0);
        let world = Point::new(10.0, -5.0);
        assert!(close(cam.apply_to_point(cam.to_screen(world)), world));
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut cam = Camera::new(Size::new(800.0, 600.0));
        let pivot = Point::new(400.0, 300.0);
        let before = cam.apply_to_point(pivot);
        cam.zoom(pivot, 2.0);
        assert!(close(cam.apply_to_point(pivot), before));
        assert_eq!(cam.scale(), 2.0);
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let mut cam = Camera::new(Size::new(800.0, 600.0));
        cam.zoom(Point::ORIGIN, 1000.0);
        assert_eq!(cam.scale(), DEFAULT_MAX_SCALE);
        cam.zoom(Point::ORIGIN, 1e-9);
        assert_eq!(cam.scale(), DEFAULT_MIN_SCALE);
        cam.zoom(Point::ORIGIN, f64::NAN);
        assert_eq!(cam.scale(), DEFAULT_MIN_SCALE);
    }

    #[test]
    fn scale_level_thresholds() {
        let cam = Camera::new(Size::new(800.0, 600.0));
        assert_eq!(cam.scale_level(Some(0.05)), ScaleLevel::Minimalistic);
        assert_eq!(cam.scale_level(Some(0.225)), ScaleLevel::Schematic);
        assert_eq!(cam.scale_level(Some(0.5)), ScaleLevel::Schematic);
        assert_eq!(cam.scale_level(Some(1.2)), ScaleLevel::Detailed);
        assert_eq!(cam.scale_level(None), ScaleLevel::Detailed);
    }

    #[test]
    fn keep_some_visible_pulls_view_back() {
        let mut cam = Camera::new(Size::new(100.0, 100.0));
        cam.set_clamp_mode(ClampMode::KeepSomeVisible);
        let bounds = Rect::new(0.0, 0.0, 50.0, 50.0);
        cam.set_world_bounds(Some(bounds));
        cam.move_by(1000.0, 1000.0);
        let visible = cam.visible_world_rect();
        assert!(visible.max_x() >= bounds.min_x() - 1e-9);
        assert!(visible.max_y() >= bounds.min_y() - 1e-9);
    }

    #[test]
    fn debug_info_reflects_state() {
        let mut cam = Camera::new(Size::new(400.0, 300.0));
        cam.set_viewport_insets(Insets::new(100.0, 0.0, 0.0, 0.0), None);
        let info = cam.debug_info();
        assert_eq!(info.usable_rect, Rect::new(100.0, 0.0, 400.0, 300.0));
        assert_eq!(info.clamp_mode, ClampMode::Contain);
        assert_eq!(info.scale_level, ScaleLevel::Detailed);
        assert!(info.min_scale <= info.max_scale);
    }
}
