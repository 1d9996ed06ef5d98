// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: scene, hit index, camera, drag engine and ticker wired together.

use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size};
use trellis_drag::{DragEngine, DragHost, Draggable, ModifierContext};
use trellis_index::{Aabb2D, HitIndex, HitTestable};
use trellis_scene::{DirtyFlags, Frame, NodeId, Priority, RenderStats, Renderable, SceneTree, TickControl, Ticker};
use trellis_view::{Camera, ScaleLevel};

use crate::config::CanvasConfig;
use crate::error::ConfigError;
use crate::selection::Selection;

/// Capabilities of the payload stored in every canvas scene node.
///
/// Blocks, links, ports and layers all implement this; most methods have
/// defaults suited to passive nodes.
pub trait CanvasNode: Renderable + HitTestable {
    /// World-space hit box. Nodes returning `None` are not hit-testable.
    fn bounds(&self) -> Option<Rect>;

    /// Returns `true` if pointer drags may move this node.
    fn is_draggable(&self) -> bool {
        false
    }

    /// The drag capability of this node.
    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        None
    }

    /// Returns `true` if clicking this node selects it.
    fn is_selectable(&self) -> bool {
        self.bounds().is_some()
    }

    /// Anchor points other nodes may magnetically snap to.
    fn anchors(&self, out: &mut Vec<Point>) {
        let _ = out;
    }
}

/// Scene, hit index and selection of a canvas.
///
/// This is the context handed to [`Ticker`] callbacks and the
/// [`DragHost`] seen by the drag engine.
pub struct Document<N> {
    scene: SceneTree<N>,
    index: HitIndex<NodeId>,
    selection: Selection<NodeId>,
    last_render: Option<RenderStats>,
}

impl<N> fmt::Debug for Document<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.scene.len())
            .field("indexed", &self.index.len())
            .field("selection", &self.selection.items())
            .field("last_render", &self.last_render)
            .finish_non_exhaustive()
    }
}

impl<N: CanvasNode> Document<N> {
    /// The scene tree.
    #[must_use]
    pub fn scene(&self) -> &SceneTree<N> {
        &self.scene
    }

    /// The hit index.
    #[must_use]
    pub fn index(&self) -> &HitIndex<NodeId> {
        &self.index
    }

    /// The selection.
    #[must_use]
    pub fn selection(&self) -> &Selection<NodeId> {
        &self.selection
    }

    /// Stats of the latest scene render pass.
    #[must_use]
    pub fn last_render(&self) -> Option<RenderStats> {
        self.last_render
    }

    /// Runs the scene's pending render pass, if any.
    ///
    /// Child lists regenerated during the pass may mount or drop nodes the
    /// index does not know about, so the index is rebuilt afterwards.
    pub fn render(&mut self) -> Option<RenderStats> {
        let stats = self.scene.tick()?;
        if stats.rebuilt > 0 {
            self.reindex();
        }
        self.last_render = Some(stats);
        Some(stats)
    }

    /// Mirrors the bounds of `id` into the index and marks it for rendering.
    fn sync(&mut self, id: NodeId) {
        let bounds = self.scene.get(id).and_then(N::bounds).map(Aabb2D::from);
        match bounds {
            Some(aabb) if self.index.get(&id) == Some(aabb) => {}
            Some(aabb) => self.index.add(id, aabb, false),
            None => {
                self.index.remove(&id);
            }
        }
        self.scene.mark_dirty(id, DirtyFlags::NEEDS_RENDER);
    }

    /// Reloads the index from every live node.
    fn reindex(&mut self) {
        let mut ids = Vec::new();
        self.scene.traverse(|_, id| {
            ids.push(id);
            true
        });
        let scene = &self.scene;
        let records: Vec<(NodeId, Aabb2D)> = ids
            .into_iter()
            .filter_map(|id| Some((id, scene.get(id)?.bounds()?.into())))
            .collect();
        tracing::debug!(records = records.len(), "canvas reindexed");
        self.index.load(records);
        self.selection.retain(|id| scene.is_alive(*id));
    }

    /// Returns `true` if `id` is one of `keys` or lies below one of them.
    fn is_within(&self, mut id: NodeId, keys: &[NodeId]) -> bool {
        loop {
            if keys.contains(&id) {
                return true;
            }
            match self.scene.parent_of(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

impl<N: CanvasNode> DragHost<NodeId> for Document<N> {
    fn is_draggable(&self, key: &NodeId) -> bool {
        self.scene.get(*key).is_some_and(N::is_draggable)
    }

    fn selection(&self) -> &[NodeId] {
        self.selection.items()
    }

    fn draggable(&mut self, key: &NodeId) -> Option<&mut dyn Draggable> {
        self.scene.get_mut(*key)?.as_draggable()
    }

    fn fill_modifier_context(&mut self, participants: &[NodeId], ctx: &mut ModifierContext) {
        let candidates = self.index.query_box(ctx.viewport, |id| self.scene.get(*id));
        for id in candidates {
            if self.is_within(id, participants) {
                continue;
            }
            let Some(node) = self.scene.get(id) else {
                continue;
            };
            if let Some(bounds) = node.bounds() {
                ctx.boxes.push(bounds);
            }
            node.anchors(&mut ctx.anchors);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Idle,
    Pan { last: Point },
    Drag,
}

/// An interactive diagram canvas.
///
/// The host forwards pointer input in screen coordinates and calls
/// [`frame`](Self::frame) once per animation frame. Within a frame the
/// [`Ticker`] runs the hit index flush at [`Priority::High`] and the scene
/// render pass at [`Priority::Medium`]; hosts may register their own work
/// through [`ticker_mut`](Self::ticker_mut).
///
/// Nodes must be mounted through the canvas ([`mount`](Self::mount),
/// [`update_node`](Self::update_node), [`unmount`](Self::unmount)) so the hit
/// index follows their bounds.
pub struct Canvas<N> {
    config: CanvasConfig,
    doc: Document<N>,
    camera: Camera,
    drag: DragEngine<NodeId>,
    ticker: Ticker<Document<N>>,
    gesture: Gesture,
}

impl<N> fmt::Debug for Canvas<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("doc", &self.doc)
            .field("camera", &self.camera)
            .field("drag", &self.drag)
            .field("ticker", &self.ticker)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl<N: CanvasNode + 'static> Canvas<N> {
    /// Creates a canvas with `root` as the scene root.
    ///
    /// Fails if `config` does not validate.
    pub fn new(root: N, viewport: Size, config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut camera = Camera::new(viewport);
        config.camera.apply(&mut camera);

        let mut ticker = Ticker::new();
        ticker.register(Priority::High, |doc: &mut Document<N>, frame: &Frame| {
            doc.index.poll(frame.now);
            TickControl::Keep
        });
        ticker.register(Priority::Medium, |doc: &mut Document<N>, _: &Frame| {
            doc.render();
            TickControl::Keep
        });

        Ok(Self {
            doc: Document {
                scene: SceneTree::new(root),
                index: HitIndex::with_flush_window(config.index.flush_window()),
                selection: Selection::new(),
                last_render: None,
            },
            camera,
            drag: DragEngine::with_modifiers(config.drag.modifiers()),
            ticker,
            gesture: Gesture::Idle,
            config,
        })
    }

    /// The configuration the canvas was built with.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Scene, index and selection.
    #[must_use]
    pub fn document(&self) -> &Document<N> {
        &self.doc
    }

    /// The scene tree.
    #[must_use]
    pub fn scene(&self) -> &SceneTree<N> {
        &self.doc.scene
    }

    /// The selection.
    #[must_use]
    pub fn selection(&self) -> &Selection<NodeId> {
        &self.doc.selection
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The drag engine.
    #[must_use]
    pub fn drag(&self) -> &DragEngine<NodeId> {
        &self.drag
    }

    /// The frame ticker, for registering host work.
    pub fn ticker_mut(&mut self) -> &mut Ticker<Document<N>> {
        &mut self.ticker
    }

    /// The scene root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.doc.scene.root()
    }

    /// The node behind `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.doc.scene.get(id)
    }

    /// Mounts `node` under `parent` and registers its bounds.
    ///
    /// An existing `key` under `parent` is reconciled in place.
    pub fn mount(&mut self, parent: NodeId, key: u64, node: N) -> Option<NodeId> {
        let id = self.doc.scene.append(parent, key, node)?;
        self.doc.sync(id);
        Some(id)
    }

    /// Unmounts `id` with its subtree and drops it from the index and the
    /// selection. The root cannot be unmounted.
    pub fn unmount(&mut self, id: NodeId) -> bool {
        if id == self.root() || !self.doc.scene.is_alive(id) {
            return false;
        }
        let mut subtree = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            subtree.push(next);
            stack.extend_from_slice(self.doc.scene.children(next));
        }
        self.doc.scene.remove(id);
        for gone in &subtree {
            self.doc.index.remove(gone);
        }
        self.doc.selection.retain(|k| !subtree.contains(k));
        true
    }

    /// Mutates the node behind `id`, then refreshes its index entry.
    pub fn update_node<R>(&mut self, id: NodeId, f: impl FnOnce(&mut N) -> R) -> Option<R> {
        let out = f(self.doc.scene.get_mut(id)?);
        self.doc.sync(id);
        Some(out)
    }

    /// Moves `id` into the z-index group `z` of its parent.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) -> bool {
        self.doc.scene.update_z_index(id, z)
    }

    /// Regenerates the children of `id` on the next frame.
    pub fn request_child_rebuild(&mut self, id: NodeId) -> bool {
        self.doc.scene.request_child_rebuild(id)
    }

    /// Replaces the selection with `id`, or toggles it when `additive`.
    pub fn select(&mut self, id: NodeId, additive: bool) {
        if !self.doc.scene.get(id).is_some_and(N::is_selectable) {
            return;
        }
        let before = self.doc.selection.revision();
        if additive {
            self.doc.selection.toggle(id);
        } else {
            self.doc.selection.select_only(id);
        }
        self.selection_changed(before);
    }

    /// Selects every selectable node intersecting `screen_rect`.
    ///
    /// With `additive` the hits are added to the current selection.
    pub fn select_in_rect(&mut self, screen_rect: Rect, additive: bool) -> usize {
        let hits: Vec<NodeId> = self
            .targets_in(screen_rect)
            .into_iter()
            .filter(|id| self.doc.scene.get(*id).is_some_and(N::is_selectable))
            .collect();
        let before = self.doc.selection.revision();
        let count = hits.len();
        if additive {
            for id in hits {
                self.doc.selection.add(id);
            }
        } else {
            self.doc.selection.replace_with(hits);
        }
        self.selection_changed(before);
        count
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        let before = self.doc.selection.revision();
        self.doc.selection.clear();
        self.selection_changed(before);
    }

    /// The topmost node under `screen`, using committed index geometry.
    #[must_use]
    pub fn target_at(&self, screen: Point) -> Option<NodeId> {
        let world = self.camera.apply_to_point(screen);
        self.doc
            .index
            .query_point(world, |id| self.doc.scene.get(*id))
            .first()
            .copied()
    }

    /// Nodes intersecting `screen_rect`, topmost first.
    #[must_use]
    pub fn targets_in(&self, screen_rect: Rect) -> Vec<NodeId> {
        let world = self.camera.apply_to_rect(screen_rect);
        self.doc.index.query_box(world, |id| self.doc.scene.get(*id))
    }

    /// Handles a pointer press.
    ///
    /// A press on a node selects it (toggles with `additive`) and arms a
    /// drag if it is draggable. A press on empty space clears the selection
    /// unless `additive` and starts panning. A press while another gesture
    /// is active is ignored. Returns the pressed node.
    pub fn pointer_down(&mut self, screen: Point, additive: bool) -> Option<NodeId> {
        if self.gesture != Gesture::Idle {
            tracing::trace!(?screen, "pointer-down ignored, gesture in progress");
            return None;
        }
        let target = self.target_at(screen);
        match target {
            Some(id) => {
                if additive || !self.doc.selection.contains(&id) {
                    self.select(id, additive);
                }
                if self.drag.pointer_down(id, screen, &self.camera, &self.doc) {
                    self.gesture = Gesture::Drag;
                }
            }
            None => {
                if !additive {
                    self.clear_selection();
                }
                self.gesture = Gesture::Pan { last: screen };
            }
        }
        target
    }

    /// Handles pointer motion. Returns `true` if anything moved.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Pan { last } => {
                self.gesture = Gesture::Pan { last: screen };
                let d = screen - last;
                self.update_camera(|camera| camera.move_by(d.x, d.y));
                true
            }
            Gesture::Drag => {
                if !self.drag.pointer_move(screen, &self.camera, &mut self.doc) {
                    return false;
                }
                for id in self.drag.participants() {
                    self.doc.sync(*id);
                }
                true
            }
        }
    }

    /// Handles a pointer release. Returns `true` if a drag was dropped.
    ///
    /// Dropped geometry is committed to the index immediately.
    pub fn pointer_up(&mut self, screen: Point) -> bool {
        let gesture = core::mem::replace(&mut self.gesture, Gesture::Idle);
        if gesture != Gesture::Drag {
            return false;
        }
        let participants = self.drag.participants().to_vec();
        if !self.drag.pointer_up(screen, &self.camera, &mut self.doc) {
            return false;
        }
        self.settle(&participants);
        true
    }

    /// Handles the pointer leaving the surface: any drag is aborted and any
    /// pan ends. Returns `true` if a drag was aborted.
    pub fn pointer_leave(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        let participants = self.drag.participants().to_vec();
        if !self.drag.abort(&mut self.doc) {
            return false;
        }
        self.settle(&participants);
        true
    }

    /// Zooms around `screen` by `notches` wheel steps; positive zooms in.
    pub fn wheel(&mut self, screen: Point, notches: f64) -> bool {
        if notches == 0.0 || !notches.is_finite() {
            return false;
        }
        let factor = self.config.camera.wheel_zoom_step.powf(notches);
        let before = self.camera.scale();
        self.update_camera(|camera| camera.zoom_by(screen, factor));
        self.camera.scale() != before
    }

    /// Changes the camera, then keeps any dragged nodes under the pointer
    /// and schedules a render.
    pub fn update_camera(&mut self, f: impl FnOnce(&mut Camera)) {
        f(&mut self.camera);
        if self.drag.camera_changed(&self.camera, &mut self.doc) {
            for id in self.drag.participants() {
                self.doc.sync(*id);
            }
        }
        self.doc.scene.schedule_update();
    }

    /// Resizes the viewport.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.update_camera(|camera| camera.set_viewport_size(size));
    }

    /// Fits the selected nodes into view. Returns `false` with nothing to fit.
    pub fn zoom_to_selection(&mut self, padding: f64) -> bool {
        let bounds = self
            .doc
            .selection
            .items()
            .iter()
            .filter_map(|id| self.doc.scene.get(*id)?.bounds())
            .reduce(|a, b| a.union(b));
        self.zoom_to(bounds, padding)
    }

    /// Fits every indexed node into view.
    pub fn zoom_to_fit(&mut self, padding: f64) -> bool {
        let bounds = self.doc.index.usable_rect().map(Rect::from);
        self.zoom_to(bounds, padding)
    }

    /// Level of detail at the current scale.
    #[must_use]
    pub fn scale_level(&self) -> ScaleLevel {
        self.camera.scale_level(None)
    }

    /// Commits buffered index changes now.
    pub fn flush(&mut self) -> bool {
        self.doc.index.flush()
    }

    /// Runs one animation frame at host time `now`.
    pub fn frame(&mut self, now: Duration) -> Frame {
        self.ticker.tick(&mut self.doc, now)
    }

    fn zoom_to(&mut self, bounds: Option<Rect>, padding: f64) -> bool {
        let Some(bounds) = bounds else {
            return false;
        };
        self.update_camera(|camera| camera.zoom_to_rect(bounds, padding));
        true
    }

    fn settle(&mut self, participants: &[NodeId]) {
        for id in participants {
            self.doc.sync(*id);
        }
        self.doc.index.flush();
    }

    fn selection_changed(&mut self, before: u64) {
        if self.doc.selection.revision() != before {
            self.doc.scene.schedule_update();
        }
    }
}
