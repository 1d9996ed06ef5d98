// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session state machine.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use trellis_view::Camera;

use crate::modifier::{DragStage, ModifierChain, ModifierContext, SessionInfo};
use crate::state::DragState;

/// Event delivered to each participant of a drag session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
    /// Stage of the session.
    pub stage: DragStage,
    /// Modified displacement from the start, shared by all participants.
    pub diff: Vec2,
    /// Change of `diff` since the previous event of this session.
    pub delta: Vec2,
    /// Current world position of the pointer.
    pub world: Point,
    /// Suggested position for this participant: its origin plus `diff`.
    pub position: Point,
    /// `true` on the end event of an aborted session.
    pub aborted: bool,
}

/// Capability of items that can be moved by dragging.
pub trait Draggable {
    /// Position of the item when the session starts, in world units.
    fn drag_origin(&self) -> Point;

    /// Called once when the session starts.
    fn on_drag_start(&mut self, event: &DragEvent) {
        let _ = event;
    }

    /// Called for every pointer or camera move while dragging.
    fn on_drag(&mut self, event: &DragEvent);

    /// Called once when the session ends, by drop or abort.
    ///
    /// On drop, `event.position` is the committed position.
    fn on_drag_end(&mut self, event: &DragEvent) {
        let _ = event;
    }
}

/// The engine's view of the application.
pub trait DragHost<K> {
    /// Returns `true` if `key` may start or join a drag.
    fn is_draggable(&self, key: &K) -> bool;

    /// Currently selected keys.
    fn selection(&self) -> &[K];

    /// The draggable behind `key`.
    fn draggable(&mut self, key: &K) -> Option<&mut dyn Draggable>;

    /// Fills modifier candidates (anchors, boxes) for a starting session.
    fn fill_modifier_context(&mut self, participants: &[K], ctx: &mut ModifierContext) {
        let _ = (participants, ctx);
    }
}

#[derive(Debug)]
struct Session<K> {
    participants: Vec<K>,
    origins: Vec<Point>,
    state: DragState,
    screen: Point,
    applied: Vec2,
    ctx: ModifierContext,
}

#[derive(Debug)]
enum Phase<K> {
    Idle,
    Pending { target: K, world: Point },
    Dragging(Session<K>),
}

/// Pointer-driven drag sessions over keys of type `K`.
///
/// `Idle → Pending → Dragging → Idle`. A pointer-down on a draggable target
/// enters `Pending`; the first move starts the session. A pointer-up before
/// any move is a click and returns to `Idle` without callbacks. Only one
/// session exists at a time: a pointer-down outside `Idle` is ignored.
///
/// Positions run through the [`ModifierChain`] for the primary target (the
/// pointer-down target); the resulting adjustment is applied to every
/// participant so a multi-selection moves rigidly.
#[derive(Debug)]
pub struct DragEngine<K> {
    phase: Phase<K>,
    chain: ModifierChain,
}

impl<K> Default for DragEngine<K> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            chain: ModifierChain::new(),
        }
    }
}

impl<K: Clone + PartialEq + core::fmt::Debug> DragEngine<K> {
    /// Creates an idle engine with an empty modifier chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle engine with `chain`.
    #[must_use]
    pub fn with_modifiers(chain: ModifierChain) -> Self {
        Self {
            phase: Phase::Idle,
            chain,
        }
    }

    /// The modifier chain, for registering modifiers.
    pub fn modifiers_mut(&mut self) -> &mut ModifierChain {
        &mut self.chain
    }

    /// The modifier chain.
    #[must_use]
    pub fn modifiers(&self) -> &ModifierChain {
        &self.chain
    }

    /// Returns `true` with no pending or active session.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Returns `true` between a qualifying pointer-down and the first move.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Participants of the active session, empty otherwise.
    #[must_use]
    pub fn participants(&self) -> &[K] {
        match &self.phase {
            Phase::Dragging(s) => &s.participants,
            _ => &[],
        }
    }

    /// Modifier side channel of the active session, for visualizing snaps.
    #[must_use]
    pub fn context(&self) -> Option<&ModifierContext> {
        match &self.phase {
            Phase::Dragging(s) => Some(&s.ctx),
            _ => None,
        }
    }

    /// Handles a pointer-down on `target`.
    ///
    /// Returns `true` if the engine is now pending on `target`.
    pub fn pointer_down<H: DragHost<K>>(
        &mut self,
        target: K,
        screen: Point,
        camera: &Camera,
        host: &H,
    ) -> bool {
        if !self.is_idle() {
            tracing::trace!(?target, "pointer-down ignored, drag in progress");
            return false;
        }
        if !host.is_draggable(&target) {
            return false;
        }
        self.phase = Phase::Pending {
            target,
            world: camera.apply_to_point(screen),
        };
        true
    }

    /// Handles a pointer move. Returns `true` if a drag event was emitted.
    pub fn pointer_move<H: DragHost<K>>(
        &mut self,
        screen: Point,
        camera: &Camera,
        host: &mut H,
    ) -> bool {
        if let Phase::Pending { target, world } = &self.phase {
            let session = start_session(target.clone(), *world, screen, camera, host);
            self.phase = Phase::Dragging(session);
        }
        match &mut self.phase {
            Phase::Dragging(session) => {
                session.screen = screen;
                let world = camera.apply_to_point(screen);
                session.state.update(world);
                run(&self.chain, session, DragStage::Dragging, camera, host, |d, e| {
                    d.on_drag(e);
                });
                true
            }
            _ => false,
        }
    }

    /// Handles a pointer-up.
    ///
    /// In `Pending` this was a click: the engine returns to `Idle` silently.
    /// While dragging, the drop position runs through the modifiers and each
    /// participant gets [`Draggable::on_drag_end`]. Returns `true` if a
    /// session ended.
    pub fn pointer_up<H: DragHost<K>>(
        &mut self,
        screen: Point,
        camera: &Camera,
        host: &mut H,
    ) -> bool {
        match core::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Pending { target, .. } => {
                tracing::trace!(?target, "pointer released without moving");
                false
            }
            Phase::Dragging(mut session) => {
                session.screen = screen;
                session.state.update(camera.apply_to_point(screen));
                run(&self.chain, &mut session, DragStage::Drop, camera, host, |d, e| {
                    d.on_drag_end(e);
                });
                tracing::debug!(
                    participants = session.participants.len(),
                    diff = ?session.applied,
                    "drag dropped"
                );
                true
            }
        }
    }

    /// Re-emits the drag after the camera moved under a still pointer.
    ///
    /// The pointer stays at the same screen position, so its world position
    /// changes; this keeps dragged items pinned to the cursor.
    pub fn camera_changed<H: DragHost<K>>(&mut self, camera: &Camera, host: &mut H) -> bool {
        let Phase::Dragging(session) = &mut self.phase else {
            return false;
        };
        session.state.update(camera.apply_to_point(session.screen));
        run(&self.chain, session, DragStage::Dragging, camera, host, |d, e| {
            d.on_drag(e);
        });
        true
    }

    /// Ends any session without a drop, for example when the pointer left
    /// the surface.
    ///
    /// Participants still get [`Draggable::on_drag_end`], with
    /// [`DragEvent::aborted`] set and the last emitted displacement, so they
    /// can release resources.
    pub fn abort<H: DragHost<K>>(&mut self, host: &mut H) -> bool {
        match core::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle | Phase::Pending { .. } => false,
            Phase::Dragging(session) => {
                let world = session.state.current.unwrap_or_default();
                for (key, origin) in session.participants.iter().zip(&session.origins) {
                    if let Some(d) = host.draggable(key) {
                        d.on_drag_end(&DragEvent {
                            stage: DragStage::Drop,
                            diff: session.applied,
                            delta: Vec2::ZERO,
                            world,
                            position: *origin + session.applied,
                            aborted: true,
                        });
                    }
                }
                tracing::debug!(participants = session.participants.len(), "drag aborted");
                true
            }
        }
    }
}

fn start_session<K, H>(
    target: K,
    world: Point,
    screen: Point,
    camera: &Camera,
    host: &mut H,
) -> Session<K>
where
    K: Clone + PartialEq,
    H: DragHost<K>,
{
    let selection = host.selection();
    let participants = if selection.contains(&target) {
        let mut keys = vec![target.clone()];
        keys.extend(
            selection
                .iter()
                .filter(|k| **k != target && host.is_draggable(k))
                .cloned(),
        );
        keys
    } else {
        vec![target]
    };
    let origins: Vec<Point> = participants
        .iter()
        .map(|k| host.draggable(k).map_or(Point::ORIGIN, |d| d.drag_origin()))
        .collect();

    let mut ctx = ModifierContext::new(DragStage::Start, camera.visible_world_rect(), camera.scale());
    host.fill_modifier_context(&participants, &mut ctx);

    let mut state = DragState::default();
    state.start(world);
    for (key, origin) in participants.iter().zip(&origins) {
        if let Some(d) = host.draggable(key) {
            d.on_drag_start(&DragEvent {
                stage: DragStage::Start,
                diff: Vec2::ZERO,
                delta: Vec2::ZERO,
                world,
                position: *origin,
                aborted: false,
            });
        }
    }
    tracing::debug!(participants = participants.len(), "drag started");
    Session {
        participants,
        origins,
        state,
        screen,
        applied: Vec2::ZERO,
        ctx,
    }
}

fn run<K, H>(
    chain: &ModifierChain,
    session: &mut Session<K>,
    stage: DragStage,
    camera: &Camera,
    host: &mut H,
    mut deliver: impl FnMut(&mut dyn Draggable, &DragEvent),
) where
    H: DragHost<K>,
{
    let (Some(start), Some(current)) = (session.state.start, session.state.current) else {
        return;
    };
    let origin = session.origins.first().copied().unwrap_or_default();
    let raw_diff = current - start;
    let info = SessionInfo {
        stage,
        start,
        current,
        diff: raw_diff,
        origin,
        participants: session.participants.len(),
        scale: camera.scale(),
    };
    session
        .ctx
        .begin_run(stage, camera.visible_world_rect(), camera.scale());
    let suggested = chain.apply(origin + raw_diff, &info, &mut session.ctx);
    let diff = suggested - origin;
    let delta = diff - session.applied;
    session.applied = diff;

    for (key, origin) in session.participants.iter().zip(&session.origins) {
        if let Some(d) = host.draggable(key) {
            deliver(
                d,
                &DragEvent {
                    stage,
                    diff,
                    delta,
                    world: current,
                    position: *origin + diff,
                    aborted: false,
                },
            );
        }
    }
}
