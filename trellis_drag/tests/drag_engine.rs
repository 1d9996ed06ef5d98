// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `DragEngine` state machine and its modifier pipeline.

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size, Vec2};
use proptest::prelude::*;
use trellis_drag::{
    DragEngine, DragEvent, DragHost, DragStage, Draggable, GridSnap, ModifierContext, PointMagnet,
};
use trellis_view::Camera;

#[derive(Debug, Default)]
struct Item {
    pos: Point,
    starts: u32,
    moves: Vec<DragEvent>,
    ends: Vec<DragEvent>,
}

impl Draggable for Item {
    fn drag_origin(&self) -> Point {
        self.pos
    }

    fn on_drag_start(&mut self, _: &DragEvent) {
        self.starts += 1;
    }

    fn on_drag(&mut self, event: &DragEvent) {
        self.moves.push(*event);
    }

    fn on_drag_end(&mut self, event: &DragEvent) {
        if !event.aborted {
            self.pos = event.position;
        }
        self.ends.push(*event);
    }
}

#[derive(Debug, Default)]
struct Board {
    items: BTreeMap<u32, Item>,
    selection: Vec<u32>,
    locked: Vec<u32>,
    anchors: Vec<Point>,
}

impl Board {
    fn with_items(items: &[(u32, f64, f64)]) -> Self {
        let mut board = Self::default();
        for &(k, x, y) in items {
            board.items.insert(
                k,
                Item {
                    pos: Point::new(x, y),
                    ..Item::default()
                },
            );
        }
        board
    }

    fn item(&self, k: u32) -> &Item {
        &self.items[&k]
    }
}

impl DragHost<u32> for Board {
    fn is_draggable(&self, key: &u32) -> bool {
        self.items.contains_key(key) && !self.locked.contains(key)
    }

    fn selection(&self) -> &[u32] {
        &self.selection
    }

    fn draggable(&mut self, key: &u32) -> Option<&mut dyn Draggable> {
        self.items.get_mut(key).map(|i| i as &mut dyn Draggable)
    }

    fn fill_modifier_context(&mut self, _: &[u32], ctx: &mut ModifierContext) {
        ctx.anchors.extend_from_slice(&self.anchors);
    }
}

fn camera() -> Camera {
    Camera::new(Size::new(1000.0, 1000.0))
}

#[test]
fn grid_snap_commits_drop_position() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 40.0, 40.0)]);
    let mut drag = DragEngine::new();
    drag.modifiers_mut().push(GridSnap::on_drop(20.0));

    assert!(drag.pointer_down(1, Point::new(50.0, 50.0), &cam, &board));
    assert!(drag.pointer_move(Point::new(90.0, 120.0), &cam, &mut board));
    assert!(drag.pointer_move(Point::new(117.0, 203.0), &cam, &mut board));
    let last = *board.item(1).moves.last().unwrap();
    assert_eq!(last.position, Point::new(107.0, 193.0));
    assert_eq!(last.stage, DragStage::Dragging);

    assert!(drag.pointer_up(Point::new(117.0, 203.0), &cam, &mut board));
    assert_eq!(board.item(1).pos, Point::new(100.0, 200.0));
    assert_eq!(board.item(1).ends.len(), 1);
    assert_eq!(board.item(1).ends[0].stage, DragStage::Drop);
    assert!(drag.is_idle());
}

#[test]
fn second_pointer_down_is_ignored() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0), (2, 500.0, 500.0)]);
    let mut drag = DragEngine::new();

    assert!(drag.pointer_down(1, Point::new(5.0, 5.0), &cam, &board));
    assert!(!drag.pointer_down(2, Point::new(505.0, 505.0), &cam, &board));
    assert!(drag.is_pending());

    drag.pointer_move(Point::new(15.0, 5.0), &cam, &mut board);
    assert!(!drag.pointer_down(2, Point::new(505.0, 505.0), &cam, &board));
    assert_eq!(drag.participants(), &[1]);
    assert_eq!(board.item(2).starts, 0);
}

#[test]
fn click_without_move_fires_nothing() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0)]);
    let mut drag = DragEngine::new();

    drag.pointer_down(1, Point::new(5.0, 5.0), &cam, &board);
    assert!(!drag.pointer_up(Point::new(5.0, 5.0), &cam, &mut board));
    assert!(drag.is_idle());
    let item = board.item(1);
    assert_eq!(item.starts, 0);
    assert!(item.moves.is_empty());
    assert!(item.ends.is_empty());
}

#[test]
fn non_draggable_targets_do_not_arm() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0)]);
    board.locked.push(1);
    let mut drag = DragEngine::new();
    assert!(!drag.pointer_down(1, Point::ORIGIN, &cam, &board));
    assert!(!drag.pointer_move(Point::new(10.0, 0.0), &cam, &mut board));
    assert!(!drag.pointer_down(9, Point::ORIGIN, &cam, &board));
}

#[test]
fn selected_target_drags_the_draggable_selection() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0), (2, 100.0, 0.0), (3, 200.0, 0.0), (4, 0.0, 300.0)]);
    board.selection = vec![2, 1, 3];
    board.locked.push(3);
    let mut drag = DragEngine::new();

    drag.pointer_down(1, Point::new(5.0, 5.0), &cam, &board);
    drag.pointer_move(Point::new(15.0, 25.0), &cam, &mut board);
    assert_eq!(drag.participants(), &[1, 2]);
    assert_eq!(board.item(2).moves[0].position, Point::new(110.0, 20.0));
    assert_eq!(board.item(2).starts, 1);
    assert_eq!(board.item(3).starts, 0);
    assert_eq!(board.item(4).starts, 0);
    drag.pointer_up(Point::new(15.0, 25.0), &cam, &mut board);

    // An unselected target drags alone.
    drag.pointer_down(4, Point::new(5.0, 305.0), &cam, &board);
    drag.pointer_move(Point::new(6.0, 306.0), &cam, &mut board);
    assert_eq!(drag.participants(), &[4]);
}

#[test]
fn deltas_are_frame_to_frame() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0)]);
    let mut drag = DragEngine::new();
    drag.pointer_down(1, Point::ORIGIN, &cam, &board);
    drag.pointer_move(Point::new(10.0, 0.0), &cam, &mut board);
    drag.pointer_move(Point::new(25.0, 5.0), &cam, &mut board);
    let moves = &board.item(1).moves;
    assert_eq!(moves[1].diff, Vec2::new(25.0, 5.0));
    assert_eq!(moves[1].delta, Vec2::new(15.0, 5.0));
}

#[test]
fn camera_motion_keeps_item_under_cursor() {
    let mut cam = camera();
    let mut board = Board::with_items(&[(1, 100.0, 100.0)]);
    let mut drag = DragEngine::new();

    drag.pointer_down(1, Point::new(110.0, 110.0), &cam, &board);
    drag.pointer_move(Point::new(120.0, 110.0), &cam, &mut board);
    cam.move_by(-50.0, 0.0);
    assert!(drag.camera_changed(&cam, &mut board));

    let last = *board.item(1).moves.last().unwrap();
    // The pointer now sits over world x = 170.
    assert_eq!(last.world, Point::new(170.0, 110.0));
    assert_eq!(last.position, Point::new(160.0, 100.0));
    assert_eq!(last.delta, Vec2::new(50.0, 0.0));
}

#[test]
fn abort_runs_the_end_path_once() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0)]);
    let mut drag = DragEngine::new();

    drag.pointer_down(1, Point::ORIGIN, &cam, &board);
    assert!(!drag.abort(&mut board), "nothing to end while pending");
    assert!(drag.is_idle());

    drag.pointer_down(1, Point::ORIGIN, &cam, &board);
    drag.pointer_move(Point::new(30.0, 0.0), &cam, &mut board);
    assert!(drag.abort(&mut board));
    assert!(!drag.abort(&mut board));
    assert!(!drag.pointer_up(Point::new(30.0, 0.0), &cam, &mut board));

    let item = board.item(1);
    assert_eq!(item.starts, 1);
    assert_eq!(item.ends.len(), 1);
    assert!(item.ends[0].aborted);
    assert_eq!(item.pos, Point::ORIGIN);
}

#[test]
fn magnet_target_is_visible_in_context() {
    let cam = camera();
    let mut board = Board::with_items(&[(1, 0.0, 0.0)]);
    board.anchors = vec![Point::new(200.0, 200.0)];
    let mut drag = DragEngine::new();
    drag.modifiers_mut().push(PointMagnet::new(12.0));
    drag.modifiers_mut().push(GridSnap::always(25.0));

    drag.pointer_down(1, Point::ORIGIN, &cam, &board);
    drag.pointer_move(Point::new(195.0, 192.0), &cam, &mut board);
    // The magnet runs first, so the grid sees the anchor and keeps it.
    assert_eq!(board.item(1).moves[0].position, Point::new(200.0, 200.0));
    let ctx = drag.context().unwrap();
    assert_eq!(ctx.targets_of(PointMagnet::NAME).count(), 1);
    assert_eq!(ctx.viewport, Rect::new(0.0, 0.0, 1000.0, 1000.0));
}

proptest! {
    #[test]
    fn grid_drop_moves_the_selection_rigidly(
        ox in -500_i32..500,
        oy in -500_i32..500,
        dx in -400_i32..400,
        dy in -400_i32..400,
    ) {
        let cam = camera();
        let (ox, oy) = (f64::from(ox), f64::from(oy));
        let mut board = Board::with_items(&[(1, ox, oy), (2, ox + 35.0, oy - 15.0)]);
        board.selection = vec![1, 2];
        let mut drag = DragEngine::new();
        drag.modifiers_mut().push(GridSnap::on_drop(20.0));

        let down = Point::new(600.0, 600.0);
        let up = down + Vec2::new(f64::from(dx), f64::from(dy));
        prop_assert!(drag.pointer_down(1, down, &cam, &board));
        prop_assert!(drag.pointer_move(up, &cam, &mut board));
        prop_assert!(drag.pointer_up(up, &cam, &mut board));

        let a = board.item(1).pos;
        let b = board.item(2).pos;
        prop_assert_eq!(a.x.rem_euclid(20.0), 0.0);
        prop_assert_eq!(a.y.rem_euclid(20.0), 0.0);
        prop_assert_eq!(b - a, Vec2::new(35.0, -15.0));
    }
}
