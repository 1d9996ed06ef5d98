// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `HitIndex` flushing, refinement, and backend parity.

use std::time::Duration;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use trellis_index::{Aabb2D, FlatVec, HitIndex, HitShape, HitTestable, RTree, StrokedPolyline};

#[derive(Debug)]
struct Block {
    z: Option<i32>,
}

impl HitTestable for Block {
    fn hit_z_index(&self) -> Option<i32> {
        self.z
    }
}

struct Link {
    stroke: StrokedPolyline,
}

impl HitTestable for Link {
    fn on_hit_box(&self, shape: &HitShape) -> bool {
        match shape {
            HitShape::Point(pt) => self.stroke.hit(*pt, 2.0),
            HitShape::Rect(_) => true,
        }
    }
}

fn block_box(i: usize) -> Aabb2D {
    #[allow(clippy::cast_precision_loss, reason = "small test indices")]
    let (x, y) = ((i % 25) as f64 * 40.0, (i / 25) as f64 * 40.0);
    Aabb2D::new(x, y, x + 30.0, y + 30.0)
}

#[test]
fn forced_flush_makes_bulk_inserts_queryable() {
    let blocks: Vec<Block> = (0..250).map(|i| Block { z: Some(i % 3) }).collect();
    let mut index = HitIndex::<usize>::new();
    for i in 0..249 {
        index.add(i, block_box(i), false);
    }
    assert!(index.is_pending());
    assert_eq!(index.committed_len(), 0);

    // The last insert forces a synchronous flush of everything buffered.
    index.add(249, block_box(249), true);
    assert!(!index.is_pending());
    assert_eq!(index.committed_len(), 250);

    let hits = index.query_point(Point::new(15.0 + 40.0 * 7.0, 15.0 + 40.0 * 3.0), |k| {
        blocks.get(*k)
    });
    assert_eq!(hits, [3 * 25 + 7]);
    let gap = index.query_point(Point::new(35.0, 35.0), |k| blocks.get(*k));
    assert!(gap.is_empty());
}

#[test]
fn debounce_coalesces_a_burst_into_one_commit() {
    let block = Block { z: None };
    let mut index = HitIndex::<u32>::with_flush_window(Duration::from_millis(50));
    index.poll(Duration::from_millis(0));
    index.add(1, block_box(0), false);
    index.poll(Duration::from_millis(30));
    index.add(2, block_box(1), false);

    // The window opened by the first insert does not move.
    assert!(index.poll(Duration::from_millis(50)));
    assert_eq!(index.committed_len(), 2);
    assert!(!index.poll(Duration::from_millis(100)));
    let hits = index.query_box(Rect::new(0.0, 0.0, 80.0, 30.0), |_| Some(&block));
    assert_eq!(hits.len(), 2);
}

#[test]
fn link_boxes_are_refined_by_stroke_distance() {
    let link = Link {
        stroke: StrokedPolyline::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)], 1.0),
    };
    let mut index = HitIndex::<&'static str>::new();
    index.add("link", link.stroke.bounds().unwrap(), true);

    let near = index.query_point(Point::new(50.0, 51.0), |_| Some(&link));
    let far = index.query_point(Point::new(90.0, 10.0), |_| Some(&link));
    assert_eq!(near, ["link"]);
    assert!(far.is_empty());
}

#[test]
fn dyn_resolvers_are_supported() {
    let block = Block { z: Some(2) };
    let link = Link {
        stroke: StrokedPolyline::new(vec![Point::new(0.0, 5.0), Point::new(30.0, 5.0)], 1.0),
    };
    let items: [&dyn HitTestable; 2] = [&block, &link];
    let mut index = HitIndex::<usize>::new();
    index.load([(0, block_box(0)), (1, block_box(0))]);
    let hits = index.query_point(Point::new(10.0, 5.0), |k| items.get(*k).copied());
    assert_eq!(hits, [0, 1]);
}

fn arb_box() -> impl Strategy<Value = Aabb2D> {
    (-500.0_f64..500.0, -500.0_f64..500.0, 0.0_f64..80.0, 0.0_f64..80.0)
        .prop_map(|(x, y, w, h)| Aabb2D::new(x, y, x + w, y + h))
}

proptest! {
    #[test]
    fn rtree_and_flatvec_agree(
        boxes in prop::collection::vec(arb_box(), 0..120),
        probes in prop::collection::vec((-520.0_f64..520.0, -520.0_f64..520.0), 1..20),
    ) {
        let block = Block { z: None };
        let mut tree = HitIndex::<usize, RTree>::default();
        let mut flat = HitIndex::<usize, FlatVec>::default();
        tree.load(boxes.iter().copied().enumerate());
        flat.load(boxes.iter().copied().enumerate());
        for (x, y) in probes {
            let pt = Point::new(x, y);
            let a = tree.query_point(pt, |_| Some(&block));
            let b = flat.query_point(pt, |_| Some(&block));
            prop_assert_eq!(a, b);
        }
    }
}
