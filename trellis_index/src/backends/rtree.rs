// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static R-tree packed with Sort-Tile-Recursive bulk loading.
//!
//! The tree is immutable between loads. Each level is built by sorting the
//! level's boxes into vertical slices by center x, sorting each slice by
//! center y, and cutting runs of [`NODE_CAPACITY`] into parent nodes.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Maximum number of entries per node.
pub const NODE_CAPACITY: usize = 9;

#[derive(Clone, Copy, Debug)]
struct Node {
    bbox: Aabb2D,
    leaf: bool,
    start: usize,
    len: usize,
}

/// Bulk-loaded R-tree.
#[derive(Clone, Default)]
pub struct RTree {
    entries: Vec<(usize, Aabb2D)>,
    nodes: Vec<Node>,
    child_ids: Vec<usize>,
    root: Option<usize>,
}

impl core::fmt::Debug for RTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("entries", &self.entries.len())
            .field("nodes", &self.nodes.len())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl RTree {
    /// Number of node levels, `0` when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut cursor = self.root;
        while let Some(n) = cursor {
            height += 1;
            let node = &self.nodes[n];
            cursor = (!node.leaf).then(|| self.child_ids[node.start]);
        }
        height
    }

    fn visit<P, F>(&self, prune: P, mut f: F)
    where
        P: Fn(&Aabb2D) -> bool,
        F: FnMut(usize),
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            let node = self.nodes[n];
            if !prune(&node.bbox) {
                continue;
            }
            let range = node.start..node.start + node.len;
            if node.leaf {
                for (slot, aabb) in &self.entries[range] {
                    if prune(aabb) {
                        f(*slot);
                    }
                }
            } else {
                stack.extend_from_slice(&self.child_ids[range]);
            }
        }
    }
}

impl Backend for RTree {
    fn load(&mut self, entries: &[(usize, Aabb2D)]) {
        self.clear();
        if entries.is_empty() {
            return;
        }
        self.entries.extend_from_slice(entries);
        str_sort(&mut self.entries, |e| e.1);

        let mut level = Vec::with_capacity(self.entries.len().div_ceil(NODE_CAPACITY));
        for (i, chunk) in self.entries.chunks(NODE_CAPACITY).enumerate() {
            self.nodes.push(Node {
                bbox: union_all(chunk.iter().map(|e| e.1)),
                leaf: true,
                start: i * NODE_CAPACITY,
                len: chunk.len(),
            });
            level.push(self.nodes.len() - 1);
        }

        while level.len() > 1 {
            let nodes = &self.nodes;
            str_sort(&mut level, |n| nodes[*n].bbox);
            let mut next = Vec::with_capacity(level.len().div_ceil(NODE_CAPACITY));
            for chunk in level.chunks(NODE_CAPACITY) {
                let start = self.child_ids.len();
                self.child_ids.extend_from_slice(chunk);
                let bbox = union_all(chunk.iter().map(|n| self.nodes[*n].bbox));
                self.nodes.push(Node {
                    bbox,
                    leaf: false,
                    start,
                    len: chunk.len(),
                });
                next.push(self.nodes.len() - 1);
            }
            level = next;
        }
        self.root = level.first().copied();
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.nodes.clear();
        self.child_ids.clear();
        self.root = None;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn visit_point<F: FnMut(usize)>(&self, x: f64, y: f64, f: F) {
        self.visit(|b| b.contains_point(x, y), f);
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, f: F) {
        self.visit(|b| b.intersects(&rect), f);
    }
}

fn union_all(mut boxes: impl Iterator<Item = Aabb2D>) -> Aabb2D {
    let first = boxes.next().unwrap_or(Aabb2D::new(0.0, 0.0, 0.0, 0.0));
    boxes.fold(first, |acc, b| acc.union(&b))
}

/// Orders `items` into STR tiles of [`NODE_CAPACITY`].
fn str_sort<T>(items: &mut [T], bbox: impl Fn(&T) -> Aabb2D) {
    let leaves = items.len().div_ceil(NODE_CAPACITY);
    let mut slices = 1;
    while slices * slices < leaves {
        slices += 1;
    }
    let slice_len = slices * NODE_CAPACITY;
    items.sort_by(|a, b| cmp_f64(bbox(a).center().x, bbox(b).center().x));
    for slice in items.chunks_mut(slice_len) {
        slice.sort_by(|a, b| cmp_f64(bbox(a).center().y, bbox(b).center().y));
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::FlatVec;

    fn grid(n: usize) -> Vec<(usize, Aabb2D)> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss, reason = "small test indices")]
                let (x, y) = ((i % 20) as f64 * 10.0, (i / 20) as f64 * 10.0);
                (i, Aabb2D::new(x, y, x + 8.0, y + 8.0))
            })
            .collect()
    }

    #[test]
    fn empty_tree_has_no_hits() {
        let mut t = RTree::default();
        t.load(&[]);
        assert_eq!(t.height(), 0);
        assert!(t.query_point(0.0, 0.0).is_empty());
    }

    #[test]
    fn packs_into_multiple_levels() {
        let mut t = RTree::default();
        t.load(&grid(250));
        assert_eq!(t.len(), 250);
        // 250 entries -> 28 leaves -> 4 internal -> 1 root.
        assert_eq!(t.height(), 3);
    }

    #[test]
    fn agrees_with_linear_scan() {
        let entries = grid(400);
        let mut t = RTree::default();
        let mut f = FlatVec::default();
        t.load(&entries);
        f.load(&entries);

        for (x, y) in [(4.0, 4.0), (9.0, 9.0), (105.0, 33.0), (-1.0, 0.0), (198.0, 198.0)] {
            let mut a = t.query_point(x, y);
            let mut b = f.query_point(x, y);
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b, "point ({x}, {y})");
        }
        let rect = Aabb2D::new(15.0, 15.0, 62.0, 41.0);
        let mut a = t.query_rect(rect);
        let mut b = f.query_rect(rect);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }
}
