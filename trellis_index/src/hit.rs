// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced hit-test registry keyed by owner.

use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;
use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use trellis_scene::Debounce;

use crate::backend::Backend;
use crate::backends::RTree;
use crate::bounds::UsableRect;
use crate::types::Aabb2D;

/// Debounce window applied to buffered inserts unless configured otherwise.
pub const DEFAULT_FLUSH_WINDOW: Duration = Duration::from_millis(50);

/// Z-index assumed for owners that do not report one.
pub const UNTAGGED_Z_INDEX: i32 = -1;

/// The query shape handed to [`HitTestable::on_hit_box`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HitShape {
    /// A world-space point query.
    Point(Point),
    /// A world-space rectangle query.
    Rect(Rect),
}

/// Fine-grained hit refinement for index owners.
pub trait HitTestable {
    /// Called for every owner whose box matched the coarse query.
    ///
    /// Return `false` to reject the candidate, for example when the point is
    /// inside a link's bounding box but far from its stroke.
    fn on_hit_box(&self, shape: &HitShape) -> bool {
        let _ = shape;
        true
    }

    /// Stacking order used to sort results, highest first.
    ///
    /// `None` sorts as [`UNTAGGED_Z_INDEX`].
    fn hit_z_index(&self) -> Option<i32> {
        None
    }
}

#[derive(Clone, Copy, Debug)]
struct Record {
    aabb: Aabb2D,
    seq: u64,
}

/// Hit-test index over owners of type `K`.
///
/// Inserts and geometry changes are buffered and committed in one bulk
/// [`Backend::load`] once the flush window elapses (see [`HitIndex::poll`])
/// or immediately when `force` is passed to [`HitIndex::add`]. Queries only
/// see committed geometry, except that removals take effect immediately.
///
/// ```
/// use kurbo::Point;
/// use trellis_index::{Aabb2D, HitIndex, HitTestable};
///
/// struct Block;
/// impl HitTestable for Block {}
///
/// let block = Block;
/// let mut index = HitIndex::<u32>::new();
/// index.add(7, Aabb2D::new(0.0, 0.0, 10.0, 10.0), false);
/// // Buffered: not visible to queries yet.
/// assert!(index.query_point(Point::new(5.0, 5.0), |_| Some(&block)).is_empty());
/// index.flush();
/// assert_eq!(index.query_point(Point::new(5.0, 5.0), |_| Some(&block)), [7]);
/// ```
pub struct HitIndex<K, B = RTree> {
    records: HashMap<K, Record>,
    slots: Vec<Option<K>>,
    backend: B,
    pending: bool,
    debounce: Debounce,
    last_now: Duration,
    next_seq: u64,
    usable: UsableRect,
}

impl<K, B: Backend + fmt::Debug> fmt::Debug for HitIndex<K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitIndex")
            .field("records", &self.records.len())
            .field("committed", &self.backend.len())
            .field("pending", &self.pending)
            .field("debounce", &self.debounce)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash, B: Backend> Default for HitIndex<K, B> {
    fn default() -> Self {
        Self::with_flush_window(DEFAULT_FLUSH_WINDOW)
    }
}

impl<K: Clone + Eq + Hash> HitIndex<K> {
    /// Creates an empty index on the default R-tree backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Clone + Eq + Hash, B: Backend> HitIndex<K, B> {
    /// Creates an empty index with a custom flush window.
    #[must_use]
    pub fn with_flush_window(window: Duration) -> Self {
        Self {
            records: HashMap::new(),
            slots: Vec::new(),
            backend: B::default(),
            pending: false,
            debounce: Debounce::new(window),
            last_now: Duration::ZERO,
            next_seq: 0,
            usable: UsableRect::default(),
        }
    }

    /// Registers or replaces the box for `owner`.
    ///
    /// The change is committed on the next flush. With `force` the flush
    /// happens synchronously, before this call returns.
    pub fn add(&mut self, owner: K, aabb: Aabb2D, force: bool) {
        let seq = self.next_seq;
        self.next_seq += 1;
        match self.records.insert(owner, Record { aabb, seq }) {
            Some(old) => self.usable.replace(old.aabb, aabb),
            None => self.usable.include(aabb),
        }
        self.pending = true;
        if force {
            self.flush();
        } else {
            self.debounce.request(self.last_now);
        }
    }

    /// Removes `owner`. Takes effect for queries immediately.
    pub fn remove(&mut self, owner: &K) -> bool {
        let Some(old) = self.records.remove(owner) else {
            return false;
        };
        self.usable.exclude(old.aabb);
        for slot in &mut self.slots {
            if slot.as_ref() == Some(owner) {
                *slot = None;
            }
        }
        true
    }

    /// Drops every record and the committed tree.
    pub fn clear(&mut self) {
        self.records.clear();
        self.slots.clear();
        self.backend.clear();
        self.debounce.cancel();
        self.pending = false;
        self.usable = UsableRect::default();
    }

    /// Replaces the whole contents and commits them in one bulk load.
    pub fn load(&mut self, records: impl IntoIterator<Item = (K, Aabb2D)>) {
        self.clear();
        for (owner, aabb) in records {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.usable.include(aabb);
            self.records.insert(owner, Record { aabb, seq });
        }
        self.pending = true;
        self.flush();
    }

    /// Commits buffered changes now. Returns `true` if anything was pending.
    pub fn flush(&mut self) -> bool {
        self.debounce.cancel();
        if !self.pending {
            return false;
        }
        self.commit();
        true
    }

    /// Advances the index clock and commits if the flush window elapsed.
    ///
    /// Call this once per frame with the host timestamp. The timestamp is
    /// also used to open the window for subsequent buffered inserts.
    pub fn poll(&mut self, now: Duration) -> bool {
        self.last_now = now;
        if self.debounce.poll(now) && self.pending {
            self.commit();
            return true;
        }
        false
    }

    /// Returns `true` if buffered changes await a flush.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of registered owners, committed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no owner is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of boxes in the committed tree.
    #[must_use]
    pub fn committed_len(&self) -> usize {
        self.backend.len()
    }

    /// Latest registered box for `owner`, committed or not.
    pub fn get(&self, owner: &K) -> Option<Aabb2D> {
        self.records.get(owner).map(|r| r.aabb)
    }

    /// Union of every finite registered box.
    pub fn usable_rect(&mut self) -> Option<Aabb2D> {
        self.usable.get(self.records.values().map(|r| r.aabb))
    }

    /// Owners whose committed box contains `pt`, refined and z-sorted.
    ///
    /// `resolve` maps an owner to its [`HitTestable`]; owners it cannot
    /// resolve are dropped. Results are sorted by descending
    /// [`HitTestable::hit_z_index`]; ties keep the most recently added first.
    pub fn query_point<'a, H, R>(&self, pt: Point, resolve: R) -> Vec<K>
    where
        H: HitTestable + ?Sized + 'a,
        R: FnMut(&K) -> Option<&'a H>,
    {
        let mut slots = Vec::new();
        self.backend.visit_point(pt.x, pt.y, |s| slots.push(s));
        self.refine(slots, &HitShape::Point(pt), resolve)
    }

    /// Owners whose committed box intersects `rect`, refined and z-sorted.
    pub fn query_box<'a, H, R>(&self, rect: Rect, resolve: R) -> Vec<K>
    where
        H: HitTestable + ?Sized + 'a,
        R: FnMut(&K) -> Option<&'a H>,
    {
        let mut slots = Vec::new();
        self.backend.visit_rect(Aabb2D::from(rect), |s| slots.push(s));
        self.refine(slots, &HitShape::Rect(rect), resolve)
    }

    fn refine<'a, H, R>(&self, mut slots: Vec<usize>, shape: &HitShape, mut resolve: R) -> Vec<K>
    where
        H: HitTestable + ?Sized + 'a,
        R: FnMut(&K) -> Option<&'a H>,
    {
        slots.sort_unstable_by(|a, b| b.cmp(a));
        let mut hits: Vec<(K, i32)> = slots
            .into_iter()
            .filter_map(|s| {
                let owner = self.slots.get(s)?.as_ref()?;
                let item = resolve(owner)?;
                item.on_hit_box(shape).then(|| {
                    let z = item.hit_z_index().unwrap_or(UNTAGGED_Z_INDEX);
                    (owner.clone(), z)
                })
            })
            .collect();
        hits.sort_by_key(|(_, z)| Reverse(*z));
        hits.into_iter().map(|(k, _)| k).collect()
    }

    fn commit(&mut self) {
        let mut live: Vec<(&K, &Record)> = self
            .records
            .iter()
            .filter(|(_, r)| r.aabb.is_finite())
            .collect();
        live.sort_unstable_by_key(|(_, r)| r.seq);
        let entries: Vec<(usize, Aabb2D)> = live
            .iter()
            .enumerate()
            .map(|(i, (_, r))| (i, r.aabb))
            .collect();
        self.slots = live.into_iter().map(|(k, _)| Some(k.clone())).collect();
        self.backend.load(&entries);
        self.pending = false;
        tracing::debug!(
            records = entries.len(),
            skipped = self.records.len() - entries.len(),
            "hit index flushed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::FlatVec;

    struct Tagged(Option<i32>);

    impl HitTestable for Tagged {
        fn hit_z_index(&self) -> Option<i32> {
            self.0
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn unit(x: f64) -> Aabb2D {
        Aabb2D::new(x, 0.0, x + 10.0, 10.0)
    }

    #[test]
    fn buffered_until_window_elapses() {
        let plain = Tagged(None);
        let mut index = HitIndex::<u8>::new();
        index.poll(ms(100));
        index.add(1, unit(0.0), false);
        let pt = Point::new(5.0, 5.0);

        assert!(!index.poll(ms(120)));
        assert!(index.query_point(pt, |_| Some(&plain)).is_empty());
        assert!(index.poll(ms(150)));
        assert_eq!(index.query_point(pt, |_| Some(&plain)), [1]);
        assert!(!index.is_pending());
    }

    #[test]
    fn geometry_changes_wait_for_commit_but_removal_does_not() {
        let plain = Tagged(None);
        let mut index = HitIndex::<u8, FlatVec>::default();
        index.add(1, unit(0.0), true);
        index.add(1, unit(100.0), false);

        assert_eq!(index.query_point(Point::new(5.0, 5.0), |_| Some(&plain)), [1]);
        assert!(index.query_point(Point::new(105.0, 5.0), |_| Some(&plain)).is_empty());
        assert_eq!(index.get(&1), Some(unit(100.0)));

        assert!(index.remove(&1));
        assert!(!index.remove(&1));
        assert!(index.query_point(Point::new(5.0, 5.0), |_| Some(&plain)).is_empty());
    }

    #[test]
    fn results_sort_by_z_with_untagged_last() {
        let items = [Tagged(Some(0)), Tagged(None), Tagged(Some(5)), Tagged(Some(-3))];
        let mut index = HitIndex::<usize>::new();
        index.load((0..items.len()).map(|i| (i, Aabb2D::new(0.0, 0.0, 10.0, 10.0))));
        let hits = index.query_box(Rect::new(1.0, 1.0, 2.0, 2.0), |k| items.get(*k));
        assert_eq!(hits, [2, 0, 1, 3]);
    }

    #[test]
    fn refinement_rejects_and_unresolved_are_dropped() {
        struct Never;
        impl HitTestable for Never {
            fn on_hit_box(&self, _: &HitShape) -> bool {
                false
            }
        }
        let never = Never;
        let mut index = HitIndex::<u8>::new();
        index.load([(1, unit(0.0)), (2, unit(0.0))]);
        let pt = Point::new(1.0, 1.0);
        assert!(index.query_point(pt, |_| Some(&never)).is_empty());
        let plain = Tagged(None);
        let hits = index.query_point(pt, |k| (*k == 2).then_some(&plain));
        assert_eq!(hits, [2]);
    }

    #[test]
    fn non_finite_boxes_are_never_loaded() {
        let mut index = HitIndex::<u8>::new();
        index.load([(1, unit(0.0)), (2, Aabb2D::new(f64::NAN, 0.0, 1.0, 1.0))]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.committed_len(), 1);
        assert_eq!(index.usable_rect(), Some(unit(0.0)));
    }

    #[test]
    fn clear_drops_pending_work() {
        let mut index = HitIndex::<u8>::new();
        index.add(1, unit(0.0), false);
        index.clear();
        assert!(index.is_empty());
        assert!(!index.flush());
        assert!(!index.poll(ms(1000)));
    }
}
