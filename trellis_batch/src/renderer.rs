// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group bookkeeping and the per-frame draw.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::chunk::{DEFAULT_CHUNK_SIZE, PathGroup};
use crate::item::{BatchItem, BatchParams};
use crate::surface::DrawSurface;

/// Counters from one [`BatchRenderer::render`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Groups that issued draw calls.
    pub groups: usize,
    /// Chunks drawn.
    pub chunks: usize,
    /// Chunks whose combined path was rebuilt.
    pub rebuilt: usize,
    /// Fill and stroke calls issued, not counting post-draw hooks.
    pub draw_calls: usize,
}

#[derive(Debug)]
struct Entry<I> {
    item: I,
    params: BatchParams,
    chunk: u32,
}

/// Draws many small paths with few draw calls.
///
/// Items sharing [`BatchParams`] form a [`PathGroup`] of chunks holding at
/// most [`chunk_size`](Self::chunk_size) members each. A chunk's combined
/// path is rebuilt only after it was invalidated by a membership change or
/// [`mark_dirty`](Self::mark_dirty).
#[derive(Debug)]
pub struct BatchRenderer<K, I> {
    items: HashMap<K, Entry<I>>,
    /// Sorted by descending z-index, creation order among equals.
    groups: Vec<PathGroup<K>>,
    chunk_size: usize,
}

impl<K, I> Default for BatchRenderer<K, I> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            groups: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl<K, I> BatchRenderer<K, I>
where
    K: Clone + Eq + Hash + Debug,
    I: BatchItem,
{
    /// Creates a renderer with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer with chunks of at most `chunk_size` members.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            chunk_size: chunk_size.max(1),
            ..Self::default()
        }
    }

    /// Maximum members per chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    /// Registers `item` under `key`.
    ///
    /// Adding an existing key replaces its item and returns the old one.
    pub fn add(&mut self, key: K, item: I, params: BatchParams) -> Option<I> {
        if let Some(entry) = self.items.get_mut(&key) {
            let old = core::mem::replace(&mut entry.item, item);
            self.update(&key, params);
            return Some(old);
        }
        let cap = self.chunk_size;
        let chunk = self.group_mut(params).insert(key.clone(), cap);
        self.items.insert(
            key,
            Entry {
                item,
                params,
                chunk,
            },
        );
        None
    }

    /// Moves `key` to the group for `params`.
    ///
    /// Unchanged parameters only mark the item dirty. Returns `false` for
    /// unknown keys.
    pub fn update(&mut self, key: &K, params: BatchParams) -> bool {
        let Some(entry) = self.items.get_mut(key) else {
            return false;
        };
        let (old, chunk) = (entry.params, entry.chunk);
        if old == params {
            invalidate(&mut self.groups, old, chunk);
            return true;
        }
        detach(&mut self.groups, old, chunk, key);
        let cap = self.chunk_size;
        let chunk = self.group_mut(params).insert(key.clone(), cap);
        if let Some(entry) = self.items.get_mut(key) {
            entry.params = params;
            entry.chunk = chunk;
        }
        true
    }

    /// Removes `key` and returns its item.
    pub fn delete(&mut self, key: &K) -> Option<I> {
        let entry = self.items.remove(key)?;
        detach(&mut self.groups, entry.params, entry.chunk, key);
        Some(entry.item)
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.groups.clear();
    }

    /// Invalidates the chunk holding `key`.
    ///
    /// Call this after the item's geometry or visibility changed.
    pub fn mark_dirty(&mut self, key: &K) -> bool {
        let Some(entry) = self.items.get(key) else {
            return false;
        };
        invalidate(&mut self.groups, entry.params, entry.chunk);
        true
    }

    /// Invalidates every chunk, for example after culling bounds moved.
    pub fn mark_all_dirty(&mut self) {
        for group in &mut self.groups {
            group.invalidate_all();
        }
    }

    /// The item behind `key`.
    #[must_use]
    pub fn item(&self, key: &K) -> Option<&I> {
        self.items.get(key).map(|e| &e.item)
    }

    /// Mutable access to the item behind `key`; marks it dirty.
    pub fn item_mut(&mut self, key: &K) -> Option<&mut I> {
        let entry = self.items.get_mut(key)?;
        invalidate(&mut self.groups, entry.params, entry.chunk);
        Some(&mut entry.item)
    }

    /// Parameters `key` was added with.
    #[must_use]
    pub fn params(&self, key: &K) -> Option<BatchParams> {
        self.items.get(key).map(|e| e.params)
    }

    /// Groups in draw order: descending z-index, creation order among equals.
    #[must_use]
    pub fn ordered_groups(&self) -> &[PathGroup<K>] {
        &self.groups
    }

    /// Rebuilds every invalidated chunk. Returns how many were rebuilt.
    ///
    /// [`render`](Self::render) does this itself; calling it earlier moves
    /// the work out of the draw.
    pub fn prepare(&mut self) -> usize {
        let items = &self.items;
        let mut rebuilt = 0;
        for group in &mut self.groups {
            for chunk in group.chunks_mut() {
                if chunk.rebuild(|k| items.get(k).map(|e| &e.item)) {
                    rebuilt += 1;
                }
            }
        }
        if rebuilt > 0 {
            tracing::trace!(rebuilt, "rebuilt batch chunks");
        }
        rebuilt
    }

    /// Draws every group onto `surface`.
    ///
    /// Each group sets its style once, draws its chunks' combined paths,
    /// then runs [`BatchItem::post_draw`] for its visible members.
    pub fn render<S: DrawSurface>(&mut self, surface: &mut S) -> BatchStats {
        let mut stats = BatchStats {
            rebuilt: self.prepare(),
            ..BatchStats::default()
        };
        for group in &self.groups {
            let Some(style) = group.style().filter(|s| !s.is_empty()) else {
                continue;
            };
            surface.set_style(style);
            stats.groups += 1;
            for chunk in group.chunks() {
                if chunk.visible() == 0 {
                    continue;
                }
                stats.chunks += 1;
                if style.fill.is_some() {
                    surface.fill_path(chunk.path());
                    stats.draw_calls += 1;
                }
                if style.stroke.is_some() {
                    surface.stroke_path(chunk.path());
                    stats.draw_calls += 1;
                }
            }
            for key in group.chunks().iter().flat_map(|c| c.members()) {
                if let Some(entry) = self.items.get(key)
                    && entry.item.is_visible()
                {
                    entry.item.post_draw(surface);
                }
            }
        }
        tracing::trace!(?stats, "batch render");
        stats
    }

    fn group_mut(&mut self, params: BatchParams) -> &mut PathGroup<K> {
        let i = match self.groups.iter().position(|g| g.params() == params) {
            Some(i) => i,
            None => {
                let at = self
                    .groups
                    .partition_point(|g| g.z_index() >= params.z_index);
                self.groups.insert(at, PathGroup::new(params));
                at
            }
        };
        &mut self.groups[i]
    }
}

fn invalidate<K: PartialEq>(groups: &mut [PathGroup<K>], params: BatchParams, chunk: u32) {
    if let Some(group) = groups.iter_mut().find(|g| g.params() == params) {
        group.invalidate(chunk);
    }
}

fn detach<K: PartialEq>(groups: &mut Vec<PathGroup<K>>, params: BatchParams, chunk: u32, key: &K) {
    let Some(i) = groups.iter().position(|g| g.params() == params) else {
        return;
    };
    groups[i].remove(chunk, key);
    if groups[i].is_empty() {
        groups.remove(i);
    }
}
