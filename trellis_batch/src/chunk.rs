// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capped member lists with a cached combined path.

use alloc::vec::Vec;

use kurbo::BezPath;

use crate::item::{BatchItem, BatchParams};
use crate::surface::PathStyle;

/// Default cap on members per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Up to `chunk_size` members drawn as one path.
#[derive(Clone, Debug)]
pub struct PathChunk<K> {
    id: u32,
    members: Vec<K>,
    path: BezPath,
    style: Option<PathStyle>,
    visible: usize,
    dirty: bool,
}

impl<K: PartialEq> PathChunk<K> {
    fn new(id: u32) -> Self {
        Self {
            id,
            members: Vec::new(),
            path: BezPath::new(),
            style: None,
            visible: 0,
            dirty: true,
        }
    }

    /// Members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[K] {
        &self.members
    }

    /// Number of members, visible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the chunk has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members that made it into the last combined path.
    #[must_use]
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Returns `true` if the cached path is out of date.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The cached combined path. Stale while [`is_dirty`](Self::is_dirty).
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// The cached style, `None` when no member was visible.
    #[must_use]
    pub fn style(&self) -> Option<&PathStyle> {
        self.style.as_ref()
    }

    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Recombines visible members. Returns `false` if the cache was current.
    pub(crate) fn rebuild<'a, I: BatchItem + 'a>(
        &mut self,
        mut lookup: impl FnMut(&K) -> Option<&'a I>,
    ) -> bool {
        if !self.dirty {
            return false;
        }
        self.path = BezPath::new();
        self.style = None;
        self.visible = 0;
        for key in &self.members {
            let Some(item) = lookup(key).filter(|item| item.is_visible()) else {
                continue;
            };
            if self.style.is_none() {
                self.style = Some(item.style());
            }
            item.append_path(&mut self.path);
            self.visible += 1;
        }
        self.dirty = false;
        true
    }
}

/// All chunks of one `(z_index, style_key)` pair.
#[derive(Clone, Debug)]
pub struct PathGroup<K> {
    params: BatchParams,
    chunks: Vec<PathChunk<K>>,
    next_chunk: u32,
}

impl<K: PartialEq> PathGroup<K> {
    pub(crate) fn new(params: BatchParams) -> Self {
        Self {
            params,
            chunks: Vec::new(),
            next_chunk: 0,
        }
    }

    /// Parameters shared by the members.
    #[must_use]
    pub fn params(&self) -> BatchParams {
        self.params
    }

    /// Z-index of the group.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.params.z_index
    }

    /// Style key of the group.
    #[must_use]
    pub fn style_key(&self) -> u64 {
        self.params.style_key
    }

    /// Chunks in creation order.
    #[must_use]
    pub fn chunks(&self) -> &[PathChunk<K>] {
        &self.chunks
    }

    /// Total members across chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(PathChunk::len).sum()
    }

    /// Returns `true` if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Style of the first chunk that has visible members.
    #[must_use]
    pub fn style(&self) -> Option<&PathStyle> {
        self.chunks.iter().find_map(PathChunk::style)
    }

    /// Adds `key` to the first chunk with room, spilling into a new chunk
    /// when all are full. Returns the chunk id.
    pub(crate) fn insert(&mut self, key: K, cap: usize) -> u32 {
        let chunk = match self.chunks.iter_mut().position(|c| c.len() < cap) {
            Some(i) => &mut self.chunks[i],
            None => {
                let id = self.next_chunk;
                self.next_chunk += 1;
                self.chunks.push(PathChunk::new(id));
                let last = self.chunks.len() - 1;
                &mut self.chunks[last]
            }
        };
        chunk.members.push(key);
        chunk.invalidate();
        chunk.id
    }

    /// Removes `key` from chunk `id`, dropping the chunk once it is empty.
    pub(crate) fn remove(&mut self, id: u32, key: &K) -> bool {
        let Some(i) = self.chunks.iter().position(|c| c.id == id) else {
            return false;
        };
        let chunk = &mut self.chunks[i];
        let before = chunk.members.len();
        chunk.members.retain(|k| k != key);
        if chunk.members.len() == before {
            return false;
        }
        if chunk.members.is_empty() {
            self.chunks.remove(i);
        } else {
            chunk.invalidate();
        }
        true
    }

    pub(crate) fn invalidate(&mut self, id: u32) {
        if let Some(chunk) = self.chunks.iter_mut().find(|c| c.id == id) {
            chunk.invalidate();
        }
    }

    pub(crate) fn invalidate_all(&mut self) {
        for chunk in &mut self.chunks {
            chunk.invalidate();
        }
    }

    pub(crate) fn chunks_mut(&mut self) -> &mut [PathChunk<K>] {
        &mut self.chunks
    }
}
