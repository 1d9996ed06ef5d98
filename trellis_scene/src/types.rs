// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, dirty flags, and child descriptors.

/// Z-index group a node joins when it is first mounted.
pub const DEFAULT_Z_INDEX: i32 = 1;

/// Identifier for a node in the scene tree.
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On mount, a fresh slot is allocated with generation `1`.
/// - On unmount, the slot is freed; any `NodeId` that pointed to it is now stale.
/// - When a freed slot is reused its generation is incremented, so stale ids
///   never alias a different live node.
///
/// Use [`SceneTree::is_alive`](crate::SceneTree::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node dirty state consumed by the render pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// The node's draw output is stale and should be recomputed on the next pass.
        const NEEDS_RENDER = 0b0000_0001;
        /// The node's child list must be regenerated through
        /// [`Renderable::child_list`](crate::Renderable::child_list) before descending.
        const NEEDS_CHILD_REBUILD = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NEEDS_RENDER
    }
}

/// Description of one child produced by a parent's child-list function.
///
/// `key` identifies the child among its siblings; a key that survives from
/// one child list to the next keeps its [`NodeId`] and stacking position.
#[derive(Clone, Debug)]
pub struct Child<T> {
    /// Parent-local identity of the child.
    pub key: u64,
    /// Payload to mount, or to reconcile into the existing node with the same key.
    pub payload: T,
}

impl<T> Child<T> {
    /// Creates a child descriptor.
    pub fn new(key: u64, payload: T) -> Self {
        Self { key, payload }
    }
}

/// Read-only view of a node handed to [`Renderable::iterate`](crate::Renderable::iterate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeState {
    /// The node being visited.
    pub id: NodeId,
    /// Sequential position of this node in the current render pass.
    pub render_order: u32,
    /// Current z-index group.
    pub z_index: i32,
    /// Depth from the root (the root is `0`).
    pub depth: u32,
    /// Dirty flags as they were before this visit.
    pub flags: DirtyFlags,
}

/// Lifecycle notifications delivered through a node's listener registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEvent {
    /// The node moved from one z-index group to another.
    ZIndexChanged {
        /// Previous group.
        from: i32,
        /// New group.
        to: i32,
    },
    /// The node was unmounted; its registry is cleared right after this event.
    Unmounted,
}

/// Summary of one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Nodes whose `iterate` was called.
    pub visited: u32,
    /// Nodes that vetoed descent into their children.
    pub skipped_subtrees: u32,
    /// Nodes whose child list was regenerated.
    pub rebuilt: u32,
}
