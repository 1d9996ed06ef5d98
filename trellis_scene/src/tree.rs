// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, z-grouping, traversal, scheduling.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::groups::ZGroups;
use crate::listeners::{Listeners, Subscription};
use crate::types::{Child, DEFAULT_Z_INDEX, DirtyFlags, NodeEvent, NodeId, NodeState, RenderStats};

/// Behavior a scene node payload plugs into the render pass.
///
/// Every method has a default so simple payloads only implement what they need.
pub trait Renderable {
    /// Called once per render pass when the node is reached.
    ///
    /// Return `false` to skip this node's children for the rest of the pass,
    /// for example when the node is outside the visible region.
    fn iterate(&mut self, state: &NodeState) -> bool {
        let _ = state;
        true
    }

    /// Produces the node's child list when [`DirtyFlags::NEEDS_CHILD_REBUILD`] is set.
    ///
    /// Returning `None` leaves the current children untouched.
    fn child_list(&mut self) -> Option<Vec<Child<Self>>>
    where
        Self: Sized,
    {
        None
    }

    /// Folds a fresh descriptor payload into the mounted one.
    ///
    /// The default replaces the payload wholesale.
    fn reconcile(&mut self, next: Self)
    where
        Self: Sized,
    {
        *self = next;
    }

    /// Teardown hook, called after the node's listeners have been notified and cleared.
    fn unmounted(&mut self) {}
}

#[derive(Debug)]
struct Node<T> {
    generation: u32,
    parent: Option<NodeId>,
    key: u64,
    z_index: i32,
    render_order: u32,
    flags: DirtyFlags,
    children: ZGroups,
    by_key: HashMap<u64, NodeId>,
    listeners: Listeners<NodeEvent>,
    payload: T,
}

impl<T> Node<T> {
    fn new(generation: u32, parent: Option<NodeId>, key: u64, payload: T) -> Self {
        Self {
            generation,
            parent,
            key,
            z_index: DEFAULT_Z_INDEX,
            render_order: 0,
            flags: DirtyFlags::default(),
            children: ZGroups::default(),
            by_key: HashMap::new(),
            listeners: Listeners::new(),
            payload,
        }
    }
}

/// Retained scene tree with z-index grouped children.
///
/// The tree always has a root, created by [`SceneTree::new`]. Children are
/// identified among their siblings by a `u64` key; children are walked in
/// ascending z-index, insertion order within a z-index, so higher z-indices
/// receive higher render orders and draw on top.
///
/// Mutations mark the tree for an update; [`SceneTree::tick`] turns any
/// number of such requests into a single render pass.
pub struct SceneTree<T> {
    nodes: Vec<Option<Node<T>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    update_requested: bool,
    passes: u64,
}

impl<T> core::fmt::Debug for SceneTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("SceneTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("update_requested", &self.update_requested)
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

impl<T: Renderable> SceneTree<T> {
    /// Creates a tree whose root carries `root`.
    pub fn new(root: T) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            update_requested: true,
            passes: 0,
        };
        tree.root = tree.alloc(None, 0, root);
        tree
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Mounts `payload` under `parent` with the sibling key `key`.
    ///
    /// If `parent` already has a child with `key`, the payload is reconciled
    /// into that child, which keeps its id and stacking position. Returns
    /// `None` if `parent` is stale.
    pub fn append(&mut self, parent: NodeId, key: u64, payload: T) -> Option<NodeId> {
        let existing = self.node_opt(parent)?.by_key.get(&key).copied();
        if let Some(existing) = existing {
            let node = self.node_mut(existing);
            node.payload.reconcile(payload);
            node.flags |= DirtyFlags::NEEDS_RENDER;
            self.schedule_update();
            return Some(existing);
        }
        let id = self.alloc(Some(parent), key, payload);
        let p = self.node_mut(parent);
        p.children.push(id, DEFAULT_Z_INDEX);
        p.by_key.insert(key, id);
        self.schedule_update();
        Some(id)
    }

    /// Unmounts `id` and its whole subtree.
    ///
    /// Stale ids and the root are ignored. Returns `true` if anything was removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.is_alive(id) {
            return false;
        }
        let (parent, key) = {
            let n = self.node(id);
            (n.parent, n.key)
        };
        if let Some(parent) = parent {
            let p = self.node_mut(parent);
            p.children.remove(id);
            p.by_key.remove(&key);
        }
        self.unmount(id);
        self.schedule_update();
        true
    }

    /// Moves `id` into the z-index group `z`, at the end of that group.
    ///
    /// This is a regroup, not a remount: the node keeps its id, payload and
    /// subtree. Returns `false` for stale ids or an unchanged value.
    pub fn update_z_index(&mut self, id: NodeId, z: i32) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.z_index == z {
            return false;
        }
        let from = node.z_index;
        node.z_index = z;
        node.flags |= DirtyFlags::NEEDS_RENDER;
        node.listeners.emit(&NodeEvent::ZIndexChanged { from, to: z });
        if let Some(parent) = node.parent {
            self.node_mut(parent).children.regroup(id, z);
        }
        self.schedule_update();
        true
    }

    /// Reconciles the children of `parent` against a fresh child list.
    ///
    /// Surviving keys are reconciled in place, new keys are mounted at the end
    /// of the default group in list order, and children whose key is absent are
    /// unmounted. Returns `false` if `parent` is stale.
    pub fn set_children<I>(&mut self, parent: NodeId, children: I) -> bool
    where
        I: IntoIterator<Item = Child<T>>,
    {
        if !self.is_alive(parent) {
            return false;
        }
        let mut keep = HashSet::new();
        for Child { key, payload } in children {
            keep.insert(key);
            self.append(parent, key, payload);
        }
        let current = self.node_mut(parent).children.ordered().to_vec();
        let stale: Vec<NodeId> = current
            .into_iter()
            .filter(|c| self.key_of(*c).is_some_and(|k| !keep.contains(&k)))
            .collect();
        for id in stale {
            self.remove(id);
        }
        true
    }

    /// Flags `id` so its child list is regenerated on the next render pass.
    pub fn request_child_rebuild(&mut self, id: NodeId) -> bool {
        self.mark_dirty(id, DirtyFlags::NEEDS_CHILD_REBUILD)
    }

    /// Adds `flags` to a node and schedules an update.
    pub fn mark_dirty(&mut self, id: NodeId, flags: DirtyFlags) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        node.flags |= flags;
        self.schedule_update();
        true
    }

    /// Requests a render pass on the next [`SceneTree::tick`]. Idempotent.
    pub fn schedule_update(&mut self) {
        if self.update_requested {
            tracing::trace!("scene update already scheduled");
        }
        self.update_requested = true;
    }

    /// Returns `true` if a render pass is pending.
    #[must_use]
    pub fn is_update_scheduled(&self) -> bool {
        self.update_requested
    }

    /// Number of render passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Runs a render pass if one was scheduled since the last tick.
    pub fn tick(&mut self) -> Option<RenderStats> {
        if !self.update_requested {
            return None;
        }
        let stats = self.render_pass();
        // Child lists rebuilt during the pass were visited by it.
        self.update_requested = false;
        Some(stats)
    }

    /// Runs a render pass unconditionally.
    ///
    /// Each visited node first regenerates its children if flagged, then gets
    /// its render order and a call to [`Renderable::iterate`], then has
    /// [`DirtyFlags::NEEDS_RENDER`] cleared.
    pub fn render_pass(&mut self) -> RenderStats {
        let mut stats = RenderStats::default();
        let mut order = 0_u32;
        self.walk(|tree, id, depth| {
            if tree.node(id).flags.contains(DirtyFlags::NEEDS_CHILD_REBUILD) {
                let node = tree.node_mut(id);
                node.flags.remove(DirtyFlags::NEEDS_CHILD_REBUILD);
                if let Some(list) = node.payload.child_list() {
                    tree.set_children(id, list);
                    stats.rebuilt += 1;
                }
            }
            let node = tree.node_mut(id);
            node.render_order = order;
            order += 1;
            let state = NodeState {
                id,
                render_order: node.render_order,
                z_index: node.z_index,
                depth,
                flags: node.flags,
            };
            let descend = node.payload.iterate(&state);
            node.flags.remove(DirtyFlags::NEEDS_RENDER);
            stats.visited += 1;
            if !descend {
                stats.skipped_subtrees += 1;
            }
            descend
        });
        self.passes += 1;
        tracing::debug!(
            visited = stats.visited,
            skipped = stats.skipped_subtrees,
            rebuilt = stats.rebuilt,
            "scene render pass"
        );
        stats
    }

    /// Walks the tree top-down in z order.
    ///
    /// `visit` receives the tree itself and may mutate it; it returns whether
    /// to descend into the node's children. Each node's children are
    /// snapshotted after its visit and stale ids are skipped when popped, so
    /// mutation during the walk never visits a node twice or skips a live
    /// node that was present in its parent's snapshot.
    pub fn traverse<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Self, NodeId) -> bool,
    {
        self.walk(|tree, id, _| visit(tree, id));
    }

    fn walk<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Self, NodeId, u32) -> bool,
    {
        let mut stack = vec![(self.root, 0_u32)];
        while let Some((id, depth)) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            if !visit(self, id, depth) {
                continue;
            }
            let Some(node) = self.node_opt_mut(id) else {
                continue;
            };
            stack.extend(node.children.ordered().iter().rev().map(|c| (*c, depth + 1)));
        }
    }

    /// Subscribes to lifecycle events of `id`.
    pub fn subscribe(
        &mut self,
        id: NodeId,
        f: impl FnMut(&NodeEvent) + 'static,
    ) -> Option<Subscription> {
        Some(self.node_opt_mut(id)?.listeners.subscribe(f))
    }

    /// Removes a lifecycle subscription.
    pub fn unsubscribe(&mut self, id: NodeId, sub: Subscription) -> bool {
        self.node_opt_mut(id)
            .is_some_and(|n| n.listeners.unsubscribe(sub))
    }
}

impl<T> SceneTree<T> {
    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Always `false`: the root is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Payload of a live node.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id).map(|n| &n.payload)
    }

    /// Mutable payload of a live node. Does not mark it dirty.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id).map(|n| &mut n.payload)
    }

    /// Z-index group of a live node.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.z_index)
    }

    /// Render order assigned to `id` by the last pass that reached it.
    pub fn render_order(&self, id: NodeId) -> Option<u32> {
        self.node_opt(id).map(|n| n.render_order)
    }

    /// Dirty flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<DirtyFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Parent of a live node, `None` for the root or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Sibling key of a live node.
    pub fn key_of(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).map(|n| n.key)
    }

    /// Looks up a child of `parent` by key.
    pub fn child_by_key(&self, parent: NodeId, key: u64) -> Option<NodeId> {
        self.node_opt(parent)?.by_key.get(&key).copied()
    }

    /// Children of `id` in traversal order; empty for stale ids.
    ///
    /// Takes `&mut self` because the flattened order is cached lazily.
    pub fn children(&mut self, id: NodeId) -> &[NodeId] {
        match self.node_opt_mut(id) {
            Some(n) => n.children.ordered(),
            None => &[],
        }
    }

    /// Number of children of `id`.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node_opt(id).map_or(0, |n| n.children.len())
    }

    fn alloc(&mut self, parent: Option<NodeId>, key: u64, payload: T) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, parent, key, payload));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, parent, key, payload)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    fn unmount(&mut self, id: NodeId)
    where
        T: Renderable,
    {
        let children = self.node_mut(id).children.clear();
        for child in children {
            self.unmount(child);
        }
        if let Some(mut node) = self.nodes[id.idx()].take() {
            node.listeners.emit(&NodeEvent::Unmounted);
            node.listeners.clear();
            node.payload.unmounted();
            self.free_list.push(id.idx());
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}
