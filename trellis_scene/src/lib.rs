// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a retained, z-grouped scene tree for diagram canvases.
//!
//! The scene tree holds the structure of an interactive canvas: the graph
//! layers, the nodes and edges in them, the ports on each node. It knows
//! nothing about geometry or drawing; a payload type implementing
//! [`Renderable`] decides what a visit means.
//!
//! - Children are grouped by z-index. Traversal walks groups in ascending
//!   z-index and insertion order within a group, so later visits draw on top.
//! - Every mutation marks the tree for an update. [`SceneTree::tick`] turns
//!   any number of requests into one render pass that assigns sequential
//!   render orders and clears [`DirtyFlags::NEEDS_RENDER`].
//! - [`SceneTree::traverse`] tolerates mutation from inside the visitor.
//!   Each node's children are snapshotted when the node is expanded and stale
//!   ids are skipped, so a node is visited at most once per walk.
//! - Parents can regenerate their children from a descriptor list through
//!   [`Renderable::child_list`] and [`SceneTree::set_children`], reconciled
//!   by parent-local keys.
//!
//! The crate also carries the scheduling primitives shared by the rest of
//! the workspace:
//!
//! - [`Ticker`]: a frame ticker with [`Priority`] buckets driven by host time.
//! - [`Debounce`]: a coalescing window over host-supplied timestamps.
//! - [`Listeners`]: explicit subscribe/unsubscribe callback registries.
//!
//! ## Example
//!
//! ```
//! use trellis_scene::{Renderable, NodeState, SceneTree};
//!
//! #[derive(Default)]
//! struct Shape {
//!     drawn_at: Option<u32>,
//! }
//!
//! impl Renderable for Shape {
//!     fn iterate(&mut self, state: &NodeState) -> bool {
//!         self.drawn_at = Some(state.render_order);
//!         true
//!     }
//! }
//!
//! let mut tree = SceneTree::new(Shape::default());
//! let root = tree.root();
//! let back = tree.append(root, 1, Shape::default()).unwrap();
//! let front = tree.append(root, 2, Shape::default()).unwrap();
//! // Raise the first shape above the second.
//! tree.update_z_index(back, 5);
//!
//! let stats = tree.tick().unwrap();
//! assert_eq!(stats.visited, 3);
//! assert!(tree.render_order(back) > tree.render_order(front));
//! // Nothing changed since the last pass.
//! assert!(tree.tick().is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod debounce;
mod groups;
mod listeners;
mod ticker;
mod tree;
mod types;

pub use debounce::Debounce;
pub use listeners::{Listeners, Subscription};
pub use ticker::{CancelToken, Frame, Priority, TickControl, Ticker};
pub use tree::{Renderable, SceneTree};
pub use types::{Child, DEFAULT_Z_INDEX, DirtyFlags, NodeEvent, NodeId, NodeState, RenderStats};
