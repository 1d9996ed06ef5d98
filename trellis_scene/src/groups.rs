// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-index grouped child ordering.
//!
//! Each group is an append-only slot vector with tombstones. Removal clears a
//! slot in place and appending pushes to the end, so regrouping a node is O(1)
//! amortized; a group is compacted once tombstones outnumber live entries.
//! The flattened order across groups is cached and rebuilt lazily on read.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::types::NodeId;

/// Groups below this many slots are never compacted.
const COMPACT_MIN_SLOTS: usize = 16;

#[derive(Clone, Debug, Default)]
struct Group {
    slots: Vec<Option<NodeId>>,
    live: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ZGroups {
    groups: BTreeMap<i32, Group>,
    position: HashMap<NodeId, (i32, usize)>,
    flattened: Option<Vec<NodeId>>,
}

impl ZGroups {
    pub(crate) fn len(&self) -> usize {
        self.position.len()
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.position.contains_key(&id)
    }

    /// Append `id` to the end of group `z`.
    pub(crate) fn push(&mut self, id: NodeId, z: i32) {
        debug_assert!(!self.contains(id), "node pushed twice into the same parent");
        let group = self.groups.entry(z).or_default();
        group.slots.push(Some(id));
        group.live += 1;
        self.position.insert(id, (z, group.slots.len() - 1));
        self.flattened = None;
    }

    /// Remove `id`, returning the group it belonged to.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<i32> {
        let (z, slot) = self.position.remove(&id)?;
        self.flattened = None;
        let Some(group) = self.groups.get_mut(&z) else {
            return Some(z);
        };
        group.slots[slot] = None;
        group.live -= 1;
        if group.live == 0 {
            self.groups.remove(&z);
        } else if group.slots.len() >= COMPACT_MIN_SLOTS && group.live * 2 < group.slots.len() {
            group.slots.retain(Option::is_some);
            for (i, entry) in group.slots.iter().enumerate() {
                if let Some(moved) = entry {
                    self.position.insert(*moved, (z, i));
                }
            }
        }
        Some(z)
    }

    /// Move `id` to the end of group `z`. Returns the previous group.
    pub(crate) fn regroup(&mut self, id: NodeId, z: i32) -> Option<i32> {
        let from = self.remove(id)?;
        self.push(id, z);
        Some(from)
    }

    /// Children in ascending z-index order, insertion order within a group.
    pub(crate) fn ordered(&mut self) -> &[NodeId] {
        let groups = &self.groups;
        self.flattened.get_or_insert_with(|| {
            groups
                .values()
                .flat_map(|g| g.slots.iter().flatten().copied())
                .collect()
        })
    }

    pub(crate) fn clear(&mut self) -> Vec<NodeId> {
        let all = self.ordered().to_vec();
        self.groups.clear();
        self.position.clear();
        self.flattened = None;
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: u32) -> NodeId {
        NodeId::new(i, 1)
    }

    #[test]
    fn ascending_groups_with_insertion_order() {
        let mut g = ZGroups::default();
        g.push(id(0), 2);
        g.push(id(1), 1);
        g.push(id(2), 2);
        g.push(id(3), 1);
        assert_eq!(g.ordered(), &[id(1), id(3), id(0), id(2)]);
    }

    #[test]
    fn regroup_moves_to_end_of_new_group() {
        let mut g = ZGroups::default();
        for i in 0..4 {
            g.push(id(i), 1);
        }
        assert_eq!(g.regroup(id(1), 5), Some(1));
        assert_eq!(g.ordered(), &[id(0), id(2), id(3), id(1)]);
        assert_eq!(g.regroup(id(1), 1), Some(5));
        assert_eq!(g.ordered(), &[id(0), id(2), id(3), id(1)]);
    }

    #[test]
    fn compaction_keeps_positions_consistent() {
        let mut g = ZGroups::default();
        for i in 0..40 {
            g.push(id(i), 1);
        }
        for i in 0..30 {
            g.remove(id(i));
        }
        let expected: Vec<_> = (30..40).map(id).collect();
        assert_eq!(g.ordered(), expected.as_slice());
        // Removing after compaction still hits the right slot.
        g.remove(id(35));
        assert!(!g.ordered().contains(&id(35)));
        assert_eq!(g.len(), 9);
    }

    #[test]
    fn removing_unknown_is_none() {
        let mut g = ZGroups::default();
        assert_eq!(g.remove(id(7)), None);
        assert_eq!(g.regroup(id(7), 3), None);
        assert!(g.ordered().is_empty());
    }
}
