// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selected keys with a primary item and a change counter.

/// An ordered set of selected keys.
///
/// Keys are unique by equality. The primary key is the most recently
/// selected one; the revision increases on every change so hosts can
/// refresh selection chrome only when needed.
#[derive(Clone, Debug)]
pub struct Selection<K> {
    items: Vec<K>,
    primary: Option<usize>,
    revision: u64,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            primary: None,
            revision: 0,
        }
    }
}

impl<K: Clone + PartialEq> Selection<K> {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected keys in selection order.
    #[must_use]
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// Number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `key` is selected.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.items.contains(key)
    }

    /// The most recently selected key.
    #[must_use]
    pub fn primary(&self) -> Option<&K> {
        self.primary.and_then(|i| self.items.get(i))
    }

    /// Change counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the selection with `key`.
    pub fn select_only(&mut self, key: K) {
        if self.items.len() == 1 && self.items[0] == key {
            return;
        }
        self.items.clear();
        self.items.push(key);
        self.primary = Some(0);
        self.bump();
    }

    /// Adds `key` and makes it primary.
    pub fn add(&mut self, key: K) {
        match self.items.iter().position(|k| *k == key) {
            Some(i) if self.primary == Some(i) => {}
            Some(i) => {
                self.primary = Some(i);
                self.bump();
            }
            None => {
                self.items.push(key);
                self.primary = Some(self.items.len() - 1);
                self.bump();
            }
        }
    }

    /// Removes `key`. Returns `false` if it was not selected.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(i) = self.items.iter().position(|k| k == key) else {
            return false;
        };
        self.items.remove(i);
        self.primary = match self.primary {
            Some(p) if p == i => self.items.len().checked_sub(1),
            Some(p) if p > i => Some(p - 1),
            p => p,
        };
        self.bump();
        true
    }

    /// Adds `key` if absent, removes it otherwise.
    pub fn toggle(&mut self, key: K) {
        if !self.remove(&key) {
            self.add(key);
        }
    }

    /// Replaces the selection with `keys`, dropping duplicates.
    ///
    /// The last key becomes primary.
    pub fn replace_with(&mut self, keys: impl IntoIterator<Item = K>) {
        let mut next: Vec<K> = Vec::new();
        for key in keys {
            if !next.contains(&key) {
                next.push(key);
            }
        }
        if next == self.items {
            return;
        }
        self.primary = next.len().checked_sub(1);
        self.items = next;
        self.bump();
    }

    /// Keeps only keys for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        let primary = self.primary().cloned();
        let before = self.items.len();
        self.items.retain(|k| keep(k));
        if self.items.len() != before {
            self.primary = primary
                .and_then(|p| self.items.iter().position(|k| *k == p))
                .or_else(|| self.items.len().checked_sub(1));
            self.bump();
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.primary = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
