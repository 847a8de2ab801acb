//! Immutable selection snapshots.
//!
//! A [`SelectionSet`] is a point-in-time value: an insertion-ordered map from
//! item key to the most recently supplied item for that key, tagged with the
//! revision it was produced at. Write operations consume the set and return a
//! new one; the underlying map is shared between snapshots and cloned only
//! when a write hits a map that another snapshot still holds, so holders of
//! an earlier snapshot never observe a later write.

use crate::types::{ItemKey, Revision};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// An immutable snapshot of the selection state.
///
/// `Clone` is O(1) regardless of `T` (it clones the inner `Arc`). Write
/// operations require `T: Clone` for the copy-on-write path.
pub struct SelectionSet<T> {
    entries: Arc<IndexMap<ItemKey, T>>,
    revision: Revision,
}

impl<T> SelectionSet<T> {
    /// The empty set at revision 0, as created when a scope is established.
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(IndexMap::new()),
            revision: Revision(0),
        }
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The stored item for `key`, if selected.
    pub fn get(&self, key: &ItemKey) -> Option<&T> {
        self.entries.get(key)
    }

    /// Number of selected identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &T)> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.keys()
    }

    /// The revision this snapshot was produced at.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Whether two snapshots share the same underlying map.
    ///
    /// Cheap change detection for consumers that held an earlier snapshot: a
    /// write that touched a shared map always produces a different pointer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<T: Clone> SelectionSet<T> {
    /// Materialize the selected items, in the set's insertion order.
    pub fn selected(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }

    /// Insert or overwrite an entry per pair. Overwriting keeps the entry's
    /// original position and never duplicates membership.
    pub fn inserted(mut self, pairs: impl IntoIterator<Item = (ItemKey, T)>) -> Self {
        let map = Arc::make_mut(&mut self.entries);
        for (key, item) in pairs {
            map.insert(key, item);
        }
        self.revision = self.revision.next();
        self
    }

    /// Remove the entry for each key. Absent keys are a no-op. Survivor
    /// order is preserved.
    pub fn removed(mut self, keys: impl IntoIterator<Item = ItemKey>) -> Self {
        let map = Arc::make_mut(&mut self.entries);
        for key in keys {
            map.shift_remove(&key);
        }
        self.revision = self.revision.next();
        self
    }

    /// Toggle membership of exactly one identity: remove the entry if
    /// present, insert it otherwise. The flag reports whether the key is
    /// selected in the returned set.
    pub fn toggled(mut self, key: ItemKey, item: T) -> (Self, bool) {
        let map = Arc::make_mut(&mut self.entries);
        let now_selected = if map.shift_remove(&key).is_some() {
            false
        } else {
            map.insert(key, item);
            true
        };
        self.revision = self.revision.next();
        (self, now_selected)
    }

    /// Discard all entries.
    pub fn cleared(mut self) -> Self {
        self.entries = Arc::new(IndexMap::new());
        self.revision = self.revision.next();
        self
    }
}

impl<T> Clone for SelectionSet<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            revision: self.revision,
        }
    }
}

impl<T> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for SelectionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SelectionSet(len={}, rev={})",
            self.entries.len(),
            self.revision.0
        )
    }
}
