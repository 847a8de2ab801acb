//! Selection scopes and consumer handles.
//!
//! A [`SelectionScope`] is one selection session: it owns the identity
//! function and the current snapshot, and it is the only place writes are
//! applied. Consumers get a cheaply cloneable [`SelectionHandle`] whose
//! operations fail with [`SelectionError::ScopeClosed`] once
//! the scope has been dropped, instead of silently operating on a phantom
//! set.

use crate::error::{Result, SelectionError};
use crate::set::SelectionSet;
use crate::types::{IdentityFn, ItemKey, Revision, ScopeId, SelectionStats};
use crate::watch::{SelectionEvent, WatchConfig, WatchHandle, WatchManager};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// State shared between a scope and its handles.
struct ScopeShared<T> {
    id: ScopeId,
    id_of: IdentityFn<T>,

    /// Current snapshot. The mutex serializes writers; each write installs a
    /// fresh snapshot, never mutates one a caller may hold.
    current: Mutex<SelectionSet<T>>,

    watchers: WatchManager,
}

impl<T> ScopeShared<T> {
    fn key_of(&self, item: &T) -> ItemKey {
        ItemKey((self.id_of)(item))
    }

    fn is_selected(&self, item: &T) -> bool {
        let key = self.key_of(item);
        self.current.lock().contains(&key)
    }

    fn all_selected(&self, items: &[T]) -> bool {
        if items.is_empty() {
            return false;
        }
        let current = self.current.lock();
        items.iter().all(|item| current.contains(&self.key_of(item)))
    }

    fn snapshot(&self) -> SelectionSet<T> {
        self.current.lock().clone()
    }

    fn revision(&self) -> Revision {
        self.current.lock().revision()
    }

    fn stats(&self) -> SelectionStats {
        let current = self.current.lock();
        SelectionStats {
            scope: self.id,
            revision: current.revision(),
            selected: current.len(),
            watchers: self.watchers.count(),
        }
    }

    fn watch(&self, config: WatchConfig) -> WatchHandle {
        self.watchers.watch(config)
    }
}

impl<T: Clone> ScopeShared<T> {
    fn get_selected(&self) -> Vec<T> {
        self.current.lock().selected()
    }

    fn select_group(&self, items: impl IntoIterator<Item = T>) -> SelectionSet<T> {
        let pairs: Vec<(ItemKey, T)> = items
            .into_iter()
            .map(|item| (self.key_of(&item), item))
            .collect();
        let keys: Vec<ItemKey> = pairs.iter().map(|(key, _)| key.clone()).collect();

        let mut current = self.current.lock();
        let next = std::mem::take(&mut *current).inserted(pairs);
        *current = next.clone();

        let revision = next.revision();
        trace!(scope = self.id.0, revision = revision.0, batch = keys.len(), "select_group");
        self.watchers
            .broadcast(&SelectionEvent::Selected { keys, revision });
        next
    }

    fn unselect_group<'a>(&self, items: impl IntoIterator<Item = &'a T>) -> SelectionSet<T>
    where
        T: 'a,
    {
        let keys: Vec<ItemKey> = items.into_iter().map(|item| self.key_of(item)).collect();

        let mut current = self.current.lock();
        let next = std::mem::take(&mut *current).removed(keys.clone());
        *current = next.clone();

        let revision = next.revision();
        trace!(scope = self.id.0, revision = revision.0, batch = keys.len(), "unselect_group");
        self.watchers
            .broadcast(&SelectionEvent::Unselected { keys, revision });
        next
    }

    fn select_single(&self, item: T) -> SelectionSet<T> {
        let key = self.key_of(&item);

        let mut current = self.current.lock();
        let (next, selected) = std::mem::take(&mut *current).toggled(key.clone(), item);
        *current = next.clone();

        let revision = next.revision();
        trace!(scope = self.id.0, revision = revision.0, key = %key, selected, "select_single");
        self.watchers.broadcast(&SelectionEvent::Toggled {
            key,
            selected,
            revision,
        });
        next
    }

    fn unselect_all(&self) -> SelectionSet<T> {
        let mut current = self.current.lock();
        let next = std::mem::take(&mut *current).cleared();
        *current = next.clone();

        let revision = next.revision();
        trace!(scope = self.id.0, revision = revision.0, "unselect_all");
        self.watchers
            .broadcast(&SelectionEvent::Cleared { revision });
        next
    }
}

impl<T> Drop for ScopeShared<T> {
    fn drop(&mut self) {
        debug!(scope = self.id.0, "selection scope closed");
        self.watchers.close_all();
    }
}

/// One selection session.
///
/// Created with an identity function; starts empty. Dropping the scope ends
/// the session: outstanding handles start returning
/// [`SelectionError::ScopeClosed`] and watchers receive a final
/// [`SelectionEvent::ScopeClosed`].
pub struct SelectionScope<T> {
    shared: Arc<ScopeShared<T>>,
}

impl<T> SelectionScope<T> {
    /// Establish a new scope with an empty selection set.
    pub fn new(id_of: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self::with_identity_fn(Arc::new(id_of))
    }

    /// Establish a new scope from an already-shared identity function.
    pub fn with_identity_fn(id_of: IdentityFn<T>) -> Self {
        let id = ScopeId::allocate();
        debug!(scope = id.0, "selection scope created");
        Self {
            shared: Arc::new(ScopeShared {
                id,
                id_of,
                current: Mutex::new(SelectionSet::empty()),
                watchers: WatchManager::new(),
            }),
        }
    }

    pub fn scope_id(&self) -> ScopeId {
        self.shared.id
    }

    /// Create a consumer handle tied to this scope's lifetime.
    pub fn handle(&self) -> SelectionHandle<T> {
        SelectionHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Whether an entry exists for the item's identity.
    pub fn is_selected(&self, item: &T) -> bool {
        self.shared.is_selected(item)
    }

    /// Consumer-side fold over `is_selected`: whether every one of `items`
    /// is currently selected. An empty slice is never "all selected".
    pub fn all_selected(&self, items: &[T]) -> bool {
        self.shared.all_selected(items)
    }

    /// The current snapshot (O(1)).
    pub fn snapshot(&self) -> SelectionSet<T> {
        self.shared.snapshot()
    }

    /// The current revision.
    pub fn revision(&self) -> Revision {
        self.shared.revision()
    }

    pub fn stats(&self) -> SelectionStats {
        self.shared.stats()
    }

    /// Register a watcher for this scope's events.
    pub fn watch(&self, config: WatchConfig) -> WatchHandle {
        self.shared.watch(config)
    }

    /// End the session explicitly. Equivalent to dropping the scope.
    pub fn close(self) {}
}

impl<T: Clone> SelectionScope<T> {
    /// Insert or overwrite an entry per item. Unconditional: already-selected
    /// identities stay selected with the new value. Returns the installed
    /// snapshot.
    pub fn select_group(&self, items: impl IntoIterator<Item = T>) -> SelectionSet<T> {
        self.shared.select_group(items)
    }

    /// Remove the entry for each item's identity; absent identities are a
    /// no-op. Returns the installed snapshot.
    pub fn unselect_group<'a>(&self, items: impl IntoIterator<Item = &'a T>) -> SelectionSet<T>
    where
        T: 'a,
    {
        self.shared.unselect_group(items)
    }

    /// Toggle membership of exactly one identity. Returns the installed
    /// snapshot.
    pub fn select_single(&self, item: T) -> SelectionSet<T> {
        self.shared.select_single(item)
    }

    /// Materialize the selected items in the set's insertion order.
    pub fn get_selected(&self) -> Vec<T> {
        self.shared.get_selected()
    }

    /// Discard all entries. Idempotent for membership; still installs a
    /// fresh snapshot. Returns it.
    pub fn unselect_all(&self) -> SelectionSet<T> {
        self.shared.unselect_all()
    }
}

impl<T> std::fmt::Debug for SelectionScope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SelectionScope({})", self.shared.id)
    }
}

/// Consumer handle to a selection scope.
///
/// Cloneable and detachable; every operation first checks that the scope is
/// still alive and fails with [`SelectionError::ScopeClosed`] otherwise.
pub struct SelectionHandle<T> {
    shared: Weak<ScopeShared<T>>,
}

impl<T> SelectionHandle<T> {
    fn live(&self) -> Result<Arc<ScopeShared<T>>> {
        self.shared.upgrade().ok_or(SelectionError::ScopeClosed)
    }

    /// Whether the scope is still alive.
    pub fn is_live(&self) -> bool {
        self.shared.strong_count() > 0
    }

    pub fn scope_id(&self) -> Result<ScopeId> {
        Ok(self.live()?.id)
    }

    pub fn is_selected(&self, item: &T) -> Result<bool> {
        Ok(self.live()?.is_selected(item))
    }

    pub fn all_selected(&self, items: &[T]) -> Result<bool> {
        Ok(self.live()?.all_selected(items))
    }

    pub fn snapshot(&self) -> Result<SelectionSet<T>> {
        Ok(self.live()?.snapshot())
    }

    pub fn revision(&self) -> Result<Revision> {
        Ok(self.live()?.revision())
    }

    pub fn stats(&self) -> Result<SelectionStats> {
        Ok(self.live()?.stats())
    }

    pub fn watch(&self, config: WatchConfig) -> Result<WatchHandle> {
        Ok(self.live()?.watch(config))
    }
}

impl<T: Clone> SelectionHandle<T> {
    pub fn select_group(&self, items: impl IntoIterator<Item = T>) -> Result<SelectionSet<T>> {
        Ok(self.live()?.select_group(items))
    }

    pub fn unselect_group<'a>(
        &self,
        items: impl IntoIterator<Item = &'a T>,
    ) -> Result<SelectionSet<T>>
    where
        T: 'a,
    {
        Ok(self.live()?.unselect_group(items))
    }

    pub fn select_single(&self, item: T) -> Result<SelectionSet<T>> {
        Ok(self.live()?.select_single(item))
    }

    pub fn get_selected(&self) -> Result<Vec<T>> {
        Ok(self.live()?.get_selected())
    }

    pub fn unselect_all(&self) -> Result<SelectionSet<T>> {
        Ok(self.live()?.unselect_all())
    }
}

impl<T> Clone for SelectionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for SelectionHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shared.upgrade() {
            Some(shared) => write!(f, "SelectionHandle({})", shared.id),
            None => write!(f, "SelectionHandle(closed)"),
        }
    }
}
