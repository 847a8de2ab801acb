//! Watch manager for broadcasting selection events.

use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

use super::types::{SelectionEvent, WatchConfig, WatchHandle, WatchId};

/// Internal watcher state.
struct Watcher {
    config: WatchConfig,
    sender: Sender<SelectionEvent>,
}

impl Watcher {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (watcher will be dropped).
    fn try_send(&self, event: SelectionEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => false,
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => false,
        }
    }

    /// Check if this watcher wants an event.
    fn matches(&self, event: &SelectionEvent) -> bool {
        match event {
            SelectionEvent::ScopeClosed => true,
            SelectionEvent::Cleared { .. } => self.config.filter.include_clears,
            SelectionEvent::Selected { keys, .. } | SelectionEvent::Unselected { keys, .. } => {
                match &self.config.filter.keys {
                    Some(watched) => keys.iter().any(|k| watched.contains(k)),
                    None => true,
                }
            }
            SelectionEvent::Toggled { key, .. } => match &self.config.filter.keys {
                Some(watched) => watched.contains(key),
                None => true,
            },
        }
    }
}

/// Manages watchers and broadcasts events.
pub struct WatchManager {
    /// Active watchers by ID.
    watchers: RwLock<HashMap<WatchId, Watcher>>,
    /// Counter for generating watcher IDs.
    next_id: AtomicU64,
}

impl WatchManager {
    pub fn new() -> Self {
        Self {
            watchers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new watcher and return its receiving handle.
    pub fn watch(&self, config: WatchConfig) -> WatchHandle {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.watchers.write().insert(id, Watcher { config, sender });
        debug!(watch_id = id.0, "watcher registered");

        WatchHandle { id, receiver }
    }

    /// Remove a watcher. Returns true if it existed.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let removed = self.watchers.write().remove(&id).is_some();
        if removed {
            debug!(watch_id = id.0, "watcher removed");
        }
        removed
    }

    /// Number of live watchers.
    pub fn count(&self) -> usize {
        self.watchers.read().len()
    }

    /// Broadcast an event to all matching watchers.
    ///
    /// A watcher whose buffer is full or whose receiver is gone is removed;
    /// its receiver observes the disconnect.
    pub fn broadcast(&self, event: &SelectionEvent) {
        let mut dead = Vec::new();
        {
            let watchers = self.watchers.read();
            for (id, watcher) in watchers.iter() {
                if !watcher.matches(event) {
                    continue;
                }
                if !watcher.try_send(event.clone()) {
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            let mut watchers = self.watchers.write();
            for id in dead {
                watchers.remove(&id);
                trace!(watch_id = id.0, "watcher dropped (full or disconnected)");
            }
        }
    }

    /// Notify every watcher that the scope ended, then drop them all.
    pub fn close_all(&self) {
        let mut watchers = self.watchers.write();
        for watcher in watchers.values() {
            // Best effort: a full buffer just means the disconnect arrives
            // without a final event.
            let _ = watcher.try_send(SelectionEvent::ScopeClosed);
        }
        watchers.clear();
    }
}

impl Default for WatchManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKey, Revision};
    use crate::watch::WatchFilter;

    fn selected(keys: &[&str], rev: u64) -> SelectionEvent {
        SelectionEvent::Selected {
            keys: keys.iter().map(|k| ItemKey::from(*k)).collect(),
            revision: Revision(rev),
        }
    }

    #[test]
    fn test_broadcast_reaches_watcher() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig::default());

        manager.broadcast(&selected(&["1", "2"], 1));

        assert_eq!(handle.try_recv().unwrap(), selected(&["1", "2"], 1));
    }

    #[test]
    fn test_key_filter() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig {
            filter: WatchFilter::keys(vec![ItemKey::from("2")]),
            ..Default::default()
        });

        manager.broadcast(&selected(&["1"], 1));
        manager.broadcast(&selected(&["1", "2"], 2));

        assert_eq!(handle.try_recv().unwrap(), selected(&["1", "2"], 2));
        assert!(handle.try_recv().is_err());
    }

    #[test]
    fn test_keyed_watcher_sees_clears_by_default() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig {
            filter: WatchFilter::keys(vec![ItemKey::from("1")]),
            ..Default::default()
        });

        manager.broadcast(&SelectionEvent::Cleared {
            revision: Revision(1),
        });

        assert_eq!(
            handle.try_recv().unwrap(),
            SelectionEvent::Cleared {
                revision: Revision(1)
            }
        );
    }

    #[test]
    fn test_full_buffer_drops_watcher() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig {
            buffer_size: 1,
            ..Default::default()
        });

        manager.broadcast(&selected(&["1"], 1));
        manager.broadcast(&selected(&["2"], 2));
        assert_eq!(manager.count(), 0);

        // The buffered event is still readable, then the channel disconnects.
        assert_eq!(handle.try_recv().unwrap(), selected(&["1"], 1));
        assert!(matches!(
            handle.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_unwatch() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig::default());
        assert!(manager.unwatch(handle.id));
        assert!(!manager.unwatch(handle.id));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_close_all_sends_final_event() {
        let manager = WatchManager::new();
        let handle = manager.watch(WatchConfig::default());

        manager.close_all();

        assert_eq!(handle.try_recv().unwrap(), SelectionEvent::ScopeClosed);
        assert!(matches!(
            handle.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }
}
