//! Watch types for live selection updates.

use crate::types::{ItemKey, Revision};
use serde::{Deserialize, Serialize};

/// Configuration for a watcher.
#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// Max buffered events before the watcher is dropped.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: WatchFilter,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: WatchFilter::default(),
        }
    }
}

/// Filter criteria for watchers.
///
/// The default delivers every event. A keyed filter narrows delivery to
/// events touching the given keys, which is the shape a single row renderer
/// wants.
#[derive(Clone, Debug)]
pub struct WatchFilter {
    /// Deliver only events touching these keys (None = all keys).
    pub keys: Option<Vec<ItemKey>>,

    /// Deliver `Cleared` events. A clear touches every key, so keyed
    /// watchers usually want these too.
    pub include_clears: bool,
}

impl Default for WatchFilter {
    fn default() -> Self {
        Self {
            keys: None,
            include_clears: true,
        }
    }
}

impl WatchFilter {
    /// Watch every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Watch events touching specific keys.
    pub fn keys(keys: impl IntoIterator<Item = ItemKey>) -> Self {
        Self {
            keys: Some(keys.into_iter().collect()),
            ..Default::default()
        }
    }
}

/// Events emitted to watchers.
///
/// Events carry keys, never item values, so they stay `'static` and
/// serializable regardless of the item type; consumers that need values join
/// keys against a current snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// A batch was selected (inserted or overwritten).
    Selected {
        keys: Vec<ItemKey>,
        revision: Revision,
    },

    /// A batch was unselected.
    Unselected {
        keys: Vec<ItemKey>,
        revision: Revision,
    },

    /// A single identity was toggled.
    Toggled {
        key: ItemKey,
        /// Membership after the toggle.
        selected: bool,
        revision: Revision,
    },

    /// All entries were discarded.
    Cleared { revision: Revision },

    /// The scope ended; no further events will arrive.
    ScopeClosed,
}

impl SelectionEvent {
    /// The revision the event was produced at (None for `ScopeClosed`).
    pub fn revision(&self) -> Option<Revision> {
        match self {
            SelectionEvent::Selected { revision, .. }
            | SelectionEvent::Unselected { revision, .. }
            | SelectionEvent::Toggled { revision, .. }
            | SelectionEvent::Cleared { revision } => Some(*revision),
            SelectionEvent::ScopeClosed => None,
        }
    }
}

/// Unique identifier for a watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Handle to receive selection events.
#[derive(Debug)]
pub struct WatchHandle {
    pub id: WatchId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<SelectionEvent>,
}

impl WatchHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<SelectionEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<SelectionEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<SelectionEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
