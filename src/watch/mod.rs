//! Watch system for live selection updates.
//!
//! In-process watchers receive an event for every write to a scope:
//! selects, unselects, toggles, clears, and scope teardown.
//!
//! Watchers support:
//! - Filtering by key (a row renderer watching only its own row)
//! - Bounded buffers with slow-watcher dropping
//!
//! # Example
//!
//! ```ignore
//! let scope = SelectionScope::new(|row: &Row| row.id.clone());
//! let watcher = scope.watch(WatchConfig::default());
//!
//! scope.select_group(rows);
//!
//! match watcher.recv() {
//!     Ok(SelectionEvent::Selected { keys, revision }) => { /* re-render */ }
//!     Ok(SelectionEvent::ScopeClosed) | Err(_) => { /* stop */ }
//!     _ => {}
//! }
//! ```

mod manager;
mod types;

pub use manager::WatchManager;
pub use types::{SelectionEvent, WatchConfig, WatchFilter, WatchHandle, WatchId};
