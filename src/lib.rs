//! # Pickset
//!
//! A scoped multi-selection state container: track which items of an
//! arbitrary collection are selected, keyed by a caller-supplied identity
//! function rather than reference or structural equality.
//!
//! ## Core Concepts
//!
//! - **Scope**: one selection session. Owns the identity function and the
//!   current state; handles and watchers die with it.
//! - **Snapshots**: every write installs a new immutable [`SelectionSet`]
//!   with a bumped revision. Copy-on-write keeps writes cheap while held
//!   snapshots stay untouched, so consumers detect change by revision or
//!   pointer comparison instead of deep equality.
//! - **Handles**: weak consumer references whose operations fail with
//!   [`SelectionError::ScopeClosed`] after the scope ends.
//! - **Watchers**: bounded in-process event streams of key-level deltas.
//!
//! ## Example
//!
//! ```
//! use pickset::SelectionScope;
//!
//! #[derive(Clone)]
//! struct Row {
//!     id: String,
//!     name: String,
//! }
//!
//! let scope = SelectionScope::new(|row: &Row| row.id.clone());
//! let rows = vec![
//!     Row { id: "1".into(), name: "Item 1".into() },
//!     Row { id: "2".into(), name: "Item 2".into() },
//! ];
//!
//! scope.select_group(rows.clone());
//! assert!(scope.is_selected(&rows[0]));
//! assert_eq!(scope.get_selected()[0].name, "Item 1");
//!
//! scope.unselect_group(&rows[..1]);
//! assert_eq!(scope.get_selected().len(), 1);
//!
//! scope.unselect_all();
//! assert!(scope.get_selected().is_empty());
//! ```

pub mod error;
pub mod scope;
pub mod set;
pub mod types;
pub mod watch;

// Re-exports
pub use error::{Result, SelectionError};
pub use scope::{SelectionHandle, SelectionScope};
pub use set::SelectionSet;
pub use types::{IdentityFn, ItemKey, Revision, ScopeId, SelectionStats};
pub use watch::{SelectionEvent, WatchConfig, WatchFilter, WatchHandle, WatchId, WatchManager};
