//! Core types for the selection container.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Caller-supplied identity function.
///
/// Maps an item to the stable string key used for membership tests. Two items
/// with equal keys are the same selectable entity regardless of structural or
/// reference equality. The function must be deterministic and side-effect
/// free; keys are never cached across operations.
pub type IdentityFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Stable string key derived from an item by the identity function.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey(pub String);

impl ItemKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemKey({})", self.0)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        ItemKey(s)
    }
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        ItemKey(s.to_string())
    }
}

/// Per-scope write counter.
///
/// Every write operation installs a snapshot at the next revision, so two
/// snapshots of the same scope carry equal revisions iff no write happened
/// between them. The empty set created at scope construction is revision 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Revision(pub u64);

impl Revision {
    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rev({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique identifier for a selection scope.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

impl ScopeId {
    /// Allocate the next process-unique scope id.
    pub(crate) fn allocate() -> Self {
        ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time counters for one scope.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SelectionStats {
    pub scope: ScopeId,
    pub revision: Revision,
    /// Number of currently selected identities.
    pub selected: usize,
    /// Number of live watchers.
    pub watchers: usize,
}
