//! Error types for the selection container.

use thiserror::Error;

/// Main error type for selection operations.
///
/// The identity function's contract (deterministic, injective over distinct
/// logical items) is a caller precondition and is deliberately not checked:
/// violating it collapses distinct items into one membership entry rather
/// than producing an error. The only failure the container itself reports is
/// use of a handle whose scope has already ended.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection scope has ended; operations require a live scope")]
    ScopeClosed,
}

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
