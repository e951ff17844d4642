//! Error types for tree and value-list operations.
//!
//! Lookups of absent keys are not errors; they return `None`. The variants here
//! cover the two places a caller can misuse the API: iterating past the end of a
//! cursor, and handing a value list or bulk constructor an argument it cannot
//! accept. Every fallible operation validates first, so an `Err` always means
//! nothing was changed.

use thiserror::Error;

/// Errors reported by [`LinkedTree`](crate::LinkedTree), its cursors, and
/// [`ValueList`](crate::ValueList).
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// [`KeyCursor::next_key`](crate::KeyCursor::next_key) was called after the
    /// traversal finished.
    ///
    /// Check [`KeyCursor::has_next`](crate::KeyCursor::has_next) first, or drive
    /// the cursor as an [`Iterator`] instead.
    #[error("iteration exhausted: the cursor has no current node")]
    IterationExhausted,

    /// A value-list position was outside the list.
    ///
    /// Insertion accepts `0..=len`; removal accepts `0..len`.
    #[error("index {index} is out of bounds for a value list of length {len}")]
    IndexOutOfBounds {
        /// The rejected position.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },

    /// Bulk construction was given key and value sequences of different lengths.
    #[error("cannot pair {keys} keys with {values} values")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },
}

/// A `Result` alias using this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
