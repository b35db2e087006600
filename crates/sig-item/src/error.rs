//! Error types for the ring-item transport.

use thiserror::Error;

/// Errors raised by `sig-item`.
#[derive(Error, Debug)]
pub enum ItemError {
    /// A write would not fit in the remaining buffer space.
    #[error("buffer overflow: {needed} bytes needed, {available} available")]
    BufOverflow {
        /// Bytes the write required.
        needed: usize,
        /// Bytes actually free.
        available: usize,
    },
}

/// Result type for `sig-item` operations.
pub type Result<T> = std::result::Result<T, ItemError>;
