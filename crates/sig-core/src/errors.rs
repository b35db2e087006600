//! Error types for the core DSP primitives.

use thiserror::Error;

/// Errors raised by `sig-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An FFT/DCT length was not a power of two, or below the minimum order.
    #[error("transform size must be a power of two >= 4, got {0}")]
    InvalidTransformSize(usize),

    /// A buffer passed to a transform didn't match the configured length.
    #[error("buffer length {0} doesn't match transform size {1}")]
    LengthMismatch(usize, usize),
}

/// Result type for `sig-core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;
