//! Error types for frame-parameter parsing.

use thiserror::Error;

/// Errors raised while parsing a `FRAME_PAR` item payload.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The payload was shorter than the fixed layout requires.
    #[error("frame payload too short: {got} bytes, need at least {want}")]
    TooShort {
        /// Bytes actually present.
        got: usize,
        /// Minimum bytes required.
        want: usize,
    },
}

/// Result type for `sig-frame` operations.
pub type Result<T> = std::result::Result<T, FrameError>;
