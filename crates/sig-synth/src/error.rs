//! Error types for the spectral synthesis stages.

use thiserror::Error;

/// Errors raised by `sig-synth`. Per-frame DSP math cannot itself fail once
/// buffer lengths are fixed at construction (spec.md §4.1, §7); this enum
/// only covers the construction-time length checks.
#[derive(Error, Debug)]
pub enum SynthError {
    /// A buffer passed to a stage didn't match the expected length.
    #[error("expected buffer of length {expected}, got {got}")]
    LengthMismatch {
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// A core FFT/DCT call failed (only possible on a programming error).
    #[error(transparent)]
    Core(#[from] sig_core::CoreError),
}

/// Result type for `sig-synth` operations.
pub type Result<T> = std::result::Result<T, SynthError>;
