//! Error types for the signal processing unit.

use thiserror::Error;

/// Errors raised by `sig-pu`. Only construction-time failures (missing
/// knowledge-base resources) and file I/O are represented here; per-frame
/// synthesis failures are folded into [`crate::StepResult::Error`] rather
/// than propagated, per spec.md §7's "no exceptions propagate out of
/// `step`" rule.
#[derive(Error, Debug)]
pub enum PuError {
    /// A required knowledge-base resource was missing or malformed at
    /// construction time.
    #[error("knowledge base: {0}")]
    Kb(#[from] sig_kb::KbError),

    /// A frame-parameter item failed to parse.
    #[error("malformed frame: {0}")]
    Frame(#[from] sig_frame::FrameError),

    /// A ring-buffer write overflowed.
    #[error("item transport: {0}")]
    Item(#[from] sig_item::ItemError),

    /// A synthesis stage received mismatched buffer lengths.
    #[error("synthesis: {0}")]
    Synth(#[from] sig_synth::SynthError),

    /// A play/save file operation failed.
    #[error("audio file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A play/save file operation failed inside `hound`.
    #[error("audio file format: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type for `sig-pu` construction and file operations.
pub type Result<T> = std::result::Result<T, PuError>;
