//! Error types for knowledge-base resource loading.

use thiserror::Error;

/// Errors raised while loading a knowledge-base resource.
///
/// These only ever occur at PU construction time (spec.md §4.2); once a
/// codebook is loaded, per-frame lookups are infallible by construction.
#[derive(Error, Debug)]
pub enum KbError {
    /// A required resource was absent or empty.
    #[error("knowledge base resource missing: {0}")]
    Missing(String),

    /// A resource's bytes don't satisfy its own layout (offsets point
    /// outside the content region, or the buffer is too short for its
    /// declared record count).
    #[error("malformed knowledge base resource: {0}")]
    Malformed(String),
}

/// Result type for `sig-kb` construction-time operations.
pub type Result<T> = std::result::Result<T, KbError>;
