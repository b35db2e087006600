//! Knowledge-base resource readers: the phase codebook and the packed
//! mel-cepstrum/log-F0 Gaussian means. Construction validates every
//! resource up front; once loaded, lookups cannot fail.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gaussian;
pub mod phase;

pub use error::{KbError, Result};
pub use gaussian::PackedMeans;
pub use phase::PhaseCodebook;
