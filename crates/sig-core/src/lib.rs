//! Fixed-point DSP primitives shared by the signal-generation pipeline:
//! scale-tagged integer types, the real FFT/DCT kernel, window functions,
//! and the trig/warp lookup tables the synthesis stages interpolate into.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod fft;
pub mod fixed;
pub mod tables;
pub mod window;

pub use errors::{CoreError, Result};
pub use fixed::{twiddle_mul, Angle, Spectrum, Weight};
