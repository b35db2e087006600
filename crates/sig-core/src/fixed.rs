//! Fixed-point scale newtypes.
//!
//! Three incompatible fixed-point conventions flow through the signal core
//! (spec.md §3). Mixing them is a bug category all its own, so each gets its
//! own type instead of passing raw `i32` everywhere.

use crate::constants::{FIX_SCALE1, FIX_SCALE2, SHIFT_FACT4, TWIDDLE_SHIFT_A, TWIDDLE_SHIFT_B, WGT_SHIFT};
use std::ops::{Add, Neg, Sub};

/// Spectrum-scale value: `raw = value * 2^26`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Spectrum(pub i32);

impl Spectrum {
    /// Wrap a raw spectrum-scale integer.
    pub const fn from_raw(value: i32) -> Self {
        Spectrum(value)
    }

    /// The underlying raw integer.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert to a float in natural units, dividing out the scale.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / FIX_SCALE1 as f64
    }
}

impl Add for Spectrum {
    type Output = Spectrum;
    fn add(self, rhs: Spectrum) -> Spectrum {
        Spectrum(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Spectrum {
    type Output = Spectrum;
    fn sub(self, rhs: Spectrum) -> Spectrum {
        Spectrum(self.0.wrapping_sub(rhs.0))
    }
}

/// Angle-scale value: pi is represented as `2^14`; the domain wraps at `2^16` (4*pi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Angle(pub i32);

impl Angle {
    /// Wrap a raw angle-scale integer.
    pub const fn from_raw(value: i32) -> Self {
        Angle(value)
    }

    /// The underlying raw integer.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// The angle-scale representation of pi.
    pub const PI: Angle = Angle(FIX_SCALE2);

    /// Sign-preserving halving (shift toward zero), matching the
    /// `ang[i-1] >>= SHIFT_FACT4` step in phase unwrap.
    pub fn halve(self) -> Angle {
        if self.0 >= 0 {
            Angle(self.0 >> SHIFT_FACT4)
        } else {
            Angle(-((-self.0) >> SHIFT_FACT4))
        }
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

/// Weight-scale value: unit = `2^29`. FFT twiddle factors live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Weight(pub i32);

impl Weight {
    /// Wrap a raw weight-scale integer.
    pub const fn from_raw(value: i32) -> Self {
        Weight(value)
    }

    /// The underlying raw integer.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Build a weight-scale value from a unit-circle float in `[-1, 1]`.
    pub fn from_unit(value: f64) -> Self {
        Weight((value * WGT_SHIFT as f64).round() as i32)
    }
}

/// Multiply two weight-scale fixed-point values using the pre-shift primitive
/// described in spec.md §4.1: each operand is shifted down before the 32-bit
/// multiply, trading ~2^-14 relative error for staying within a narrow integer
/// multiply. Every twiddle-factor multiplication in the FFT kernel goes
/// through this single function so the lossy behaviour is visible and
/// reproducible at one call site.
pub fn twiddle_mul(a: Weight, b: Weight) -> Weight {
    let ap = a.0 >> TWIDDLE_SHIFT_A;
    let bp = b.0 >> TWIDDLE_SHIFT_B;
    Weight(ap.wrapping_mul(bp))
}

/// Clamp an accumulator-scale sample to the 16-bit PCM range (spec.md §7's
/// "arithmetic saturation" rule — this is the defined behaviour, not an
/// error path).
pub fn clamp_pcm(sample: i32) -> i16 {
    sample.clamp(crate::constants::PCM_MIN, crate::constants::PCM_MAX) as i16
}

/// Fast approximation of `exp(y)` for `y <= 0`, used by the envelope-to-magnitude
/// step (spec.md §4.6). The original's `picoos_quick_exp` body was not present
/// in the retrieved source; this is a standard exp2-based minimax approximation
/// rescaled to the same input convention, documented as an approximation rather
/// than a port.
pub fn quick_exp(y: f64) -> f64 {
    if y < -80.0 {
        return 0.0;
    }
    // exp(y) = 2^(y / ln2); split into integer + fractional power of two.
    let t = y * std::f64::consts::LOG2_E;
    let i = t.floor();
    let f = t - i;
    // Degree-2 minimax approximation of 2^f on [0, 1).
    let p = 1.0 + f * (0.6590 + f * 0.0994);
    p * 2f64.powi(i as i32)
}
