//! Analysis/synthesis windows.
//!
//! `hann` is the plain analysis window; `normalizing_window` is the
//! squared-Hann energy-normalisation table applied at overlap-add time so
//! that summed overlapping windows reconstruct unit gain (spec.md §4.9,
//! grounded on `gen_hann2` in the retrieved original source).

use crate::constants::SHIFT_FACT1;
use std::f64::consts::PI;

/// A length-`n` Hann window, `w[i] = 0.5 - 0.5 * cos(2*pi*i / (n-1))`.
pub fn hann(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// The PSOLA peak-weighting table (spec.md §4.8): a length-`n` Hann window
/// scaled by `1 << SHIFT_FACT1` and rounded to int32, so that `(en *
/// psola_window[loc]) >> SHIFT_FACT1` recovers a signal-scale weight.
pub fn psola_window(n: usize) -> Vec<i32> {
    let scale = (1i64 << SHIFT_FACT1) as f64;
    hann(n).into_iter().map(|w| (w * scale).round() as i32).collect()
}

/// Overlap-add normalisation table: the reciprocal of the summed energy of
/// `hop`-spaced overlapping squared-Hann windows, so that `overlap_add`
/// recovers unit gain on a stationary signal. `len` is the window length
/// (`FFTSIZE`), `hop` the synthesis hop (`DISPLACE`).
pub fn normalizing_window(len: usize, hop: usize) -> Vec<f64> {
    let w = hann(len);
    let squared: Vec<f64> = w.iter().map(|v| v * v).collect();

    let mut energy = vec![0.0f64; len];
    let shifts = (len + hop - 1) / hop;
    for s in 0..=shifts {
        let shift = s as isize * hop as isize;
        for i in 0..len {
            let j = i as isize - shift;
            if j >= 0 && (j as usize) < len {
                energy[i] += squared[j as usize];
            }
            let j2 = i as isize + shift;
            if shift != 0 && j2 >= 0 && (j2 as usize) < len {
                energy[i] += squared[j2 as usize];
            }
        }
    }

    energy
        .into_iter()
        .map(|e| if e > 1e-9 { 1.0 / e } else { 0.0 })
        .collect()
}
