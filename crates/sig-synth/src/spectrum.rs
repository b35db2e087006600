//! Complex spectrum and impulse-response stage (C6, spec.md §4.6).

use crate::error::{Result, SynthError};
use crate::phase::PhaseBin;
use sig_core::constants::{FFTSIZE, FIXRESP_NORM, FIX_SCALE1, HFFTSIZE, HFFTSIZE_P1};
use sig_core::fft::rdft;
use sig_core::fixed::quick_exp;
use sig_core::tables::get_trig;
use sig_core::Weight;

/// `K1` in the envelope-to-magnitude exponential, `mag = exp(env * K1 /
/// SPECTRUM_SCALE)`.
pub const ENVSPEC_K1: f64 = 0.5;

/// F0 threshold above which the DC rule zeroes two envelope bins instead
/// of one.
pub const DC_RULE_F0_HZ: f32 = 120.0;

/// Apply the DC-suppression rule to `envelope` in place (spec.md §4.6).
fn apply_dc_rule(envelope: &mut [i32], f0: f32) {
    if f0 > DC_RULE_F0_HZ {
        envelope[0] = 0;
        envelope[1] = 0;
        envelope[2] /= 2;
    } else {
        envelope[0] = 0;
    }
}

/// The complex half-spectrum produced from an envelope and phase bins.
pub struct ComplexSpectrum {
    /// Real part, `HFFTSIZE_P1` long.
    pub fr: Vec<i32>,
    /// Imaginary part, `HFFTSIZE_P1` long.
    pub fi: Vec<i32>,
}

/// Combine the warped envelope and reconstructed phase into a complex
/// half-spectrum. `envelope` is mutated in place by the DC rule.
pub fn env_spec(envelope: &mut [i32], phase: &[PhaseBin], f0: f32, cos_table: &[Weight]) -> Result<ComplexSpectrum> {
    if envelope.len() != HFFTSIZE_P1 || phase.len() != HFFTSIZE_P1 {
        return Err(SynthError::LengthMismatch {
            expected: HFFTSIZE_P1,
            got: envelope.len().max(phase.len()),
        });
    }
    apply_dc_rule(envelope, f0);

    let mut fr = vec![0i32; HFFTSIZE_P1];
    let mut fi = vec![0i32; HFFTSIZE_P1];
    for i in 0..HFFTSIZE_P1 {
        let (cx, sx) = match phase[i] {
            PhaseBin::Smoothed(ang) => get_trig(ang, cos_table),
            PhaseBin::Random(c, s) => (c, s),
        };
        let mag = quick_exp(envelope[i] as f64 * ENVSPEC_K1 / FIX_SCALE1 as f64);
        fr[i] = (mag * cx.raw() as f64 / Weight::from_unit(1.0).raw() as f64) as i32;
        fi[i] = (mag * sx.raw() as f64 / Weight::from_unit(1.0).raw() as f64) as i32;
    }
    Ok(ComplexSpectrum { fr, fi })
}

/// Inverse-transform a complex half-spectrum into a normalised
/// `FFTSIZE`-long impulse response, returned alongside its RMS energy `E`
/// (spec.md §4.6), which the excitation generator (§4.7) clamps and feeds
/// into peak-energy computation.
pub fn impulse_response(spectrum: &ComplexSpectrum, normalizing_window: &[f64]) -> Result<(Vec<i32>, f64)> {
    if spectrum.fr.len() != HFFTSIZE_P1 || normalizing_window.len() != FFTSIZE {
        return Err(SynthError::LengthMismatch {
            expected: HFFTSIZE_P1,
            got: spectrum.fr.len(),
        });
    }

    let mut imp = vec![0i32; FFTSIZE];
    imp[0] = spectrum.fr[0];
    imp[1] = spectrum.fr[HFFTSIZE];
    for i in 1..HFFTSIZE {
        imp[2 * i] = spectrum.fr[i];
        imp[2 * i + 1] = -spectrum.fi[i];
    }
    rdft(FFTSIZE, -1, &mut imp)?;
    let scale = 2.0 / FFTSIZE as f64;

    let mut windowed: Vec<f64> = imp
        .iter()
        .zip(normalizing_window)
        .map(|(&v, &w)| v as f64 * scale * w)
        .collect();

    let energy: f64 = windowed.iter().map(|v| v * v).sum::<f64>() / FFTSIZE as f64;
    let rms = energy.sqrt();
    let divisor = (rms * FIXRESP_NORM as f64).ceil().max(1.0);

    for v in windowed.iter_mut() {
        *v /= divisor;
    }
    let imp = windowed.into_iter().map(|v| v.round() as i32).collect();
    Ok((imp, rms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_rule_zeroes_first_bin_when_low_pitch() {
        let mut env = vec![5i32; HFFTSIZE_P1];
        apply_dc_rule(&mut env, 80.0);
        assert_eq!(env[0], 0);
        assert_ne!(env[1], 0);
    }

    #[test]
    fn dc_rule_zeroes_two_bins_and_halves_third_when_high_pitch() {
        let mut env = vec![8i32; HFFTSIZE_P1];
        apply_dc_rule(&mut env, 200.0);
        assert_eq!(env[0], 0);
        assert_eq!(env[1], 0);
        assert_eq!(env[2], 4);
    }

    #[test]
    fn impulse_response_from_silence_is_near_zero() {
        let spectrum = ComplexSpectrum {
            fr: vec![0i32; HFFTSIZE_P1],
            fi: vec![0i32; HFFTSIZE_P1],
        };
        let window = vec![1.0f64; FFTSIZE];
        let (imp, energy) = impulse_response(&spectrum, &window).unwrap();
        assert!(imp.iter().all(|&v| v == 0));
        assert_eq!(energy, 0.0);
    }
}
