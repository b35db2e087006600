//! Spectral envelope stage (C4, spec.md §4.4): mel-cepstrum to linear-
//! frequency log power spectrum via a symmetric DCT and a bilinear
//! frequency warp table.

use crate::error::{Result, SynthError};
use sig_core::constants::{CEPORDER, FFTSIZE, HFFTSIZE, HFFTSIZE_P1};
use sig_core::fft::dfct_nmf;
use sig_core::tables::MelWarpTable;

/// Float normalisation applied to cepstral coefficient 0 before the DCT.
pub const START_FLOAT_NORM: f32 = 0.41;

/// Convert the oldest mel-cepstrum vector into a warped linear-frequency
/// log power envelope of `HFFTSIZE_P1` bins.
///
/// `cep_scale_shift` is `27 - meanpow_scale` from spec.md §4.4: the shift
/// applied to every coefficient but the first before the DCT.
pub fn mel_to_linear(cep: &[i32], cep_scale_shift: u32, warp: &MelWarpTable) -> Result<Vec<i32>> {
    if cep.len() != CEPORDER {
        return Err(SynthError::LengthMismatch {
            expected: CEPORDER,
            got: cep.len(),
        });
    }

    let mut work = vec![0i32; FFTSIZE];
    work[0] = (cep[0] as f32 * START_FLOAT_NORM) as i32;
    for (i, &c) in cep.iter().enumerate().skip(1) {
        work[i] = c << cep_scale_shift;
    }

    dfct_nmf(HFFTSIZE, &mut work)?;

    let mut out = vec![0i32; HFFTSIZE_P1];
    out[0] = work[0];
    out[HFFTSIZE] = work[HFFTSIZE];
    for i in 1..HFFTSIZE {
        let a = warp.a[i];
        let d = warp.d[i];
        let lo = work[a] as f64;
        let hi = work[(a + 1).min(HFFTSIZE)] as f64;
        out[i] = (lo + d * (hi - lo)).round() as i32;
    }
    Ok(out)
}
