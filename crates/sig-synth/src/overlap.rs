//! Overlap-add into the running waveform buffer (C9, spec.md §4.9).

use crate::error::{Result, SynthError};
use sig_core::constants::{FFTSIZE, SHIFT_FACT6};

/// Add `sig_vec`'s `FFTSIZE` samples into the front of `wav_buff`,
/// left-shifting each contribution back up to PCM scale first.
pub fn overlap_add(wav_buff: &mut [i32], sig_vec: &[i32]) -> Result<()> {
    if sig_vec.len() != FFTSIZE {
        return Err(SynthError::LengthMismatch {
            expected: FFTSIZE,
            got: sig_vec.len(),
        });
    }
    if wav_buff.len() < FFTSIZE {
        return Err(SynthError::LengthMismatch {
            expected: FFTSIZE,
            got: wav_buff.len(),
        });
    }

    for i in 0..FFTSIZE {
        wav_buff[i] += sig_vec[i] << SHIFT_FACT6;
    }
    Ok(())
}
