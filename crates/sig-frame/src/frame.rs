//! `FRAME_PAR` payload parsing (spec.md §3, §4.3).
//!
//! Wire layout, little-endian: `phon_id: u16`, `f0_mantissa: i16`,
//! `voicing_byte: u16` (only the low byte is meaningful), `f0_unrectified:
//! i16`, `CEPORDER` signed 16-bit mel-cepstrum coefficients, then an
//! optional trailing `phase_codebook_index: u16` present iff
//! `payload.len() > 2 * CEPORDER + 8` (the base layout's exact size).

use crate::error::{FrameError, Result};
use sig_core::constants::CEPORDER;

/// Scale applied to the log-F0 mantissa before exponentiation: `F0 =
/// exp(mantissa / LOGF0_SCALE)` when the mantissa is non-zero. The upstream
/// acoustic-model reader (out of scope for this core) is the true owner of
/// the scale exponent used when the mantissa was produced; this core treats
/// it as a fixed constant since no per-frame scale field travels with the
/// item.
pub const LOGF0_SCALE: f32 = 1024.0;

/// Divisor converting the raw `f0_unrectified` field to Hz.
pub const F0_UNRECT_SCALE: f32 = 64.0;

/// A parsed, not-yet-modifier-adjusted frame.
#[derive(Debug, Clone)]
pub struct FrameParams {
    /// Phonetic symbol id.
    pub phon_id: u16,
    /// Fundamental frequency in Hz, `0.0` when unvoiced.
    pub f0: f32,
    /// Voicing strength, normalised to `[0, 1]`.
    pub voicing: f32,
    /// Unrectified F0 (used by the unvoiced excitation generator), Hz.
    pub f0_unrectified: f32,
    /// Mel-cepstrum coefficients, `CEPORDER` long.
    pub cep: Vec<i32>,
    /// Phase codebook index, if the item carried one.
    pub phase_index: Option<u16>,
}

const BASE_LEN: usize = 2 * CEPORDER + 8;

impl FrameParams {
    /// Parse a `FRAME_PAR` payload per the fixed layout above.
    pub fn parse(payload: &[u8]) -> Result<FrameParams> {
        if payload.len() < BASE_LEN {
            return Err(FrameError::TooShort {
                got: payload.len(),
                want: BASE_LEN,
            });
        }

        let phon_id = u16::from_le_bytes([payload[0], payload[1]]);
        let mantissa = i16::from_le_bytes([payload[2], payload[3]]);
        let voicing_raw = payload[4];
        let f0_unrect_raw = i16::from_le_bytes([payload[6], payload[7]]);

        let f0 = if mantissa == 0 {
            0.0
        } else {
            (mantissa as f32 / LOGF0_SCALE).exp()
        };

        // bit0 = unrelated flag, bits1-3 = 3-bit voicing strength; the
        // strength nibble is reassembled high-bit-first then normalised.
        let v = voicing_raw;
        let reordered = ((v & 1) << 3) | ((v >> 1) & 7);
        let voicing = reordered as f32 / 15.0;

        let mut cep = Vec::with_capacity(CEPORDER);
        for i in 0..CEPORDER {
            let o = 8 + i * 2;
            cep.push(i16::from_le_bytes([payload[o], payload[o + 1]]) as i32);
        }

        let phase_index = if payload.len() > BASE_LEN {
            Some(u16::from_le_bytes([payload[BASE_LEN], payload[BASE_LEN + 1]]))
        } else {
            None
        };

        Ok(FrameParams {
            phon_id,
            f0,
            voicing,
            f0_unrectified: f0_unrect_raw as f32 / F0_UNRECT_SCALE,
            cep,
            phase_index,
        })
    }
}
