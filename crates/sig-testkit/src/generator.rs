//! Synthetic `FRAME_PAR` payload builders for the S1-S6 integration
//! scenarios: silence, a sustained vowel, and a pitch sweep.

use sig_core::constants::CEPORDER;
use sig_item::{ItemHeader, ItemType};

/// Encode one `FRAME_PAR` payload.
///
/// `log_f0_mantissa` is the raw wire mantissa (`0` for unvoiced); `voicing_byte`
/// is the pre-reorder wire byte; `cep` must be `CEPORDER` coefficients.
pub fn encode_frame_par(log_f0_mantissa: i16, voicing_byte: u8, f0_unrectified_raw: i16, cep: &[i16]) -> Vec<u8> {
    assert_eq!(cep.len(), CEPORDER, "cep must be CEPORDER coefficients long");
    let mut out = Vec::with_capacity(2 * CEPORDER + 8);
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&log_f0_mantissa.to_le_bytes());
    out.extend_from_slice(&(voicing_byte as u16).to_le_bytes());
    out.extend_from_slice(&f0_unrectified_raw.to_le_bytes());
    for &c in cep {
        out.extend_from_slice(&c.to_le_bytes());
    }
    out
}

/// A fully silent, unvoiced frame: zero mantissa, zero voicing, zero cepstrum.
pub fn silence_frame() -> Vec<u8> {
    encode_frame_par(0, 0, 0, &[0i16; CEPORDER])
}

/// A steadily voiced frame at `f0_hz`, full voicing strength, with a flat
/// cepstrum envelope scaled by `level`.
pub fn sustained_vowel_frame(f0_hz: f32, level: i16) -> Vec<u8> {
    let mantissa = (f0_hz.ln() * 1024.0).round() as i16;
    let mut cep = vec![0i16; CEPORDER];
    cep[0] = level;
    // Full voicing strength: bit0=0, strength nibble=0b111 -> voicing_byte with
    // bits 1-3 set, matching sig-frame's `(v>>1)&7` reconstruction.
    encode_frame_par(mantissa, 0b1110, 0, &cep)
}

/// A sequence of voiced frames sweeping `f0` linearly from `start_hz` to
/// `end_hz` over `count` frames, for pitch-tracking properties.
pub fn pitch_sweep(start_hz: f32, end_hz: f32, count: usize, level: i16) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            let t = if count <= 1 { 0.0 } else { i as f32 / (count - 1) as f32 };
            let f0 = start_hz + t * (end_hz - start_hz);
            sustained_vowel_frame(f0, level)
        })
        .collect()
}

/// Wrap a `FRAME_PAR` payload in its item header.
pub fn frame_par_item(payload: &[u8]) -> (ItemHeader, Vec<u8>) {
    (ItemHeader::new(ItemType::FramePar, 0, 0, payload.len() as u8), payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_frame_has_zero_mantissa() {
        let payload = silence_frame();
        assert_eq!(payload[2], 0);
        assert_eq!(payload[3], 0);
    }

    #[test]
    fn sustained_vowel_uses_nonzero_mantissa() {
        let payload = sustained_vowel_frame(150.0, 500);
        let mantissa = i16::from_le_bytes([payload[2], payload[3]]);
        assert_ne!(mantissa, 0);
    }

    #[test]
    fn pitch_sweep_endpoints_match_bounds() {
        let frames = pitch_sweep(100.0, 200.0, 5, 100);
        assert_eq!(frames.len(), 5);
        let first_mantissa = i16::from_le_bytes([frames[0][2], frames[0][3]]);
        let last_mantissa = i16::from_le_bytes([frames[4][2], frames[4][3]]);
        assert!(last_mantissa > first_mantissa);
    }
}
