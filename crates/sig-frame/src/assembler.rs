//! The frame assembler (C3, spec.md §4.3): shifts the per-frame histories,
//! parses the new `FRAME_PAR` payload, resolves its phase index against the
//! codebook, and applies the pitch modifier.

use crate::error::Result;
use crate::frame::FrameParams;
use crate::history::History;
use sig_core::constants::{CEPORDER, CEPST_BUFF_SIZE, PHASEORDER, PHASE_BUFF_SIZE};
use sig_kb::PhaseCodebook;

/// The five/three-deep parameter histories plus the warm-up counter,
/// exactly the entities spec.md §3 lists as C3's state.
pub struct FrameAssembler {
    cep: History<Vec<i32>>,
    phase: History<Vec<i32>>,
    f0: History<f32>,
    f0_unrectified: History<f32>,
    voicing: History<f32>,
    phon_id: History<u16>,
    voxbnd: History<usize>,
    n_available: u8,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Build a freshly reset assembler.
    pub fn new() -> Self {
        FrameAssembler {
            cep: History::new(CEPST_BUFF_SIZE, vec![0i32; CEPORDER]),
            phase: History::new(PHASE_BUFF_SIZE, vec![0i32; PHASEORDER]),
            f0: History::new(CEPST_BUFF_SIZE, 0.0),
            f0_unrectified: History::new(CEPST_BUFF_SIZE, 0.0),
            voicing: History::new(CEPST_BUFF_SIZE, 0.0),
            phon_id: History::new(CEPST_BUFF_SIZE, 0u16),
            voxbnd: History::new(PHASE_BUFF_SIZE, 0usize),
            n_available: 0,
        }
    }

    /// Full reset: re-zero every history slot and the warm-up counter.
    pub fn reset(&mut self) {
        self.cep.reset(vec![0i32; CEPORDER]);
        self.phase.reset(vec![0i32; PHASEORDER]);
        self.f0.reset(0.0);
        self.f0_unrectified.reset(0.0);
        self.voicing.reset(0.0);
        self.phon_id.reset(0);
        self.voxbnd.reset(0);
        self.n_available = 0;
    }

    /// Parse `payload` and shift it into the histories, applying the pitch
    /// modifier and resolving any phase-codebook index. Returns
    /// `n_available` after the increment (saturating at `CEPST_BUFF_SIZE`).
    pub fn push_item(&mut self, payload: &[u8], p_mod: f32, codebook: &PhaseCodebook) -> Result<u8> {
        let parsed = FrameParams::parse(payload)?;
        self.push_frame(parsed, p_mod, codebook);
        Ok(self.n_available)
    }

    fn push_frame(&mut self, frame: FrameParams, p_mod: f32, codebook: &PhaseCodebook) {
        self.phon_id.push(frame.phon_id);
        self.f0.push(frame.f0 * p_mod);
        self.f0_unrectified.push(frame.f0_unrectified * p_mod);
        self.voicing.push(frame.voicing);
        self.cep.push(frame.cep);

        match frame.phase_index {
            Some(index) => {
                let mut raw = [0u8; PHASEORDER];
                let count = codebook.lookup(index, &mut raw);
                let widened: Vec<i32> = raw.iter().map(|&b| b as i32).collect();
                self.phase.push(widened);
                self.voxbnd.push(count);
            }
            None => {
                self.phase.push(vec![0i32; PHASEORDER]);
                self.voxbnd.push(0);
            }
        }

        self.n_available = (self.n_available + 1).min(CEPST_BUFF_SIZE as u8);
    }

    /// Whether enough frames have been buffered to synthesise audio.
    pub fn n_available(&self) -> u8 {
        self.n_available
    }

    /// `true` once `n_available` has reached the two-frame look-ahead.
    pub fn ready(&self) -> bool {
        self.n_available as usize >= CEPST_BUFF_SIZE
    }

    /// The oldest (to-be-synthesised) mel-cepstrum vector.
    pub fn oldest_cep(&self) -> &[i32] {
        self.cep.oldest()
    }

    /// The oldest F0, already pitch-modified.
    pub fn oldest_f0(&self) -> f32 {
        *self.f0.oldest()
    }

    /// The oldest unrectified F0, already pitch-modified.
    pub fn oldest_f0_unrectified(&self) -> f32 {
        *self.f0_unrectified.oldest()
    }

    /// The oldest voicing strength.
    pub fn oldest_voicing(&self) -> f32 {
        *self.voicing.oldest()
    }

    /// Whether the oldest (to-be-synthesised) frame is voiced.
    pub fn oldest_voiced(&self) -> bool {
        self.oldest_f0() > 0.0
    }

    /// The five buffered phase vectors, oldest (`PhsBuff[-2]`) to newest
    /// (`PhsBuff[+2]`), as used by the 5-tap phase smoothing kernel.
    pub fn phase_window(&self) -> [&[i32]; PHASE_BUFF_SIZE] {
        std::array::from_fn(|i| self.phase.get(i).as_slice())
    }

    /// The five buffered voiced-band component counts, same orientation as
    /// [`Self::phase_window`].
    pub fn voxbnd_window(&self) -> [usize; PHASE_BUFF_SIZE] {
        std::array::from_fn(|i| *self.voxbnd.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_codebook() -> PhaseCodebook {
        PhaseCodebook::load(&[0, 0]).unwrap()
    }

    fn payload(mantissa: i16, voicing_byte: u8) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&mantissa.to_le_bytes());
        out.extend_from_slice(&(voicing_byte as u16).to_le_bytes());
        out.extend_from_slice(&0i16.to_le_bytes());
        out.extend_from_slice(&vec![0u8; CEPORDER * 2]);
        out
    }

    #[test]
    fn n_available_saturates_at_three() {
        let mut a = FrameAssembler::new();
        let kb = empty_codebook();
        for _ in 0..5 {
            a.push_item(&payload(0, 0), 1.0, &kb).unwrap();
        }
        assert_eq!(a.n_available(), 3);
        assert!(a.ready());
    }

    #[test]
    fn not_ready_below_three_frames() {
        let mut a = FrameAssembler::new();
        let kb = empty_codebook();
        a.push_item(&payload(0, 0), 1.0, &kb).unwrap();
        assert!(!a.ready());
    }

    #[test]
    fn pitch_modifier_scales_f0() {
        let mut a = FrameAssembler::new();
        let kb = empty_codebook();
        a.push_item(&payload(1024, 0), 2.0, &kb).unwrap();
        assert!((a.f0.newest() / std::f32::consts::E - 2.0).abs() < 1e-3);
    }

    #[test]
    fn oldest_is_first_pushed() {
        let mut a = FrameAssembler::new();
        let kb = empty_codebook();
        a.push_item(&payload(0, 0), 1.0, &kb).unwrap();
        a.push_item(&payload(1024, 0), 1.0, &kb).unwrap();
        a.push_item(&payload(2048, 0), 1.0, &kb).unwrap();
        assert_eq!(a.oldest_f0(), 0.0);
        assert!(a.oldest_voiced() == false);
    }
}
