//! Excitation generator (C7, spec.md §4.7): places pitch- or
//! period-spaced impulses within the synthesis window.

use sig_core::constants::{GETEXC_K1, MAX_EX, SAMP_FREQ};

/// Clamp a raw peak energy per the 3-piece rule in spec.md §4.7.
pub fn clamp_excitation_energy(e: f32) -> f32 {
    if e <= 1.0 {
        e
    } else if e <= 5.0 {
        2.0 * e - 1.0
    } else {
        9.0
    }
}

/// Voiced and unvoiced excitation tables (spec.md §3's `LocV`/`LocU`/
/// `EnV`/`EnU`/`next_peak`).
#[derive(Debug, Clone)]
pub struct ExcitationTables {
    /// Voiced peak positions, samples from the start of the synthesis window.
    pub loc_v: Vec<i32>,
    /// Voiced peak energies.
    pub en_v: Vec<i32>,
    /// Unvoiced peak positions.
    pub loc_u: Vec<i32>,
    /// Unvoiced peak energies.
    pub en_u: Vec<i32>,
    /// First position past the previous window, carried into this frame.
    pub next_peak: i32,
}

impl Default for ExcitationTables {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcitationTables {
    /// A freshly reset, empty table pair.
    pub fn new() -> Self {
        ExcitationTables {
            loc_v: Vec::with_capacity(MAX_EX),
            en_v: Vec::with_capacity(MAX_EX),
            loc_u: Vec::with_capacity(MAX_EX),
            en_u: Vec::with_capacity(MAX_EX),
            next_peak: 0,
        }
    }

    /// Total surviving peak count across both tables.
    pub fn count(&self) -> usize {
        self.loc_v.len() + self.loc_u.len()
    }

    fn shift_and_compact(hop: i32, locs: &mut Vec<i32>, energies: &mut Vec<i32>) {
        let mut i = 0;
        while i < locs.len() {
            locs[i] -= hop;
            if locs[i] < 0 {
                locs.remove(i);
                energies.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Shift every surviving peak by `-hop`, dropping any that fell below
    /// zero, then lay down new peaks up to `window_len` for the current
    /// frame.
    pub fn advance(&mut self, hop: usize, window_len: usize, voiced: bool, f0: f32, f0_unrectified: f32, raw_energy: f32) {
        let hop = hop as i32;
        Self::shift_and_compact(hop, &mut self.loc_v, &mut self.en_v);
        Self::shift_and_compact(hop, &mut self.loc_u, &mut self.en_u);
        self.next_peak -= hop;

        let f = if voiced { f0 } else { f0_unrectified };
        if f <= 0.0 {
            return;
        }

        let period = (SAMP_FREQ as f32 / f).round().max(1.0) as i32;
        let clamped = clamp_excitation_energy(raw_energy);
        let energy = (clamped * (SAMP_FREQ as f32 / (hop as f32 * f)).sqrt() * 3.0 * GETEXC_K1) as i32;

        let mut pos = self.next_peak;
        while (pos as usize) < window_len && self.count() < MAX_EX {
            if voiced {
                self.loc_v.push(pos);
                self.en_v.push(energy);
            } else {
                self.loc_u.push(pos);
                self.en_u.push(energy);
            }
            pos += period;
        }
        self.next_peak = pos;
    }
}
