//! Phase reconstruction stage (C5, spec.md §4.5).
//!
//! Bins inside the voiced band (`[0, n_comp)`, where `n_comp` is the centre
//! frame's phase-codebook component count) are unwrapped from a smoothed
//! phase history. Bins beyond the voiced band — which includes every bin
//! when the centre frame is unvoiced, since an unvoiced frame's component
//! count is always zero — are drawn from the random cos/sin ring.

use sig_core::constants::{HFFTSIZE, HFFTSIZE_P1, PHASE_BUFF_SIZE, RAND_TABLE_LEN, SAMP_FREQ, V_CUTOFF_FREQ};
use sig_core::fixed::{Angle, Weight};

/// One reconstructed bin: either a smoothed-and-unwrapped angle (to be
/// converted to `(cos, sin)` downstream via the trig table) or a direct
/// `(cos, sin)` pair drawn straight from the random ring.
#[derive(Debug, Clone, Copy)]
pub enum PhaseBin {
    /// Voiced-band bin, still in angle scale.
    Smoothed(Angle),
    /// Randomised bin, already a unit-circle pair.
    Random(Weight, Weight),
}

/// Cursor into the 760-entry random cos/sin ring (spec.md §4.5's `iRand`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandCursor {
    pos: usize,
}

impl RandCursor {
    /// A cursor starting at the head of the ring.
    pub fn new() -> Self {
        RandCursor { pos: 0 }
    }

    fn pick(&self, offset: usize, ring: &[Weight]) -> Weight {
        ring[(self.pos + offset) % RAND_TABLE_LEN]
    }

    /// Advance the cursor past `consumed` entries, wrapping per the
    /// original's `iRand > N_RAND_TABLE - HFFTSIZE_P1` rule.
    fn advance(&mut self, consumed: usize) {
        self.pos += consumed;
        let limit = RAND_TABLE_LEN - HFFTSIZE_P1;
        if self.pos > limit {
            self.pos = 1 + self.pos + HFFTSIZE_P1 - RAND_TABLE_LEN;
        }
    }
}

/// Number of low-frequency bins eligible for phase smoothing at full
/// voicing strength.
fn voxbnd_constant() -> f32 {
    HFFTSIZE as f32 * V_CUTOFF_FREQ / (SAMP_FREQ as f32 / 2.0)
}

/// Reconstruct the bilateral phase spectrum for one frame.
///
/// `phase_window` and `voxbnd_window` are oldest-to-newest (`[-2, -1, 0,
/// +1, +2]` relative to the centre frame); `voicing` is the centre frame's
/// normalised voicing strength.
pub fn phase_spec2(
    phase_window: [&[i32]; PHASE_BUFF_SIZE],
    voxbnd_window: [usize; PHASE_BUFF_SIZE],
    voicing: f32,
    rand_cursor: &mut RandCursor,
    rand_cos: &[Weight],
    rand_sin: &[Weight],
) -> Vec<PhaseBin> {
    let voxbnd = (voxbnd_constant() * voicing) as usize;
    let n_comp = voxbnd_window[2].min(HFFTSIZE);

    let j = n_comp.min(*voxbnd_window.iter().min().unwrap_or(&0)).min(voxbnd);
    let k = n_comp.min(voxbnd_window[2]).min(voxbnd_window[4]);

    let mut ang = vec![Angle::from_raw(0); n_comp];
    for (i, slot) in ang.iter_mut().enumerate().take(j) {
        let sum = phase_window[0][i]
            + phase_window[1][i]
            + phase_window[2][i]
            + phase_window[3][i]
            + phase_window[4][i];
        *slot = Angle::from_raw(-((sum << 6) / 5));
    }
    for (i, slot) in ang.iter_mut().enumerate().take(k).skip(j) {
        let sum = phase_window[1][i] + phase_window[2][i] + phase_window[3][i];
        *slot = Angle::from_raw(-((sum << 6) / 3));
    }
    for (i, slot) in ang.iter_mut().enumerate().take(n_comp).skip(k) {
        *slot = Angle::from_raw(-(phase_window[2][i] << 6));
    }

    // Cumulative-sum unwrap with trailing halving (spec.md §4.5 step 6).
    for i in 1..n_comp {
        let prev = ang[i - 1];
        ang[i] = ang[i] + prev - Angle::PI;
        ang[i - 1] = prev.halve();
    }
    if n_comp > 0 {
        let last = n_comp - 1;
        ang[last] = ang[last].halve();
    }

    let mut out = Vec::with_capacity(HFFTSIZE_P1);
    out.extend(ang.into_iter().map(PhaseBin::Smoothed));

    let random_count = HFFTSIZE_P1 - n_comp - 1; // bin HFFTSIZE is pinned below
    for offset in 0..random_count {
        out.push(PhaseBin::Random(
            rand_cursor.pick(offset, rand_cos),
            rand_cursor.pick(offset, rand_sin),
        ));
    }
    rand_cursor.advance(HFFTSIZE_P1 - n_comp);

    out.push(PhaseBin::Random(Weight::from_unit(1.0), Weight::from_unit(0.0)));
    debug_assert_eq!(out.len(), HFFTSIZE_P1);
    out
}
