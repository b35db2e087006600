//! Lookup tables shared by the phase/envelope reconstruction stages:
//! the quarter-wave cosine table and its four-quadrant unfolding
//! (`get_trig`, ported line-for-line from the retrieved original source),
//! a deterministic pseudo-random cos/sin ring for unvoiced phase, and the
//! bilinear mel<->linear frequency-warp table.

use crate::constants::{COS_TABLE_LEN, COS_TABLE_LEN2, COS_TABLE_LEN4, PI_SHIFT, RAND_TABLE_LEN};
use crate::fixed::{Angle, Weight};
use std::f64::consts::PI;

/// Quarter-wave cosine table: `table[i] = cos(i * (pi/2) / COS_TABLE_LEN)`,
/// `i` in `0..=COS_TABLE_LEN`, in weight scale.
pub fn cos_table() -> Vec<Weight> {
    (0..=COS_TABLE_LEN)
        .map(|i| {
            let theta = PI / 2.0 * i as f64 / COS_TABLE_LEN as f64;
            Weight::from_unit(theta.cos())
        })
        .collect()
}

fn unfold(k: i32, table: &[Weight]) -> Weight {
    let mut i = k.abs();
    let mut j = 1i32;
    i &= COS_TABLE_LEN4 as i32 - 1;
    if i > COS_TABLE_LEN2 as i32 {
        i = COS_TABLE_LEN4 as i32 - i;
    }
    if i > COS_TABLE_LEN as i32 {
        j = -1;
        i = COS_TABLE_LEN2 as i32 - i;
    }
    let v = table[i as usize].raw();
    Weight(if j == 1 { v } else { -v })
}

/// Look up `(cos, sin)` of an angle-scale value against the quarter-wave
/// table, via four-quadrant unfolding.
pub fn get_trig(ang: Angle, table: &[Weight]) -> (Weight, Weight) {
    let k = ang.raw() >> PI_SHIFT;
    let cs = unfold(k, table);
    let sn = unfold(k - COS_TABLE_LEN as i32, table);
    (cs, sn)
}

/// A deterministic ring of unit-circle `(cos, sin)` pairs used to seed
/// unvoiced-band phase (spec.md §4.5). The original keeps a literal
/// hand-generated 760-entry table; this builds an equivalent ring from a
/// fixed linear-congruential sequence over angle-scale so the table is
/// reproducible without hand-transcribing hundreds of magic numbers.
pub fn rand_trig_ring(table: &[Weight]) -> (Vec<Weight>, Vec<Weight>) {
    let mut cos_ring = Vec::with_capacity(RAND_TABLE_LEN);
    let mut sin_ring = Vec::with_capacity(RAND_TABLE_LEN);
    let mut state: u32 = 0x2545_F491;
    for _ in 0..RAND_TABLE_LEN {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let ang = Angle::from_raw(((state >> 8) as i32) & 0xFFFF);
        let (c, s) = get_trig(ang, table);
        cos_ring.push(c);
        sin_ring.push(s);
    }
    (cos_ring, sin_ring)
}

/// Bilinear mel<->linear frequency-warp table: for each linear DFT bin
/// `i` in `0..=n`, the warped position is split into an integer bin `a[i]`
/// and fractional interpolation weight `d[i]` in `[0, 1)`, so that
/// `warped(i) ~= (1 - d[i]) * env[a[i]] + d[i] * env[a[i] + 1]`.
///
/// Grounded on `mel_2_lin_init`/`mel_2_lin_lookup` in the retrieved original
/// source, which ships this as a literal precomputed 129-entry table for a
/// single fixed `alpha`. Computing it from the bilinear warp formula instead
/// lets the `SPEAKER` modifier rebuild the table for a different `alpha`
/// without needing a second hand-copied table.
#[derive(Debug, Clone)]
pub struct MelWarpTable {
    /// Integer bin index for each linear bin.
    pub a: Vec<usize>,
    /// Fractional interpolation weight, `[0, 1)`.
    pub d: Vec<f64>,
}

/// Build a `MelWarpTable` for `n + 1` bins (`HFFTSIZE + 1`) at warp factor
/// `alpha` (`FREQ_WARP_FACT` by default).
pub fn mel_warp_table(n: usize, alpha: f64) -> MelWarpTable {
    let mut a = Vec::with_capacity(n + 1);
    let mut d = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let omega = PI * i as f64 / n as f64;
        let warped = omega + 2.0 * (alpha * omega.sin()).atan2(1.0 - alpha * omega.cos());
        let idx = (warped / PI * n as f64).clamp(0.0, n as f64);
        let base = idx.floor();
        let bin = (base as usize).min(n.saturating_sub(1));
        a.push(bin);
        d.push((idx - base).clamp(0.0, 1.0));
    }
    MelWarpTable { a, d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cos_table_endpoints() {
        let t = cos_table();
        assert!((t[0].raw() - crate::constants::WGT_SHIFT).abs() < 4);
        assert!(t[COS_TABLE_LEN].raw().abs() < 4);
    }

    #[test]
    fn get_trig_zero_angle() {
        let t = cos_table();
        let (c, s) = get_trig(Angle::from_raw(0), &t);
        assert!((c.raw() - crate::constants::WGT_SHIFT).abs() < 4);
        assert!(s.raw().abs() < 4);
    }

    #[test]
    fn rand_ring_has_unit_magnitude() {
        let t = cos_table();
        let (c, s) = rand_trig_ring(&t);
        assert_eq!(c.len(), RAND_TABLE_LEN);
        for (cv, sv) in c.iter().zip(s.iter()) {
            let mag = ((cv.raw() as f64).powi(2) + (sv.raw() as f64).powi(2)).sqrt();
            let unit = crate::constants::WGT_SHIFT as f64;
            assert!((mag / unit - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn mel_warp_identity_at_alpha_zero() {
        let table = mel_warp_table(128, 0.0);
        for i in 0..=128usize {
            assert_eq!(table.a[i].min(128), i.min(127));
        }
    }

    #[test]
    fn mel_warp_monotonic() {
        let table = mel_warp_table(128, 0.42);
        for w in table.a.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }
}
