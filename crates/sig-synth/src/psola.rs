//! Time-domain pitch-synchronous overlap-add (C8, spec.md §4.8): lays
//! impulse responses into a double-length accumulator at the excitation
//! positions computed in [`crate::excitation`], carrying the tail of one
//! frame's pulses into the next.

use crate::error::{Result, SynthError};
use sig_core::constants::{DISPLACE, FFTSIZE, SHIFT_FACT1, SHIFT_FACT5};

use crate::excitation::ExcitationTables;

/// `sig_vec`'s length: two synthesis windows, so a pulse placed near the
/// end of one frame's window still has room to ring into the next.
pub const SIG_VEC_LEN: usize = 2 * FFTSIZE;

/// Carries the previous frame's impulse response and voicing state across
/// calls, needed for the one-frame voiced/unvoiced transition blend.
#[derive(Debug, Clone, Default)]
pub struct PsolaState {
    prev_impulse_response: Vec<i32>,
    prev_voiced: bool,
    /// Set for the one frame immediately following a voicing change:
    /// `false` for U->V, `true` for V->U.
    pub voic_trans: bool,
}

impl PsolaState {
    /// A state with no history; the first frame is treated as a
    /// same-voicing continuation.
    pub fn new() -> Self {
        PsolaState::default()
    }
}

/// Roll `sig_vec` forward by one hop: clear the leading `FFTSIZE -
/// DISPLACE`, move the trailing `FFTSIZE` into the middle as this frame's
/// continuation, and zero the new trailing `DISPLACE`.
fn roll_forward(sig_vec: &mut [i32]) {
    sig_vec.copy_within(FFTSIZE.., FFTSIZE - DISPLACE);
    for v in sig_vec[..FFTSIZE - DISPLACE].iter_mut() {
        *v = 0;
    }
    for v in sig_vec[SIG_VEC_LEN - DISPLACE..].iter_mut() {
        *v = 0;
    }
}

/// `ff = (en * window[loc]) >> SHIFT_FACT1`, the signal-scale weight for a
/// peak at `loc` with (possibly sign-flipped) energy `en`.
fn peak_weight(en: i32, loc: i32, window: &[i32]) -> i32 {
    let idx = loc.clamp(0, window.len() as i32 - 1) as usize;
    ((en as i64 * window[idx] as i64) >> SHIFT_FACT1) as i32
}

/// Add one weighted impulse response into `sig_vec`, starting at `loc`.
/// Forward placement writes `impulse[k]` at `loc + k`. Reversed placement
/// writes the same samples back to front, starting at `(FFTSIZE - 1) +
/// loc` and decrementing as `k` grows, per the original unvoiced-pulse
/// decorrelation.
fn place_impulse(sig_vec: &mut [i32], impulse: &[i32], loc: i32, ff: i32, reversed: bool) {
    let n = impulse.len() as i32;
    for k in 0..impulse.len() {
        let idx = if reversed { loc + (n - 1) - k as i32 } else { loc + k as i32 };
        if idx < 0 || idx as usize >= sig_vec.len() {
            continue;
        }
        let contribution = impulse[k] as i64 * ff as i64;
        sig_vec[idx as usize] = sig_vec[idx as usize].wrapping_add(contribution as i32);
    }
}

/// Place every peak in `locs`/`ens` using `impulse`. When `alternate_sign`
/// is set (the unvoiced case), the running sign flips pulse to pulse and a
/// negative sign lays the impulse response in reverse.
fn place_set(sig_vec: &mut [i32], impulse: &[i32], locs: &[i32], ens: &[i32], window: &[i32], alternate_sign: bool) {
    let mut sign = 1i32;
    for (&loc, &en) in locs.iter().zip(ens.iter()) {
        let ff = peak_weight(en * sign, loc, window);
        place_impulse(sig_vec, impulse, loc, ff, alternate_sign && sign < 0);
        if alternate_sign {
            sign = -sign;
        }
    }
}

/// Lay this frame's excitation peaks into `sig_vec` and normalise the
/// accumulator, per spec.md §4.8.
///
/// `sig_vec` must be [`SIG_VEC_LEN`] long; `window` is the precomputed
/// int32 Hann table from [`sig_core::window::psola_window`].
pub fn td_psola2(
    sig_vec: &mut [i32],
    impulse_response: &[i32],
    window: &[i32],
    excitation: &ExcitationTables,
    voiced: bool,
    state: &mut PsolaState,
) -> Result<()> {
    if sig_vec.len() != SIG_VEC_LEN {
        return Err(SynthError::LengthMismatch { expected: SIG_VEC_LEN, got: sig_vec.len() });
    }
    if impulse_response.len() != FFTSIZE {
        return Err(SynthError::LengthMismatch { expected: FFTSIZE, got: impulse_response.len() });
    }

    roll_forward(sig_vec);

    let transition = voiced != state.prev_voiced && !state.prev_impulse_response.is_empty();
    if transition {
        // U->V (`voic_trans == false`): voiced peaks synthesise with the
        // current impulse response, unvoiced peaks (the still-draining
        // tail from the unvoiced run) with the previous frame's. V->U
        // mirrors this. Lasts exactly this one frame.
        state.voic_trans = state.prev_voiced;
        let (voiced_source, unvoiced_source): (&[i32], &[i32]) = if !state.voic_trans {
            (impulse_response, &state.prev_impulse_response)
        } else {
            (&state.prev_impulse_response, impulse_response)
        };
        place_set(sig_vec, voiced_source, &excitation.loc_v, &excitation.en_v, window, false);
        place_set(sig_vec, unvoiced_source, &excitation.loc_u, &excitation.en_u, window, true);
    } else if voiced {
        place_set(sig_vec, impulse_response, &excitation.loc_v, &excitation.en_v, window, false);
    } else {
        place_set(sig_vec, impulse_response, &excitation.loc_u, &excitation.en_u, window, true);
    }

    for v in sig_vec.iter_mut() {
        *v >>= SHIFT_FACT5;
    }

    state.prev_impulse_response = impulse_response.to_vec();
    state.prev_voiced = voiced;
    Ok(())
}
