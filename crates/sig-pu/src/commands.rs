//! `CMD` sub-command handling (spec.md §4.10): `PITCH`/`VOLUME`/`SPEAKER`
//! modifier updates. `PLAY`/`SAVE`/`UNSAVE` are handled directly in
//! [`crate::pu::SignalPu::step`] since they touch file handles, not just a
//! scalar.

/// Destination-tag byte meaning "treat the payload as an absolute value".
pub const MODE_ABSOLUTE: u8 = b'a';
/// Destination-tag byte meaning "treat the payload as a relative factor".
pub const MODE_RELATIVE: u8 = b'r';

/// Apply a `PITCH`/`VOLUME`/`SPEAKER` modifier update to `current`.
///
/// `mode == 'a'`: `current := payload / 100`. `mode == 'r'`: `current *=
/// payload / 1000` (a multiplicative nudge around the existing value, since
/// spec.md names the divisor but not the combining operator for the
/// relative case).
pub fn apply_modifier(current: &mut f32, mode: u8, payload: u16) {
    if mode == MODE_RELATIVE {
        *current *= payload as f32 / 1000.0;
    } else {
        *current = payload as f32 / 100.0;
    }
}
