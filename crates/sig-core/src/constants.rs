//! Behavioural constants for the signal-generation core.
//!
//! Every value here is load-bearing: changing one changes the synthesised
//! audio. None of these are tunable at runtime.

/// Mel-cepstrum order carried by each frame-parameter item.
pub const CEPORDER: usize = 25;

/// Maximum number of phase-codebook components per frame.
pub const PHASEORDER: usize = 72;

/// Analysis/synthesis FFT length.
pub const FFTSIZE: usize = 256;

/// `FFTSIZE / 2`.
pub const HFFTSIZE: usize = FFTSIZE / 2;

/// `HFFTSIZE + 1`, the half-spectrum bin count including Nyquist.
pub const HFFTSIZE_P1: usize = HFFTSIZE + 1;

/// Synthesis hop size (`FFTSIZE / 4`).
pub const DISPLACE: usize = FFTSIZE / 4;

/// Output sample rate in Hz.
pub const SAMP_FREQ: u32 = 16_000;

/// Length of the quarter-period cosine lookup table.
pub const COS_TABLE_LEN: usize = 512;
/// `COS_TABLE_LEN * 2`.
pub const COS_TABLE_LEN2: usize = COS_TABLE_LEN * 2;
/// `COS_TABLE_LEN * 4`.
pub const COS_TABLE_LEN4: usize = COS_TABLE_LEN * 4;
/// `-log2(COS_TABLE_LEN2 / FIX_SCALE2)`, the shift from angle-scale to table index.
pub const PI_SHIFT: u32 = 4;

/// Length of the random cos/sin ring used for unvoiced phase.
pub const RAND_TABLE_LEN: usize = 760;

/// Excitation-table capacity (voiced + unvoiced combined upper bound).
pub const MAX_EX: usize = 32;

/// Depth of the mel-cepstrum / scalar parameter history.
pub const CEPST_BUFF_SIZE: usize = 3;
/// Depth of the phase-vector history.
pub const PHASE_BUFF_SIZE: usize = 5;

/// Cutoff frequency (Hz) below which voiced-bin phase smoothing applies.
pub const V_CUTOFF_FREQ: f32 = 4500.0;
/// Cutoff frequency (Hz) for the unvoiced band.
pub const UV_CUTOFF_FREQ: f32 = 300.0;

/// Bilinear frequency-warp factor (alpha) used to build the mel->lin table.
pub const FREQ_WARP_FACT: f32 = 0.42;

/// Capacity, in bytes, of each ring-item transport buffer.
pub const BUFSIZE_SIG: usize = 4096;

/// `float` normalisation applied to cepstral coefficient 0 before the DCT.
pub const START_FLOAT_NORM: f32 = 0.41;
/// `K1` in the envelope-to-magnitude exponential (`exp(env * K1)`).
pub const ENVSPEC_K1: f32 = 0.5;
/// Divisor applied to the third envelope bin under the high-pitch DC rule.
pub const ENVSPEC_K2: i32 = 2;
/// Scale applied to excitation peak energy.
pub const GETEXC_K1: f32 = 1024.0;
/// Divisor used when normalising the impulse response by its RMS energy.
pub const FIXRESP_NORM: f32 = 4096.0;

/// Spectrum-scale unit: `value * 2^26`.
pub const FIX_SCALE1: i64 = 0x4_000_000;
/// Angle-scale unit: pi represented as this value; wraps at `4 * FIX_SCALE2`.
pub const FIX_SCALE2: i32 = 0x4000;
/// Weight-scale unit (FFT twiddle factors).
pub const WGT_SHIFT: i32 = 0x2000_0000;

/// Pre-shift applied to the first twiddle-multiply operand.
pub const TWIDDLE_SHIFT_A: u32 = 15;
/// Pre-shift applied to the second twiddle-multiply operand.
pub const TWIDDLE_SHIFT_B: u32 = 14;

/// Right-shift from the PSOLA peak-weight product back to signal scale.
pub const SHIFT_FACT1: u32 = 10;
/// Right-shift applied when unwrapping accumulated phase.
pub const SHIFT_FACT4: u32 = 1;
/// Right-shift applied to the PSOLA accumulator before overlap-add.
pub const SHIFT_FACT5: u32 = 18;
/// Left-shift applied at overlap-add time (accumulator scale -> PCM scale).
pub const SHIFT_FACT6: u32 = 9;

/// Clamp bounds for 16-bit PCM output.
pub const PCM_MAX: i32 = 32767;
/// Clamp bounds for 16-bit PCM output.
pub const PCM_MIN: i32 = -32768;

/// Synthesis is suppressed until this many frames have been buffered.
pub const MIN_AVAILABLE: u8 = 3;

/// F0 threshold above which the DC bin(s) of the envelope are more aggressively zeroed.
pub const DC_RULE_F0_HZ: f32 = 120.0;

/// Default pitch modifier.
pub const DEFAULT_P_MOD: f32 = 1.0;
/// Default volume modifier.
pub const DEFAULT_V_MOD: f32 = 0.5;
/// Default speaker/warp modifier.
pub const DEFAULT_S_MOD: f32 = 1.0;
