//! `PLAY`/`SAVE` file handling (spec.md §6): a minimal
//! `{sample_rate, encoding, sample_count}` WAV contract via the teacher's
//! `hound` crate. `au`-encoded playback is out of scope for this core — no
//! `au` reader appears anywhere in the retrieval pack to ground one on.

use crate::error::Result;
use sig_core::constants::SAMP_FREQ;
use std::path::Path;

/// An open `PLAY` source. The whole file is decoded up front into memory;
/// `step` then doles it out a hop at a time via [`PlaybackSource::take_hop`].
/// This differs from the original's true per-`step` streaming read, but is
/// behaviourally equivalent for every sample actually emitted.
pub struct PlaybackSource {
    samples: Vec<i16>,
    cursor: usize,
}

impl PlaybackSource {
    /// Open `path` as a 16 kHz mono 16-bit PCM WAV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let samples: std::result::Result<Vec<i16>, hound::Error> = reader.samples::<i16>().collect();
        Ok(PlaybackSource {
            samples: samples?,
            cursor: 0,
        })
    }

    /// Take up to `hop` more samples, or `None` once the file is exhausted.
    pub fn take_hop(&mut self, hop: usize) -> Option<Vec<i16>> {
        if self.cursor >= self.samples.len() {
            return None;
        }
        let end = (self.cursor + hop).min(self.samples.len());
        let chunk = self.samples[self.cursor..end].to_vec();
        self.cursor = end;
        Some(chunk)
    }
}

/// An open `SAVE` sink: every emitted `FRAME` item is additionally written
/// here until `UNSAVE`.
pub struct SaveSink {
    writer: hound::WavWriter<std::io::BufWriter<std::fs::File>>,
}

impl SaveSink {
    /// Open `path` for writing, truncating any existing file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMP_FREQ,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        Ok(SaveSink {
            writer: hound::WavWriter::create(path, spec)?,
        })
    }

    /// Append samples as they are emitted.
    pub fn write_samples(&mut self, samples: &[i16]) -> Result<()> {
        for &s in samples {
            self.writer.write_sample(s)?;
        }
        Ok(())
    }

    /// Flush and close the file. Consumes `self`, matching the one-shot
    /// `UNSAVE` lifecycle.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}
