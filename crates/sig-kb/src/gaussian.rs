//! Packed-Gaussian mean reader shared by the mel-cepstrum and log-F0
//! codebooks (spec.md §4.2, §6): "packed means with a shared int8 scale
//! exponent." The core only ever consumes the mean; variance, if present
//! upstream, belongs to the (out-of-scope) decision-tree reader.

use crate::error::{KbError, Result};

/// A table of fixed-dimension mean vectors sharing one scale exponent.
pub struct PackedMeans {
    scale_exp: i8,
    dim: usize,
    records: Vec<i16>,
}

impl PackedMeans {
    /// Layout: one `i8` scale exponent byte, then `record_count` records of
    /// `dim` little-endian `i16` values each.
    pub fn load(bytes: &[u8], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(KbError::Malformed("packed means: dim must be > 0".into()));
        }
        if bytes.is_empty() {
            return Err(KbError::Missing("packed means: empty resource".into()));
        }
        let scale_exp = bytes[0] as i8;
        let body = &bytes[1..];
        let record_bytes = dim * 2;
        if body.len() % record_bytes != 0 {
            return Err(KbError::Malformed(format!(
                "packed means: body length {} is not a multiple of record size {record_bytes}",
                body.len()
            )));
        }

        let record_count = body.len() / record_bytes;
        let mut records = Vec::with_capacity(record_count * dim);
        for chunk in body.chunks_exact(2) {
            records.push(i16::from_le_bytes([chunk[0], chunk[1]]));
        }

        Ok(PackedMeans {
            scale_exp,
            dim,
            records,
        })
    }

    /// The shared scale exponent (`bigpow - meanpow` in the original's
    /// terms); the caller derives the shift it needs from this, e.g.
    /// `27 - scale_exp` for the mel-cepstrum normalisation in C4.
    pub fn scale_exp(&self) -> i8 {
        self.scale_exp
    }

    /// Vector dimension of each record.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len() / self.dim
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The mean vector at `index`, widened to `i32`, or `None` if `index` is
    /// out of range. Unlike `PhaseCodebook::lookup`, this index is expected
    /// to come from a validated decision-tree traversal rather than an
    /// arbitrary wire value, so returning `Option` here (checked once by the
    /// caller) rather than silently zero-filling is the better fit.
    pub fn mean(&self, index: usize) -> Option<Vec<i32>> {
        if index >= self.len() {
            return None;
        }
        let start = index * self.dim;
        Some(self.records[start..start + self.dim].iter().map(|&v| v as i32).collect())
    }
}
