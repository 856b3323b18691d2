//! Mapping raw 64-bit entropy onto an inclusive integer range.
//!
//! The mapping is plain modulo reduction: `lo + (raw mod (hi - lo + 1))`.
//! It is not a rejection sampler, so ranges whose width does not divide 2^64
//! carry a bias of at most `width / 2^64` per outcome. Known raw inputs always
//! map to the same outputs, which is what the golden-vector tests rely on.

use crate::error::{GenerationError, Result};

/// An inclusive range `[lo, hi]` with `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    lo: i64,
    hi: i64,
}

impl Range {
    /// Validate `lo < hi`.
    pub fn new(lo: i64, hi: i64) -> Result<Self> {
        if lo >= hi {
            return Err(GenerationError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    /// Number of values in the range, or `None` for the full `i64` span (2^64).
    pub fn width(&self) -> Option<u64> {
        // hi - lo fits in u64 for any lo < hi.
        (self.hi.wrapping_sub(self.lo) as u64).checked_add(1)
    }

    /// Map a raw value into `[lo, hi]`.
    ///
    /// The arithmetic is carried out modulo 2^64, so every `i64` range is
    /// handled exactly, including `[i64::MIN, i64::MAX]` where the raw value
    /// is used unreduced.
    pub fn map(&self, raw: u64) -> i64 {
        let offset = match self.width() {
            Some(width) => raw % width,
            None => raw,
        };
        self.lo.wrapping_add(offset as i64)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

/// Map `raw` into `[lo, hi]`, failing with `InvalidRange` when `lo >= hi`.
pub fn map(raw: u64, lo: i64, hi: i64) -> Result<i64> {
    Ok(Range::new(lo, hi)?.map(raw))
}
