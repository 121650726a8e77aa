//! Inclusive-range membership of a hash value over signed bounds.

/// Tests whether `hash` falls inside the inclusive interval `[low, high]`.
///
/// The 32 hash bits are reinterpreted as a two's-complement `i32` and
/// sign-extended before comparison, matching how the database engine
/// compares shard boundaries. There is no modulo reduction into a
/// shard-count space; `low > high` is a valid empty interval.
pub fn in_range(hash: u32, low: i64, high: i64) -> bool {
    let value = i64::from(hash as i32);
    low <= value && value <= high
}

/// A shard's assigned hash interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRange {
    pub low: i64,
    pub high: i64,
}

impl HashRange {
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// The full signed 32-bit space; every hash value belongs to it.
    pub const FULL: Self = Self::new(i32::MIN as i64, i32::MAX as i64);

    pub fn contains(&self, hash: u32) -> bool {
        in_range(hash, self.low, self.high)
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }
}
