//! Capacity-checked assembly of encoded keys into one hashable buffer.

use crate::codec::number::{self, MAX_ENCODED_LEN};
use crate::error::{ShardError, ShardResult};

/// Default scratch capacity for a fingerprint, in bytes.
///
/// Three keys can never need more than `3 * MAX_ENCODED_LEN` bytes, so the
/// default bound is generous; it exists so that exhaustion is a typed error
/// instead of an unchecked write.
pub const FINGERPRINT_CAPACITY: usize = 256;

/// The ordered concatenation of one or more encoded keys.
///
/// No separators are inserted between keys; each encoding is self-describing
/// on the database side and the hash consumes the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    bytes: Vec<u8>,
    keys: usize,
}

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of keys folded into this fingerprint.
    pub fn key_count(&self) -> usize {
        self.keys
    }
}

/// Builds a [`Fingerprint`] by encoding keys in call order.
///
/// Every write is bounds-checked against the configured capacity; a failed
/// key aborts the build with the key's position attached to the error.
#[derive(Debug)]
pub struct FingerprintBuilder {
    bytes: Vec<u8>,
    capacity: usize,
    next_index: usize,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self::with_capacity(FINGERPRINT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity.min(FINGERPRINT_CAPACITY)),
            capacity,
            next_index: 0,
        }
    }

    /// Encodes `key` and appends its bytes to the fingerprint.
    pub fn push_key(&mut self, key: i64) -> ShardResult<()> {
        let index = self.next_index;
        let mut scratch = [0u8; MAX_ENCODED_LEN];
        let len = number::encode_into(key, &mut scratch)
            .map_err(|source| ShardError::EncodingOverflow { index, source })?;

        if self.bytes.len() + len > self.capacity {
            return Err(ShardError::BufferExhausted {
                index,
                capacity: self.capacity,
            });
        }

        self.bytes.extend_from_slice(&scratch[..len]);
        self.next_index += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint {
            bytes: self.bytes,
            keys: self.next_index,
        }
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::number;

    #[test]
    fn keys_are_concatenated_in_call_order() {
        let mut builder = FingerprintBuilder::new();
        builder.push_key(42).unwrap();
        builder.push_key(-3).unwrap();
        let fingerprint = builder.finish();

        let mut expected = [0u8; MAX_ENCODED_LEN * 2];
        let first = number::encode_into(42, &mut expected).unwrap();
        let second = number::encode_into(-3, &mut expected[first..]).unwrap();
        assert_eq!(fingerprint.as_bytes(), &expected[..first + second]);
        assert_eq!(fingerprint.key_count(), 2);
    }

    #[test]
    fn reordered_keys_produce_different_fingerprints() {
        let mut forward = FingerprintBuilder::new();
        forward.push_key(7).unwrap();
        forward.push_key(-3).unwrap();

        let mut reversed = FingerprintBuilder::new();
        reversed.push_key(-3).unwrap();
        reversed.push_key(7).unwrap();

        assert_ne!(forward.finish(), reversed.finish());
    }

    #[test]
    fn exhaustion_reports_the_offending_key_index() {
        // Each key encodes to ten bytes, so the second one cannot fit in 16.
        let key = 123_456_789_012_345_678;
        let mut builder = FingerprintBuilder::with_capacity(16);
        builder.push_key(key).unwrap();
        let err = builder.push_key(key).unwrap_err();
        match err {
            ShardError::BufferExhausted { index, capacity } => {
                assert_eq!(index, 1);
                assert_eq!(capacity, 16);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encoding_failure_carries_the_key_position() {
        let mut builder = FingerprintBuilder::with_capacity(0);
        let err = builder.push_key(1).unwrap_err();
        assert!(matches!(err, ShardError::BufferExhausted { index: 0, .. }));
    }
}
