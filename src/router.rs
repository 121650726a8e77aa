//! The fingerprint-hash-classify pipeline.

use crate::codec::FingerprintBuilder;
use crate::error::{ShardError, ShardResult};
use crate::hash::mixing_hash;
use crate::range::in_range;
use crate::runtime::EncodingRuntime;

/// Maximum number of keys a composite shard key may carry.
pub const MAX_KEYS: usize = 3;

/// Returns whether the shard owning `keys` covers the interval `[low, high]`.
///
/// Equivalent to [`hash_keys`] followed by [`in_range`]; failures propagate
/// and are never collapsed into a `false` classification.
pub fn classify(keys: &[i64], low: i64, high: i64) -> ShardResult<bool> {
    let hash = hash_keys(keys)?;
    Ok(in_range(hash, low, high))
}

/// Hashes 1 to [`MAX_KEYS`] keys the way the database engine hashes them.
pub fn hash_keys(keys: &[i64]) -> ShardResult<u32> {
    hash_keys_with(EncodingRuntime::global(), keys)
}

/// [`hash_keys`] against an explicit runtime instead of the global one.
pub fn hash_keys_with(runtime: &EncodingRuntime, keys: &[i64]) -> ShardResult<u32> {
    if keys.is_empty() || keys.len() > MAX_KEYS {
        return Err(ShardError::InvalidKeyCount { count: keys.len() });
    }

    let fingerprint = runtime.with_thread_handle(|handle| {
        let mut builder = FingerprintBuilder::new();
        for &key in keys {
            if let Err(err) = builder.push_key(key) {
                handle.record_failure(&err);
                return Err(err);
            }
        }
        Ok(builder.finish())
    })??;

    let hash = mixing_hash(fingerprint.as_bytes(), 0);
    tracing::debug!(
        keys = keys.len(),
        fingerprint_len = fingerprint.len(),
        hash,
        "hashed shard keys"
    );
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_too_many_keys() {
        for keys in [&[][..], &[1, 2, 3, 4][..]] {
            match hash_keys(keys) {
                Err(ShardError::InvalidKeyCount { count }) => assert_eq!(count, keys.len()),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn key_order_is_significant() {
        let forward = hash_keys(&[7, -3]).unwrap();
        let reversed = hash_keys(&[-3, 7]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn hash_matches_the_manual_pipeline() {
        let mut builder = FingerprintBuilder::new();
        builder.push_key(42).unwrap();
        let manual = mixing_hash(builder.finish().as_bytes(), 0);
        assert_eq!(hash_keys(&[42]).unwrap(), manual);
    }

    #[test]
    fn failures_reach_the_thread_diagnostic() {
        let runtime = EncodingRuntime::global();
        let before = runtime.thread_diagnostic();
        // Forcing a failure through the public surface requires the builder
        // path, so drive it directly with an exhausted capacity.
        runtime
            .with_thread_handle(|handle| {
                let err = ShardError::BufferExhausted {
                    index: 0,
                    capacity: 1,
                };
                handle.record_failure(&err);
            })
            .unwrap();
        assert_ne!(runtime.thread_diagnostic(), before);
    }
}
