//! # Orashard
//!
//! Client-side shard routing for Oracle-style hash partitioning. Answers
//! "which shard would own this row's key?" without touching the database:
//! keys are encoded in the engine's internal NUMBER wire format,
//! concatenated into a fingerprint, reduced with the engine's 32-bit mixing
//! hash, and classified against a shard's inclusive hash range.
//!
//! ## Quick start
//!
//! ```
//! use orashard::HashRange;
//!
//! // Hash a composite key exactly as the server would.
//! let hash = orashard::hash_keys(&[42])?;
//! assert_eq!(hash, orashard::hash_keys(&[42])?);
//!
//! // Does the shard covering the full signed space own it? (Always yes.)
//! let owned = orashard::classify(&[42], HashRange::FULL.low, HashRange::FULL.high)?;
//! assert!(owned);
//! # Ok::<(), orashard::ShardError>(())
//! ```
//!
//! All pipeline stages are pure given their inputs and safe to call from
//! any number of threads; the only shared state is the lazily initialized
//! [`EncodingRuntime`], which hands each thread a private error handle.
//!
//! This crate performs no network routing and keeps no shard map: range
//! boundaries are caller-supplied and taken literally.

pub mod codec;
pub mod error;
pub mod hash;
pub mod range;
pub mod router;
pub mod runtime;

pub use codec::{Fingerprint, FingerprintBuilder, NumberError, FINGERPRINT_CAPACITY};
pub use error::{ShardError, ShardResult};
pub use hash::mixing_hash;
pub use range::{in_range, HashRange};
pub use router::{classify, hash_keys, hash_keys_with, MAX_KEYS};
pub use runtime::{EncodingRuntime, ErrorHandle};
