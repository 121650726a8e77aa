//! Key encoding primitives (NUMBER wire format, fingerprint assembly).

pub mod fingerprint;
pub mod number;

pub use fingerprint::{Fingerprint, FingerprintBuilder, FINGERPRINT_CAPACITY};
pub use number::NumberError;
