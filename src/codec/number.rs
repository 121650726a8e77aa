//! Oracle NUMBER internal representation for signed 64-bit integers.
//!
//! The encoded bytes must match what the database engine produces for the
//! same value, byte for byte: downstream hash values are only comparable to
//! server-side shard boundaries if the fingerprints agree. The format stores
//! the magnitude as base-100 "mantissa" digit groups behind a biased
//! exponent byte; negative values complement both and carry a trailing
//! terminator byte.

use thiserror::Error;

/// Reserved single-byte representation of zero.
pub const ZERO_BYTE: u8 = 0x80;

/// Maximum number of mantissa bytes the format can carry.
pub const MAX_MANTISSA_BYTES: usize = 20;

/// Largest possible encoding: exponent byte, full mantissa, terminator.
pub const MAX_ENCODED_LEN: usize = 1 + MAX_MANTISSA_BYTES + 1;

/// Exponent byte for a positive value is `193 + power`, where `power` is the
/// base-100 position of the leading mantissa group.
const POSITIVE_EXPONENT_BIAS: u8 = 193;

/// Exponent byte for a negative value is `62 - power` (the positive byte
/// complemented within the format's byte space).
const NEGATIVE_EXPONENT_BASE: u8 = 62;

/// Trailing byte appended to negative encodings that have room for it.
const NEGATIVE_TERMINATOR: u8 = 102;

/// Largest base-100 power the exponent byte can express.
const MAX_EXPONENT: usize = 62;

/// An i64 magnitude fits in at most ten base-100 groups (20 decimal digits).
const I64_MAX_GROUPS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("encoded NUMBER needs {needed} bytes but only {available} are available")]
    Overflow { needed: usize, available: usize },

    #[error("malformed NUMBER bytes: {reason}")]
    Malformed { reason: &'static str },
}

/// Encodes `value` into `out`, returning the number of bytes written.
///
/// The length is reported out of band; no length prefix enters the byte
/// stream (the hash stage consumes the raw mantissa-and-exponent bytes).
pub fn encode_into(value: i64, out: &mut [u8]) -> Result<usize, NumberError> {
    if value == 0 {
        if out.is_empty() {
            return Err(NumberError::Overflow {
                needed: 1,
                available: 0,
            });
        }
        out[0] = ZERO_BYTE;
        return Ok(1);
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();

    // Decompose into base-100 groups, least significant first.
    let mut groups = [0u8; I64_MAX_GROUPS];
    let mut count = 0;
    while magnitude > 0 {
        groups[count] = (magnitude % 100) as u8;
        magnitude /= 100;
        count += 1;
    }
    groups[..count].reverse();

    // Trailing zero groups are never stored; the exponent keeps the position.
    let mut len = count;
    while len > 0 && groups[len - 1] == 0 {
        len -= 1;
    }

    encode_groups(negative, count - 1, &groups[..len], out)
}

/// Encodes a sign, a leading-group power and a most-significant-first slice
/// of base-100 mantissa groups. Split out of [`encode_into`] so the format
/// limits can be exercised directly.
pub(crate) fn encode_groups(
    negative: bool,
    power: usize,
    mantissa: &[u8],
    out: &mut [u8],
) -> Result<usize, NumberError> {
    debug_assert!(!mantissa.is_empty(), "zero is encoded separately");

    if mantissa.len() > MAX_MANTISSA_BYTES {
        return Err(NumberError::Overflow {
            needed: 1 + mantissa.len(),
            available: MAX_ENCODED_LEN,
        });
    }
    if power > MAX_EXPONENT {
        return Err(NumberError::Overflow {
            needed: power + 1,
            available: MAX_EXPONENT + 1,
        });
    }

    let terminated = negative && mantissa.len() < MAX_MANTISSA_BYTES;
    let total = 1 + mantissa.len() + usize::from(terminated);
    if total > out.len() {
        return Err(NumberError::Overflow {
            needed: total,
            available: out.len(),
        });
    }

    if negative {
        out[0] = NEGATIVE_EXPONENT_BASE - power as u8;
        for (slot, &group) in out[1..].iter_mut().zip(mantissa) {
            *slot = 101 - group;
        }
        if terminated {
            out[1 + mantissa.len()] = NEGATIVE_TERMINATOR;
        }
    } else {
        out[0] = POSITIVE_EXPONENT_BIAS + power as u8;
        for (slot, &group) in out[1..].iter_mut().zip(mantissa) {
            *slot = group + 1;
        }
    }

    Ok(total)
}

/// Decodes an integer NUMBER encoding back to the original value.
///
/// Exact inverse of [`encode_into`] for every encodable `i64`; used by
/// diagnostics and for round-trip verification. Fractional encodings and
/// magnitudes beyond `i64` are rejected as malformed.
pub fn decode(bytes: &[u8]) -> Result<i64, NumberError> {
    let (&exponent, rest) = bytes.split_first().ok_or(NumberError::Malformed {
        reason: "empty input",
    })?;

    if exponent == ZERO_BYTE {
        if !rest.is_empty() {
            return Err(NumberError::Malformed {
                reason: "zero carries no mantissa",
            });
        }
        return Ok(0);
    }

    if exponent & 0x80 != 0 {
        let power = exponent
            .checked_sub(POSITIVE_EXPONENT_BIAS)
            .ok_or(NumberError::Malformed {
                reason: "positive exponent below integer range",
            })? as usize;
        let magnitude = decode_magnitude(rest, power, |byte| {
            byte.checked_sub(1).filter(|digit| *digit < 100)
        })?;
        i64::try_from(magnitude).map_err(|_| NumberError::Malformed {
            reason: "magnitude exceeds i64",
        })
    } else {
        if exponent > NEGATIVE_EXPONENT_BASE {
            return Err(NumberError::Malformed {
                reason: "negative exponent below integer range",
            });
        }
        let power = (NEGATIVE_EXPONENT_BASE - exponent) as usize;
        let mantissa = match rest.split_last() {
            Some((&NEGATIVE_TERMINATOR, head)) => head,
            // Only a full-width mantissa may omit the terminator.
            _ if rest.len() == MAX_MANTISSA_BYTES => rest,
            _ => {
                return Err(NumberError::Malformed {
                    reason: "missing negative terminator",
                })
            }
        };
        let magnitude = decode_magnitude(mantissa, power, |byte| {
            101u8.checked_sub(byte).filter(|digit| *digit < 100)
        })?;
        i64::try_from(-magnitude).map_err(|_| NumberError::Malformed {
            reason: "magnitude exceeds i64",
        })
    }
}

fn decode_magnitude(
    mantissa: &[u8],
    power: usize,
    digit_of: impl Fn(u8) -> Option<u8>,
) -> Result<i128, NumberError> {
    if mantissa.is_empty() {
        return Err(NumberError::Malformed {
            reason: "empty mantissa",
        });
    }
    if mantissa.len() > MAX_MANTISSA_BYTES {
        return Err(NumberError::Malformed {
            reason: "mantissa longer than format maximum",
        });
    }
    if mantissa.len() > power + 1 {
        return Err(NumberError::Malformed {
            reason: "fractional NUMBER is not an integer key",
        });
    }

    let mut magnitude: i128 = 0;
    for &byte in mantissa {
        let digit = digit_of(byte).ok_or(NumberError::Malformed {
            reason: "mantissa byte out of range",
        })?;
        magnitude = magnitude
            .checked_mul(100)
            .and_then(|m| m.checked_add(i128::from(digit)))
            .ok_or(NumberError::Malformed {
                reason: "magnitude exceeds i64",
            })?;
    }
    // Restore the trailing zero groups the encoder stripped.
    for _ in mantissa.len()..=power {
        magnitude = magnitude.checked_mul(100).ok_or(NumberError::Malformed {
            reason: "magnitude exceeds i64",
        })?;
    }

    Ok(magnitude)
}
