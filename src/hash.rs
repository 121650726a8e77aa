//! 32-bit mixing hash over key fingerprints.
//!
//! Jenkins lookup2-family avalanche hash, the function the database engine
//! applies internally to partition-key fingerprints. The mixing constants
//! are part of the wire contract: any deviation silently disagrees with the
//! server about shard ownership, so they must never be "improved".

/// Initial value of the `a`/`b` accumulators (the golden ratio of 2^32).
const GOLDEN_RATIO: u32 = 0x9e37_79b9;

/// Hashes `data` to a 32-bit value.
///
/// Deterministic and total for any input length. The input is consumed in
/// 12-byte blocks read as three little-endian words; tail bytes are folded
/// in one at a time, and the total length is added into the final mixing
/// step so that equal prefixes of different lengths hash differently.
///
/// `seed` allows chaining (feed one call's output into the next); the
/// fingerprint pipeline always seeds with 0.
pub fn mixing_hash(data: &[u8], seed: u32) -> u32 {
    let mut a = GOLDEN_RATIO;
    let mut b = GOLDEN_RATIO;
    let mut c = seed;

    let mut blocks = data.chunks_exact(12);
    for block in &mut blocks {
        a = a.wrapping_add(u32::from_le_bytes(block[0..4].try_into().unwrap()));
        b = b.wrapping_add(u32::from_le_bytes(block[4..8].try_into().unwrap()));
        c = c.wrapping_add(u32::from_le_bytes(block[8..12].try_into().unwrap()));
        (a, b, c) = mix(a, b, c);
    }

    // The low byte of `c` is reserved for the length, so the tail
    // distributes at most 11 bytes across a, b and the top of c.
    c = c.wrapping_add(data.len() as u32);
    for (i, &byte) in blocks.remainder().iter().enumerate() {
        let word = u32::from(byte);
        match i {
            0..=3 => a = a.wrapping_add(word << (8 * i)),
            4..=7 => b = b.wrapping_add(word << (8 * (i - 4))),
            _ => c = c.wrapping_add(word << (8 * (i - 7))),
        }
    }
    (_, _, c) = mix(a, b, c);

    c
}

/// The reversible 96-bit mix at the heart of the hash.
#[inline]
fn mix(mut a: u32, mut b: u32, mut c: u32) -> (u32, u32, u32) {
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 13);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 8);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 13);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 12);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 16);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 5);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 3);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 10);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 15);
    (a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let buffers: [&[u8]; 5] = [
            &[],
            &[0x80],
            &[0xC1, 0x2B],
            &[0x3E, 0x62, 0x66],
            &[7u8; 64],
        ];
        for &buf in &buffers {
            for seed in [0, 1, 0xDEAD_BEEF] {
                assert_eq!(mixing_hash(buf, seed), mixing_hash(buf, seed));
            }
        }
    }

    #[test]
    fn hash_is_total_up_to_fingerprint_capacity() {
        for len in 0..=crate::codec::FINGERPRINT_CAPACITY {
            let buf: Vec<u8> = (0..len).map(|i| i as u8).collect();
            mixing_hash(&buf, 0);
        }
    }

    #[test]
    fn length_is_folded_into_the_result() {
        assert_ne!(mixing_hash(&[1, 2, 3], 0), mixing_hash(&[1, 2, 3, 0], 0));
        assert_ne!(mixing_hash(&[], 0), mixing_hash(&[0], 0));
    }

    #[test]
    fn seed_changes_the_result() {
        let buf = [0xC1, 0x2B];
        assert_ne!(mixing_hash(&buf, 0), mixing_hash(&buf, 1));
    }

    #[test]
    fn single_bit_flips_propagate() {
        let base = [0u8; 13];
        let reference = mixing_hash(&base, 0);
        for byte in 0..base.len() {
            for bit in 0..8 {
                let mut flipped = base;
                flipped[byte] ^= 1 << bit;
                assert_ne!(
                    mixing_hash(&flipped, 0),
                    reference,
                    "flip at byte {byte} bit {bit} collided"
                );
            }
        }
    }

    #[test]
    fn block_boundaries_are_exercised() {
        // 11, 12 and 13 bytes cover the tail-only, exact-block and
        // block-plus-tail paths; all must differ.
        let buf = [0x55u8; 13];
        let h11 = mixing_hash(&buf[..11], 0);
        let h12 = mixing_hash(&buf[..12], 0);
        let h13 = mixing_hash(&buf, 0);
        assert_ne!(h11, h12);
        assert_ne!(h12, h13);
        assert_ne!(h11, h13);
    }

    #[test]
    fn chaining_seeds_compose_deterministically() {
        let first = mixing_hash(&[0xC1, 0x2B], 0);
        let chained = mixing_hash(&[0x3E, 0x62, 0x66], first);
        assert_eq!(chained, mixing_hash(&[0x3E, 0x62, 0x66], first));
        assert_ne!(chained, mixing_hash(&[0x3E, 0x62, 0x66], 0));
    }
}
