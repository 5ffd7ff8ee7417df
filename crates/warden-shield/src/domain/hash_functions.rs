//! Hash functions for the Bloom filter
//!
//! Uses MurmurHash3 (x64, 128-bit, lower 64 bits kept) for fast,
//! non-cryptographic hashing. Two base hashes are taken per item: the
//! plain content, and the content with one salt byte appended. The k bit
//! positions are then derived by double hashing (Kirsch–Mitzenmacher).

use std::io::{Cursor, Read};

/// Byte appended to the content to derive the second base hash
pub const SALT_BYTE: u8 = 0x01;

const SEED: u32 = 0;

fn murmur_hash<R: Read>(mut source: R) -> u64 {
    // Reads from in-memory slices cannot fail.
    murmur3::murmur3_x64_128(&mut source, SEED).unwrap_or(0) as u64
}

/// Compute the two base hashes `(h1, h2)` for an item
///
/// Deterministic: identical bytes always yield identical pairs.
pub fn base_hashes(item: &[u8]) -> (u64, u64) {
    let h1 = murmur_hash(Cursor::new(item));
    let salt = [SALT_BYTE];
    let h2 = murmur_hash(Cursor::new(item).chain(Cursor::new(&salt[..])));
    (h1, h2)
}

/// Derive the `k` bit indices for an item in a filter of `m` bits
///
/// Index `i` is `(h1 + i * h2) mod m` using wrapping 64-bit arithmetic.
pub fn bit_indices(item: &[u8], k: u32, m: u64) -> impl Iterator<Item = u64> {
    let (h1, h2) = base_hashes(item);
    (0..u64::from(k)).map(move |i| h1.wrapping_add(i.wrapping_mul(h2)) % m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_base_hashes_deterministic() {
        let data = b"Hello World!";
        assert_eq!(base_hashes(data), base_hashes(data));
    }

    #[test]
    fn test_base_hashes_differ_for_different_inputs() {
        let (h1a, h2a) = base_hashes(b"Hello World");
        let (h1b, h2b) = base_hashes(b"Hello World!");

        assert_ne!(h1a, h1b, "h1 should differ for different inputs");
        assert_ne!(h2a, h2b, "h2 should differ for different inputs");
    }

    #[test]
    fn test_salted_hash_differs_from_plain_hash() {
        for item in [&b""[..], b"a", b"user_0", b"0xABCD1234567890"] {
            let (h1, h2) = base_hashes(item);
            assert_ne!(h1, h2, "salting must separate h1 and h2 for {:?}", item);
        }
    }

    #[test]
    fn test_salt_is_appended_not_prepended() {
        let mut salted = b"user_42".to_vec();
        salted.push(SALT_BYTE);

        let (_, h2) = base_hashes(b"user_42");
        let (plain_of_salted, _) = base_hashes(&salted);
        assert_eq!(h2, plain_of_salted);
    }

    #[test]
    fn test_sample_strings_do_not_collide() {
        let samples: Vec<String> = (0..10_000).map(|i| format!("user_{}", i)).collect();
        let pairs: HashSet<(u64, u64)> =
            samples.iter().map(|s| base_hashes(s.as_bytes())).collect();
        assert_eq!(pairs.len(), samples.len());
    }

    #[test]
    fn test_bit_indices_in_bounds() {
        let m = 9_586;
        let indices: Vec<u64> = bit_indices(b"test_address_0xABCD", 7, m).collect();

        assert_eq!(indices.len(), 7, "Should produce k indices");
        for idx in &indices {
            assert!(*idx < m, "Index {} should be < m={}", idx, m);
        }

        let unique: HashSet<_> = indices.iter().collect();
        assert!(unique.len() >= 3, "Double hashing should spread positions");
    }

    #[test]
    fn test_first_index_is_h1_mod_m() {
        let m = 1_000;
        let (h1, h2) = base_hashes(b"element");
        let indices: Vec<u64> = bit_indices(b"element", 3, m).collect();

        assert_eq!(indices[0], h1 % m);
        assert_eq!(indices[1], h1.wrapping_add(h2) % m);
        assert_eq!(indices[2], h1.wrapping_add(h2.wrapping_mul(2)) % m);
    }

    #[test]
    fn test_index_uniformity() {
        let m = 1000;
        let mut counts = vec![0usize; 10];

        for i in 0..1000 {
            let element = format!("element_{}", i);
            for idx in bit_indices(element.as_bytes(), 7, m) {
                counts[(idx / 100) as usize] += 1;
            }
        }

        // ~700 per bucket; allow 50% variance
        for (i, count) in counts.iter().enumerate() {
            assert!(
                (350..=1050).contains(count),
                "Bucket {} has {} entries, expected ~700",
                i,
                count
            );
        }
    }

    proptest! {
        #[test]
        fn prop_base_hashes_deterministic(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(base_hashes(&data), base_hashes(&data));
        }

        #[test]
        fn prop_bit_indices_within_m(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            k in 1u32..20,
            m in 1u64..100_000,
        ) {
            for idx in bit_indices(&data, k, m) {
                prop_assert!(idx < m);
            }
        }
    }
}
