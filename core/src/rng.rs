//! Randomness helpers: process-unique cell keys and seeded generators.

use core::sync::atomic::{AtomicU64, Ordering};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::CellKey;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Hands out a key no other cell in this process has.
pub fn unique_key() -> CellKey {
    CellKey::from_raw(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
}

/// Deterministic generator for a given seed.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::Rng;
    use rand::seq::SliceRandom;

    #[test]
    fn unique_keys_do_not_repeat() {
        let keys: Vec<_> = (0..100).map(|_| unique_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        let mut c = seeded_rng(43);
        let first: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let second: Vec<u64> = (0..8).map(|_| b.random()).collect();
        let other: Vec<u64> = (0..8).map(|_| c.random()).collect();
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn shuffle_permutations_are_uniform() {
        const TRIALS: usize = 6000;
        let mut rng = seeded_rng(1234);
        let mut counts = vec![0usize; 6];

        for _ in 0..TRIALS {
            let mut items = [0u8, 1, 2];
            items.shuffle(&mut rng);
            let slot = match items {
                [0, 1, 2] => 0,
                [0, 2, 1] => 1,
                [1, 0, 2] => 2,
                [1, 2, 0] => 3,
                [2, 0, 1] => 4,
                _ => 5,
            };
            counts[slot] += 1;
        }

        // expected 1000 each, sd ~29
        for count in counts {
            assert!((850..=1150).contains(&count), "skewed count {count}");
        }
    }
}
