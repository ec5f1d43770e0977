//! Random swap sequence generation.
//!
//! Produces the fully materialized list of exchanges played back during
//! the swapping phase. Consecutive entries may repeat or reverse each other;
//! no de-duplication is applied.

use rand::Rng;

use super::slot::SwapOp;

/// Generates `swap_count` random exchanges among `slot_count` slots.
///
/// Each pair is drawn by picking both indices uniformly and resampling
/// until they differ. Fewer than two slots cannot form a pair, in which
/// case the sequence is empty.
pub fn generate<R: Rng + ?Sized>(slot_count: usize, swap_count: usize, rng: &mut R) -> Vec<SwapOp> {
    if slot_count < 2 {
        return Vec::new();
    }

    (0..swap_count)
        .map(|_| loop {
            let a = rng.random_range(0..slot_count);
            let b = rng.random_range(0..slot_count);
            if let Some(swap) = SwapOp::new(a, b) {
                break swap;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn three_slots_four_swaps() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let swaps = generate(3, 4, &mut rng);
            assert_eq!(swaps.len(), 4);
            for s in swaps {
                assert_ne!(s.first(), s.second());
                assert!(s.first().get() < 3);
                assert!(s.second().get() < 3);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = generate(5, 10, &mut StdRng::seed_from_u64(7));
        let b = generate(5, 10, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_swaps_is_empty() {
        assert!(generate(3, 0, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn degenerate_slot_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(1, 4, &mut rng).is_empty());
        assert!(generate(0, 4, &mut rng).is_empty());
    }

    #[test]
    fn two_slots_always_swap_the_pair() {
        let swaps = generate(2, 16, &mut StdRng::seed_from_u64(3));
        assert_eq!(swaps.len(), 16);
        for s in swaps {
            assert_eq!(s.first().get() + s.second().get(), 1);
        }
    }

    proptest! {
        #[test]
        fn pairs_are_distinct_and_in_range(
            slots in 2usize..10,
            count in 0usize..32,
            seed in any::<u64>(),
        ) {
            let swaps = generate(slots, count, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(swaps.len(), count);
            for s in swaps {
                prop_assert_ne!(s.first(), s.second());
                prop_assert!(s.first().get() < slots);
                prop_assert!(s.second().get() < slots);
            }
        }
    }
}
