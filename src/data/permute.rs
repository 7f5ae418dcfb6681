use rand::Rng;

/// Durstenfeld's in-place Fisher-Yates shuffle.
///
/// Every permutation of `items` is equally likely, given a uniform `rng`.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..20 {
            let mut items: Vec<usize> = (0..len).map(|n| n % 5).collect();
            let mut expected = items.clone();
            shuffle(&mut items, &mut rng);

            items.sort();
            expected.sort();
            assert_eq!(items, expected);
        }
    }

    #[test]
    fn test_empty_and_single_element() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![42];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn test_every_permutation_is_reachable_and_balanced() {
        const TRIALS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<[u8; 4], usize> = HashMap::new();

        for _ in 0..TRIALS {
            let mut items = [0u8, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            *counts.entry(items).or_default() += 1;
        }

        // 4! permutations, each expected 2500 times.
        assert_eq!(counts.len(), 24);
        let expected = TRIALS / 24;
        for (perm, count) in counts {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 10,
                "permutation {:?} seen {} times, expected about {}",
                perm,
                count,
                expected
            );
        }
    }
}
