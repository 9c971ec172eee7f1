//! Uniform without-replacement sampling.

use rand::Rng;

/// Draws `k` items uniformly without replacement.
///
/// Runs a partial Fisher–Yates shuffle: only the first `min(k, len)`
/// positions are settled, then the vector is truncated. Every subset of
/// size `k` is equally likely; the order of the result is arbitrary.
pub fn sample_uniform<T, R: Rng>(mut items: Vec<T>, k: usize, rng: &mut R) -> Vec<T> {
    let take = k.min(items.len());
    for i in 0..take {
        let j = rng.gen_range(i..items.len());
        items.swap(i, j);
    }
    items.truncate(take);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test_case(10, 3, 3; "k smaller than len")]
    #[test_case(10, 10, 10; "k equals len")]
    #[test_case(4, 9, 4; "k larger than len")]
    #[test_case(0, 5, 0; "empty input")]
    #[test_case(7, 0, 0; "zero k")]
    fn test_sample_size(len: usize, k: usize, expected: usize) {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<usize> = (0..len).collect();
        let sampled = sample_uniform(items, k, &mut rng);
        assert_eq!(sampled.len(), expected);
    }

    #[test]
    fn test_sample_distinct_and_from_input() {
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<usize> = (0..100).collect();
        let sampled = sample_uniform(items, 25, &mut rng);

        let unique: HashSet<_> = sampled.iter().copied().collect();
        assert_eq!(unique.len(), 25);
        assert!(sampled.iter().all(|n| *n < 100));
    }

    #[test]
    fn test_full_sample_is_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<usize> = (0..50).collect();
        let mut sampled = sample_uniform(items, 50, &mut rng);
        sampled.sort_unstable();
        assert_eq!(sampled, (0..50).collect::<Vec<_>>());
    }
}
