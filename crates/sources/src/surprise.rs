//! Uniform random pick among candidates.
//!
//! The random source is always passed in, so a seeded `StdRng` makes the
//! pick reproducible.

use crate::types::Candidate;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Pick one candidate uniformly at random, or `None` if there are none.
pub fn pick_random<'c, R: Rng + ?Sized>(
    candidates: &'c [Candidate],
    rng: &mut R,
) -> Option<&'c Candidate> {
    candidates.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CandidateSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n).map(|i| Candidate::new(i, CandidateSource::Catalog, 0.0)).collect()
    }

    #[test]
    fn test_same_seed_same_pick() {
        let pool = candidates(50);
        let a = pick_random(&pool, &mut StdRng::seed_from_u64(11)).map(|c| c.index);
        let b = pick_random(&pool, &mut StdRng::seed_from_u64(11)).map(|c| c.index);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn test_empty_pool() {
        assert!(pick_random(&[], &mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_single_candidate_is_always_picked() {
        let pool = candidates(1);
        for seed in 0..10 {
            assert_eq!(
                pick_random(&pool, &mut StdRng::seed_from_u64(seed)).unwrap().index,
                0
            );
        }
    }
}
