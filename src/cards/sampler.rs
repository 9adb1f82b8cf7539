//! Unique catalog draws.

use thiserror::Error;

use crate::core::{GameRng, PokemonId};

/// Errors from drawing catalog ids.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("cannot draw {requested} unique ids from a catalog of {available}")]
    InsufficientRange { requested: usize, available: u32 },
}

/// Draws distinct catalog ids uniformly from `1..=max_id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomCatalogSampler;

impl RandomCatalogSampler {
    /// Draw `count` distinct ids in `1..=max_id`, without replacement.
    ///
    /// ```
    /// use memory_match::cards::RandomCatalogSampler;
    /// use memory_match::core::GameRng;
    ///
    /// let mut rng = GameRng::new(1);
    /// let ids = RandomCatalogSampler::sample(4, 151, &mut rng).unwrap();
    /// assert_eq!(ids.len(), 4);
    /// assert!(ids.iter().all(|id| (1..=151).contains(&id.raw())));
    ///
    /// assert!(RandomCatalogSampler::sample(5, 4, &mut rng).is_err());
    /// ```
    pub fn sample(count: usize, max_id: u32, rng: &mut GameRng) -> Result<Vec<PokemonId>, SampleError> {
        if count > max_id as usize {
            return Err(SampleError::InsufficientRange {
                requested: count,
                available: max_id,
            });
        }

        let ids = rng
            .sample_indices(max_id as usize, count)
            .into_iter()
            .map(|index| PokemonId::new(index as u32 + 1))
            .collect();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_sample_is_unique_and_in_range() {
        let mut rng = GameRng::new(42);
        let ids = RandomCatalogSampler::sample(10, 12, &mut rng).unwrap();

        let unique: FxHashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(ids.iter().all(|id| id.raw() >= 1 && id.raw() <= 12));
    }

    #[test]
    fn test_sample_whole_range() {
        let mut rng = GameRng::new(3);
        let mut ids: Vec<u32> = RandomCatalogSampler::sample(5, 5, &mut rng)
            .unwrap()
            .into_iter()
            .map(PokemonId::raw)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sample_insufficient_range() {
        let mut rng = GameRng::new(3);
        let err = RandomCatalogSampler::sample(11, 10, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SampleError::InsufficientRange {
                requested: 11,
                available: 10
            }
        );
    }

    #[test]
    fn test_sample_zero() {
        let mut rng = GameRng::new(3);
        assert!(RandomCatalogSampler::sample(0, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = RandomCatalogSampler::sample(6, 1000, &mut GameRng::new(9)).unwrap();
        let b = RandomCatalogSampler::sample(6, 1000, &mut GameRng::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_covers_range() {
        // Every id in a small range shows up over repeated draws.
        let mut rng = GameRng::new(11);
        let mut seen = FxHashSet::default();
        for _ in 0..200 {
            seen.extend(RandomCatalogSampler::sample(2, 8, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 8);
    }
}
