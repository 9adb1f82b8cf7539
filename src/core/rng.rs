//! Deterministic random number generation with forking per session.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical decks
//! - **Forkable**: Each session draws from its own independent stream
//! - **Unbiased**: Shuffles are Fisher–Yates, draws are without replacement
//!
//! ## Usage
//!
//! ```
//! use memory_match::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Fork for a new session
//! let mut session_rng = rng.fork();
//!
//! // Forks are deterministic - same seed and fork counter = same sequence
//! let mut rng2 = GameRng::new(42);
//! let mut session_rng2 = rng2.fork();
//! assert_eq!(session_rng.gen_range_usize(0..100), session_rng2.gen_range_usize(0..100));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG with forking for successive sessions.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher–Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Draw `amount` distinct indices from `0..length`.
    ///
    /// Panics if `amount > length`; callers guard the range first.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.inner, length, amount).into_vec()
    }
}
