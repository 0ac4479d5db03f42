//! Seedable random source for card draws.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical draws
//! - **Forkable**: A process-wide master hands each request its own stream
//! - **Serializable**: O(1) state capture to reproduce a reading
//!
//! ## Usage
//!
//! ```
//! use tarot_spread::core::DrawRng;
//!
//! let mut master = DrawRng::new(42);
//!
//! // Each request gets an independent stream
//! let mut request_rng = master.fork();
//! let picked = request_rng.sample_indices(78, 3);
//! assert_eq!(picked.len(), 3);
//!
//! // Forks are deterministic - same fork counter = same stream
//! let mut master2 = DrawRng::new(42);
//! let mut request_rng2 = master2.fork();
//! assert_eq!(request_rng2.sample_indices(78, 3), picked);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index buffer sized for the largest built-in layout.
pub type IndexBuf = SmallVec<[usize; 12]>;

/// Deterministic RNG used by the draw engine.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct DrawRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl DrawRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from OS entropy.
    ///
    /// Production readings use this; the seed is still recorded so a
    /// reading can be reproduced from its `state()`.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Create from an optional seed, falling back to entropy.
    #[must_use]
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Fork this RNG to create an independent stream.
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

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Pick `count` distinct indices from `0..len`, in draw order.
    ///
    /// Partial Fisher-Yates: the result is a uniform prefix of a uniform
    /// permutation, so every subset and every ordering of it is equally likely.
    /// Callers must ensure `count <= len`.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> IndexBuf {
        debug_assert!(count <= len, "sample of {count} from {len}");

        let mut pool: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = self.inner.gen_range(i..len);
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool.into_iter().collect()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> DrawRngState {
        DrawRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DrawRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state for reproducing a reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}
