//! Random number sources.
//!
//! Effects never call a global RNG. They draw from the `RandomSource` the
//! session was built with:
//!
//! - `GameRng`: deterministic ChaCha8 stream, the production source
//! - `ScriptedRandom`: replays fixed values, for tests and replays
//!
//! ## Usage
//!
//! ```
//! use quiz_cards::core::{GameRng, RandomSource};
//!
//! let mut rng1 = GameRng::new(42);
//! let mut rng2 = GameRng::new(42);
//!
//! // Same seed, same sequence
//! assert_eq!(rng1.next_unit(), rng2.next_unit());
//! assert_eq!(rng1.next_index(10), rng2.next_index(10));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform randomness consumed by card effects and random draws.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// Choose an index with weighted probability.
    ///
    /// Draws a threshold in `[0, total)` and walks the running sum; the
    /// first positive entry whose cumulative weight reaches the threshold
    /// wins. Weights do not need to sum to 1.0.
    ///
    /// Returns `None` if weights are empty or all zero.
    fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }

        let threshold = self.next_unit() * total;
        let mut cumulative = 0.0;

        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if threshold <= cumulative {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
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
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

/// Replays scripted values.
///
/// Once a queue runs dry, `next_unit` returns `0.0` and `next_index`
/// returns `0`. Scripted indices are wrapped into range.
///
/// ```
/// use quiz_cards::core::{RandomSource, ScriptedRandom};
///
/// let mut rng = ScriptedRandom::new().with_units([0.49, 0.51]).with_indices([4]);
/// assert_eq!(rng.next_unit(), 0.49);
/// assert_eq!(rng.next_unit(), 0.51);
/// assert_eq!(rng.next_index(3), 1); // 4 wrapped into 0..3
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    units: VecDeque<f32>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue unit values (builder pattern).
    #[must_use]
    pub fn with_units(mut self, units: impl IntoIterator<Item = f32>) -> Self {
        self.units.extend(units);
        self
    }

    /// Queue index values (builder pattern).
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        let raw = self.indices.pop_front().unwrap_or(0);
        if len == 0 {
            0
        } else {
            raw % len
        }
    }
}
