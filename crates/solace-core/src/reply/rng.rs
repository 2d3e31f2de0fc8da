//! Injectable random source for length selection.
//!
//! Reply-length buckets and token budgets are drawn from weighted
//! distributions. Tests pin the seed to make every draw reproducible;
//! production uses an entropy seed.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seedable random source shared by the length selector.
///
/// Given the same seed, produces the same sequence of draws.
#[derive(Debug)]
pub struct ReplyRng {
    /// The original seed (for logging/reproduction).
    seed: u64,
    inner: Mutex<StdRng>,
}

impl ReplyRng {
    /// Create a seeded source with a reproducible draw sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        Self::seeded(seed)
    }

    /// The seed used to create this source.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1).
    pub fn roll(&self) -> f64 {
        self.inner.lock().unwrap().r#gen()
    }

    /// Bernoulli draw with the given probability of `true`.
    pub fn chance(&self, probability: f64) -> bool {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability must be in [0, 1]"
        );
        self.roll() < probability
    }

    /// Choose a uniformly random element from a slice.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.inner.lock().unwrap().gen_range(0..items.len());
        Some(&items[idx])
    }
}

impl Default for ReplyRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
