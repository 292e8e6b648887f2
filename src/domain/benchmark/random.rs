use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used when the page does not pick one.
pub const DEFAULT_RANDOM_SEED: u64 = 1;

/// Stand-in for `Math.random`. The same seed yields the same sequence on
/// every run, so randomized scenes still end on the reference frame.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_SEED)
    }
}
