//! Root seed handling and child generator derivation.
//!
//! One root seed (or OS entropy) produces a stream of independent child
//! seeds, one per sampler invocation, so variant rows are not correlated.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Deterministic source of child generators for one evaluation call.
#[derive(Debug, Clone)]
pub struct SeedSequence {
    root: StdRng,
}

impl SeedSequence {
    /// Seed from `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let root = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { root }
    }

    /// Next child seed.
    pub fn next_seed(&mut self) -> u64 {
        self.root.next_u64()
    }

    /// Spawn `n` child generators.
    pub fn spawn(&mut self, n: usize) -> Vec<StdRng> {
        (0..n)
            .map(|_| StdRng::seed_from_u64(self.next_seed()))
            .collect()
    }
}
