//! Per-agent random streams.
//!
//! The only randomness in a run is weighted source selection.  Each agent
//! draws from its own `SmallRng`, seeded from the run seed and its id as
//! `global_seed ^ (agent_id * MIXING_CONSTANT)`, so adding an agent never
//! perturbs the choices of the others and a seed replays exactly.

use rand::distributions::{Distribution, Standard, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// Fractional part of the golden ratio, as 64 bits.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// A uniform sample of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when `rand` rejects the weights: an empty slice, every
    /// weight zero, or a negative or NaN weight.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        WeightedIndex::new(weights)
            .ok()
            .map(|dist| dist.sample(&mut self.0))
    }
}
