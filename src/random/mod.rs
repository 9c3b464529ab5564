//! Independent, reproducible random number streams.
//!
//! Every consumer of randomness (particle placement, initial velocities, index case selection)
//! draws from its own stream, so adding draws to one of them does not perturb the others. A
//! stream is identified by a type declared with [`define_rng!`], and is seeded lazily with the
//! base seed offset by a hash of the stream's name.
mod macros;

use std::any::{Any, TypeId};

use log::trace;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};

pub use macros::define_rng;

use crate::hashing::{hash_str, HashMap};

pub trait RngId: Copy + Clone + 'static {
    type RngType: SeedableRng + Any;
    fn get_name() -> &'static str;
}

// This is a wrapper that allows for future support for different types of
// random number generators (anything that implements SeedableRng is valid).
struct RngHolder {
    rng: Box<dyn Any>,
}

/// Holds a base seed and the rngs created from it, keyed by their `RngId`.
pub struct RngStreams {
    base_seed: u64,
    rng_holders: HashMap<TypeId, RngHolder>,
}

impl RngStreams {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        RngStreams {
            base_seed,
            rng_holders: HashMap::default(),
        }
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    fn get_rng<R: RngId>(&mut self) -> &mut R::RngType {
        let base_seed = self.base_seed;
        self.rng_holders
            .entry(TypeId::of::<R>())
            .or_insert_with(|| {
                trace!("creating new RNG (seed={base_seed}) for {}", R::get_name());
                let seed_offset = hash_str(R::get_name());
                RngHolder {
                    rng: Box::new(R::RngType::seed_from_u64(
                        base_seed.wrapping_add(seed_offset),
                    )),
                }
            })
            .rng
            .downcast_mut::<R::RngType>()
            .unwrap()
    }

    /// Applies `sampler` to the rng associated with the given [`RngId`].
    pub fn sample<R: RngId, T>(
        &mut self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        sampler(self.get_rng::<R>())
    }

    /// Gets a random sample within `range` using the rng associated with the given [`RngId`].
    pub fn sample_range<R: RngId, S, T>(&mut self, rng_id: R, range: S) -> T
    where
        R::RngType: Rng,
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }
}

impl Default for RngStreams {
    fn default() -> Self {
        RngStreams::new(0)
    }
}
