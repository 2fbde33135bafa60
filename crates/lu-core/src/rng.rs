//! The simulation's single random stream.
//!
//! # Determinism strategy
//!
//! The orchestrator owns exactly one [`SimRng`], seeded from
//! `RunConfig::seed`, and lends it (`&mut`) to every model in a fixed order.
//! Because dispatch order is deterministic, the sequence of draws is too:
//! two runs with the same seed produce identical populations.
//!
//! Parallel candidate generation must not touch the shared stream.  Derive
//! one [`SimRng::child`] per worker *before* spawning, in a fixed order.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded random source lent to every model through its context.
///
/// Not `Sync`; hand workers their own [`child`][Self::child] streams.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream.  Consumes one draw from `self`, so
    /// children must be derived in a fixed order to stay reproducible.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// The underlying generator, for `rand` distributions.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// `true` with probability `p`; `p` outside [0, 1] is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }

    /// A uniformly chosen element, `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}
