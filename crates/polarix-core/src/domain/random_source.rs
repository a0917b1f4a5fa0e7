use rand::distr::{Distribution, StandardUniform, uniform::SampleUniform};
use rand::rngs::{SmallRng, SysRng};
use rand::seq::SliceRandom;
use rand::{Rng, RngExt, SeedableRng};
use std::ops::Range;

/// An owned random number generator.
///
/// Every optimization task owns its own `RandomSource`, reseeded from a seed
/// the engine draws serially before dispatch. That keeps a run with a fixed
/// master seed reproducible under any thread scheduling: no generator state
/// is ever shared between tasks.
#[derive(Debug, Clone)]
pub struct RandomSource(SmallRng);

impl RandomSource {
    /// A source with a fixed seed. Equal seeds produce equal draw sequences.
    pub fn seeded(seed: u64) -> Self {
        RandomSource(SmallRng::seed_from_u64(seed))
    }

    /// A source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        RandomSource(SmallRng::try_from_rng(&mut SysRng).expect("failed to read OS entropy"))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    /// For floating point types, the number will be in the range [0, 1).
    /// For integer types, the number will be in the range [0, MAX).
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        T: SampleUniform,
        StandardUniform: Distribution<T>,
    {
        self.0.random()
    }

    /// A random number of type T in the given range.
    #[inline]
    pub fn range<T>(&mut self, range: Range<T>) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.0.random_range(range)
    }

    /// A random boolean with the given probability of being true.
    #[inline]
    pub fn bool(&mut self, prob: f64) -> bool {
        self.0.random_bool(prob)
    }

    /// Shuffles the given slice in place.
    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}
