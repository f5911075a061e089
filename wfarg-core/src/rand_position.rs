use rand::distributions::uniform::{SampleBorrow, SampleUniform, UniformFloat, UniformSampler};
use rand::prelude::Rng;

use crate::Position;

/// Uniform sampling of [`Position`] values.
///
/// ```
/// use rand::{Rng, SeedableRng};
/// use wfarg_core::Position;
/// let u = rand::distributions::Uniform::new(Position::LEFT, Position::RIGHT);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let p: Position = rng.sample(u);
/// assert!(p >= 0.0 && p <= 1.0);
/// ```
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct UniformPos(UniformFloat<f64>);

impl UniformSampler for UniformPos {
    type X = Position;
    fn new<B1, B2>(low: B1, high: B2) -> Self
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        UniformPos(UniformFloat::<f64>::new(
            f64::from(*low.borrow()),
            f64::from(*high.borrow()),
        ))
    }
    fn new_inclusive<B1, B2>(low: B1, high: B2) -> Self
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        UniformPos(UniformFloat::<f64>::new_inclusive(
            f64::from(*low.borrow()),
            f64::from(*high.borrow()),
        ))
    }
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::X {
        Position::new_valid(self.0.sample(rng))
    }
}

impl SampleUniform for Position {
    type Sampler = UniformPos;
}
