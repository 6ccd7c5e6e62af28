use std::{cell::RefCell, rc::Rc};

use ndarray::IxDyn;
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Uniform};

use super::{ParamGen, fans};
use crate::{Result, tensor::Tensor};

/// A random number generator shared between several generators.
pub type SharedRng<R = StdRng> = Rc<RefCell<R>>;

/// Creates a new `SharedRng`, seeded if a seed is given.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Rc::new(RefCell::new(rng))
}

/// A parameter generator that follows a fixed probabilistic distribution.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: SharedRng<R>,
    distribution: D,
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    pub fn new(rng: SharedRng<R>, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl<R: Rng> RandParamGen<R, Uniform<f32>> {
    /// Creates a new `RandParamGen` parameter generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(rng: SharedRng<R>, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?))
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Creates a new `RandParamGen` parameter generator with a normal distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: SharedRng<R>, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?))
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn generate(&mut self, shape: &[usize]) -> Result<Tensor> {
        let mut rng = self.rng.borrow_mut();
        Ok(Tensor::random_using(IxDyn(shape), &self.distribution, &mut *rng))
    }
}

/// How a `ScaledParamGen` derives its distribution from a tensor's fans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanScaling {
    /// Normal with `std_dev = sqrt(2 / (fan_in + fan_out))`.
    Xavier,
    /// Uniform in `±sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
    /// Normal with `std_dev = sqrt(2 / fan_in)`.
    Kaiming,
    /// Normal with `std_dev = sqrt(1 / fan_in)`.
    Lecun,
    /// Uniform in `±sqrt(3 / fan_in)`.
    LecunUniform,
}

/// A parameter generator whose distribution depends on the shape it is asked for.
pub struct ScaledParamGen<R: Rng> {
    rng: SharedRng<R>,
    scaling: FanScaling,
}

impl<R: Rng> ScaledParamGen<R> {
    pub fn new(rng: SharedRng<R>, scaling: FanScaling) -> Self {
        Self { rng, scaling }
    }
}

impl<R: Rng> ParamGen for ScaledParamGen<R> {
    fn generate(&mut self, shape: &[usize]) -> Result<Tensor> {
        let (fan_in, fan_out) = fans(shape);
        let rng = self.rng.clone();

        match self.scaling {
            FanScaling::Xavier => {
                let std_dev = (2. / (fan_in + fan_out) as f32).sqrt();
                RandParamGen::normal(rng, 0., std_dev)?.generate(shape)
            }
            FanScaling::XavierUniform => {
                let range = (6. / (fan_in + fan_out) as f32).sqrt();
                RandParamGen::uniform(rng, -range, range)?.generate(shape)
            }
            FanScaling::Kaiming => {
                let std_dev = (2. / fan_in as f32).sqrt();
                RandParamGen::normal(rng, 0., std_dev)?.generate(shape)
            }
            FanScaling::Lecun => {
                let std_dev = (1. / fan_in as f32).sqrt();
                RandParamGen::normal(rng, 0., std_dev)?.generate(shape)
            }
            FanScaling::LecunUniform => {
                let range = (3. / fan_in as f32).sqrt();
                RandParamGen::uniform(rng, -range, range)?.generate(shape)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_respects_its_range() {
        let rng = shared_rng(Some(42));

        let mut param_gen = RandParamGen::uniform(rng, -1., 1.).unwrap();
        let sample = param_gen.generate(&[4, 5]).unwrap();

        assert_eq!(sample.shape(), &[4, 5]);
        assert!(sample.iter().all(|&v| (-1. ..1.).contains(&v)));
    }

    #[test]
    fn same_seed_same_sample() {
        let mut a = RandParamGen::normal(shared_rng(Some(7)), 0., 1.).unwrap();
        let mut b = RandParamGen::normal(shared_rng(Some(7)), 0., 1.).unwrap();

        assert_eq!(a.generate(&[3, 3]).unwrap(), b.generate(&[3, 3]).unwrap());
    }

    #[test]
    fn invalid_distributions_fail() {
        assert!(RandParamGen::uniform(shared_rng(Some(0)), 1., -1.).is_err());
        assert!(RandParamGen::normal(shared_rng(Some(0)), 0., f32::NAN).is_err());
    }

    #[test]
    fn xavier_uniform_bound_follows_the_fans() {
        let mut param_gen = ScaledParamGen::new(shared_rng(Some(3)), FanScaling::XavierUniform);
        let sample = param_gen.generate(&[2, 4]).unwrap();
        let bound = (6f32 / 6.).sqrt();

        assert!(sample.iter().all(|&v| v.abs() <= bound));
    }
}
