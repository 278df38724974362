use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, StandardNormal};

use super::Dataset;
use crate::{RegressionErr, Result};

/// Generates regression datasets from a known affine function plus gaussian noise.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    true_weight: Array1<f32>,
    true_bias: f32,
    noise: Normal<f32>,
}

impl Synthesizer {
    /// Creates a new `Synthesizer`.
    ///
    /// # Arguments
    /// * `true_weight` - The weights of the target function, its length is the amount of features.
    /// * `true_bias` - The bias of the target function.
    /// * `noise_std` - The standard deviation of the noise added to every target.
    ///
    /// # Returns
    /// An error if `true_weight` is empty or `noise_std` is negative or not finite.
    pub fn new(true_weight: &[f32], true_bias: f32, noise_std: f32) -> Result<Self> {
        if true_weight.is_empty() {
            return Err(RegressionErr::InvalidConfig(
                "the true weight must have at least one entry".into(),
            ));
        }

        if !noise_std.is_finite() {
            return Err(RegressionErr::InvalidDistribution(format!(
                "noise std {noise_std} is not finite"
            )));
        }

        let noise = Normal::new(0., noise_std)
            .map_err(|e| RegressionErr::InvalidDistribution(e.to_string()))?;

        Ok(Self {
            true_weight: Array1::from_vec(true_weight.to_vec()),
            true_bias,
            noise,
        })
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.true_weight.len()
    }

    pub fn true_weight(&self) -> ArrayView1<'_, f32> {
        self.true_weight.view()
    }

    pub fn true_bias(&self) -> f32 {
        self.true_bias
    }

    /// Samples a new dataset.
    ///
    /// Features follow a standard normal distribution and every target is
    /// `true_weight · x + true_bias + noise`.
    ///
    /// # Arguments
    /// * `num_examples` - The amount of samples to generate.
    /// * `rng` - A random number generator.
    pub fn generate<R: Rng + ?Sized>(&self, num_examples: usize, rng: &mut R) -> Result<Dataset> {
        if num_examples == 0 {
            return Err(RegressionErr::InvalidConfig(
                "num_examples must be greater than 0".into(),
            ));
        }

        let x = Array2::<f32>::random_using((num_examples, self.num_inputs()), StandardNormal, rng);
        let noise = Array1::random_using(num_examples, self.noise, rng);
        let y = x.dot(&self.true_weight) + self.true_bias + noise;

        Dataset::from_parts(x.view(), y.insert_axis(Axis(1)).view())
    }
}
