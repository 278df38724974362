use ndarray::{Array, Dimension, ShapeBuilder};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{RegressionErr, Result};

/// Describes how a parameter tensor is filled when it gets materialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    Normal { mean: f32, std_dev: f32 },
    Uniform { low: f32, high: f32 },
    Constant { value: f32 },
}

impl Default for Initializer {
    fn default() -> Self {
        Self::Normal {
            mean: 0.,
            std_dev: 1.,
        }
    }
}

impl Initializer {
    /// Checks that the distribution can be sampled from.
    ///
    /// # Returns
    /// An error if the standard deviation is not finite or negative, or the uniform range is
    /// empty.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Initializer::Normal { mean, std_dev } => {
                normal(mean, std_dev)?;
            }
            Initializer::Uniform { low, high } => {
                uniform(low, high)?;
            }
            Initializer::Constant { value } if !value.is_finite() => {
                return Err(RegressionErr::InvalidDistribution(format!(
                    "constant {value} is not finite"
                )));
            }
            Initializer::Constant { .. } => {}
        }

        Ok(())
    }

    /// Samples a new array with the given shape.
    ///
    /// # Arguments
    /// * `shape` - The shape of the array.
    /// * `rng` - A random number generator.
    pub fn sample<Sh, D, R>(&self, shape: Sh, rng: &mut R) -> Result<Array<f32, D>>
    where
        Sh: ShapeBuilder<Dim = D>,
        D: Dimension,
        R: Rng + ?Sized,
    {
        let array = match *self {
            Initializer::Normal { mean, std_dev } => {
                Array::random_using(shape, normal(mean, std_dev)?, rng)
            }
            Initializer::Uniform { low, high } => {
                Array::random_using(shape, uniform(low, high)?, rng)
            }
            Initializer::Constant { value } => Array::from_elem(shape, value),
        };

        Ok(array)
    }
}

fn normal(mean: f32, std_dev: f32) -> Result<Normal<f32>> {
    if !mean.is_finite() || !std_dev.is_finite() {
        return Err(RegressionErr::InvalidDistribution(format!(
            "normal({mean}, {std_dev}) must have finite parameters"
        )));
    }

    Normal::new(mean, std_dev).map_err(|e| RegressionErr::InvalidDistribution(e.to_string()))
}

fn uniform(low: f32, high: f32) -> Result<Uniform<f32>> {
    Uniform::new(low, high).map_err(|e| RegressionErr::InvalidDistribution(e.to_string()))
}
