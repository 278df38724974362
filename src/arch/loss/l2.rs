use ndarray::{Array2, ArrayView2};

use super::{loss_fn::check_shapes, LossFn};
use crate::Result;

/// Squared error loss, `scale · (y_pred - y)²` for every entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct L2Loss {
    scale: f32,
}

impl Default for L2Loss {
    fn default() -> Self {
        Self { scale: 0.5 }
    }
}

impl L2Loss {
    /// Returns a new `L2Loss` with the conventional `1/2` scale, so that its derivative is just
    /// `y_pred - y`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new `L2Loss` with a custom scale.
    pub fn with_scale(scale: f32) -> Self {
        Self { scale }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl LossFn for L2Loss {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        check_shapes(&y_pred, &y)?;
        Ok((&y_pred - &y).mapv(|d| self.scale * d.powi(2)))
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        check_shapes(&y_pred, &y)?;
        Ok((&y_pred - &y) * (2. * self.scale))
    }
}
