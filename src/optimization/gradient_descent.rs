use ndarray::{ArrayViewD, ArrayViewMutD};

use super::Optimizer;

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }

    #[inline]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Optimizer for GradientDescent {
    /// Makes a step in the opposite direction of the batch averaged gradient, with a length of
    /// `learning_rate`.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The gradient summed over the batch.
    /// * `batch_size` - The amount of samples in the batch.
    fn update_params(
        &mut self,
        mut params: ArrayViewMutD<f32>,
        grad: ArrayViewD<f32>,
        batch_size: usize,
    ) {
        let step = self.learning_rate / batch_size.max(1) as f32;
        params.scaled_add(-step, &grad);
    }
}
