use ndarray::{ArrayViewD, ArrayViewMutD};

pub trait Optimizer {
    /// Updates a parameter given its gradient, summed over `batch_size` samples.
    fn update_params(
        &mut self,
        params: ArrayViewMutD<f32>,
        grad: ArrayViewD<f32>,
        batch_size: usize,
    );
}
