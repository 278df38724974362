use ndarray::{Array2, ArrayView2};

use super::loss::LossFn;
use crate::{optimization::Optimizer, Result};

pub trait Model {
    /// Computes the model's prediction for a batch of inputs.
    fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Computes the gradient of the parameters given the derivative of the loss with respect to
    /// the output of the last `forward` call.
    fn backward(&mut self, d: ArrayView2<f32>) -> Result<()>;

    /// Applies the last computed gradient to the parameters.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer that dictates how to update the parameters.
    /// * `batch_size` - The amount of samples the gradient was accumulated over.
    fn optimize<O: Optimizer>(&mut self, optimizer: &mut O, batch_size: usize) -> Result<()>;

    /// Makes a forward pass, a backward pass and an update with every batch, in order. **The
    /// parameters get updated** after each batch.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer that dictates how to update the parameters.
    /// * `loss_fn` - The loss function.
    /// * `batches` - The batches of data.
    ///
    /// # Returns
    /// The sum over the batches of the mean loss of each batch.
    fn backprop<'a, O, L, I>(&mut self, optimizer: &mut O, loss_fn: &L, batches: I) -> Result<f32>
    where
        O: Optimizer,
        L: LossFn,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        let mut cumulative_loss = 0.0;

        for (x, y) in batches {
            let y_pred = self.forward(x)?;
            let loss = loss_fn.loss(y_pred.view(), y)?;
            let d = loss_fn.loss_prime(y_pred.view(), y)?;

            self.backward(d.view())?;
            self.optimize(optimizer, x.nrows())?;

            cumulative_loss += loss.mean().unwrap_or_default();
        }

        Ok(cumulative_loss)
    }
}
