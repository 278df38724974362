use std::num::NonZeroUsize;

use log::debug;

use super::{LossHistory, Reporter};
use crate::{
    arch::{loss::LossFn, Model},
    data::DataLoader,
    optimization::Optimizer,
    RegressionErr, Result,
};

/// A model trainer. Contains the relevant components needed for training a model, including the
/// model itself.
pub struct ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    model: M,
    optimizer: O,
    loss_fn: L,
    loader: DataLoader,
    epochs: NonZeroUsize,
}

impl<M, O, L> ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The optimizer applied after every batch.
    /// * `loader` - Produces the batches of every epoch.
    /// * `epochs` - The amount of passes over the dataset.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output
    ///   and the expected one.
    pub fn new(
        model: M,
        optimizer: O,
        loader: DataLoader,
        epochs: NonZeroUsize,
        loss_fn: L,
    ) -> Self {
        Self {
            model,
            optimizer,
            loss_fn,
            loader,
            epochs,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn loss_fn(&self) -> &L {
        &self.loss_fn
    }

    /// Trains the model for every configured epoch.
    ///
    /// # Arguments
    /// * `reporter` - Gets notified at the end of every epoch.
    ///
    /// # Returns
    /// The cumulative loss of every epoch, or an error if the training had to stop. A loss that
    /// stops being finite ends the training with `RegressionErr::Diverged`.
    pub fn train<R>(&mut self, reporter: &mut R) -> Result<LossHistory>
    where
        R: Reporter + ?Sized,
    {
        let num_examples = self.loader.dataset().len();
        let mut history = LossHistory::new();

        debug!(
            "training for {} epochs of {} batches",
            self.epochs,
            self.loader.num_batches()
        );

        for epoch in 0..self.epochs.get() {
            let batches = self.loader.epoch();
            let cumulative_loss = self
                .model
                .backprop(&mut self.optimizer, &self.loss_fn, batches)?;

            if !cumulative_loss.is_finite() {
                return Err(RegressionErr::Diverged { epoch });
            }

            reporter.on_epoch_complete(epoch, cumulative_loss / num_examples as f32);
            history.push(cumulative_loss);
        }

        Ok(history)
    }
}
