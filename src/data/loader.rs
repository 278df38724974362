use std::num::NonZeroUsize;

use ndarray::ArrayView2;
use rand::rngs::StdRng;

use super::Dataset;

/// Produces the minibatches of an epoch, reshuffling the dataset each time a new epoch begins.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dataset: Dataset,
    batch_size: NonZeroUsize,
    shuffle: bool,
    rng: StdRng,
}

impl DataLoader {
    /// Creates a new `DataLoader`.
    ///
    /// # Arguments
    /// * `dataset` - The dataset to iterate.
    /// * `batch_size` - The maximum amount of samples per batch.
    /// * `shuffle` - Whether to permute the samples before every epoch.
    /// * `rng` - The random number generator used for shuffling.
    pub fn new(dataset: Dataset, batch_size: NonZeroUsize, shuffle: bool, rng: StdRng) -> Self {
        Self {
            dataset,
            batch_size,
            shuffle,
            rng,
        }
    }

    #[inline]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[inline]
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Returns the amount of batches produced per epoch.
    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size.get())
    }

    /// Starts a new epoch.
    ///
    /// # Returns
    /// A lazy iterator over the `(x, y)` batches of this epoch.
    pub fn epoch(&mut self) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        if self.shuffle {
            self.dataset.shuffle(&mut self.rng);
        }

        self.dataset.batches(self.batch_size)
    }
}
