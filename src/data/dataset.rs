use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView2, Axis};
use rand::{seq::SliceRandom, Rng};

use crate::{RegressionErr, Result};

/// An in-memory supervised dataset.
///
/// Samples are stored row-major, each row holding the `x_size` features followed by the
/// `y_size` targets. The samples themselves never change, only their order.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: Array2<f32>,
    x_size: usize,
    y_size: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The flat row-major samples.
    /// * `x_size` - The amount of features per sample.
    /// * `y_size` - The amount of targets per sample.
    ///
    /// # Returns
    /// A new dataset or an error if `data` can't be split in rows of `x_size + y_size` values.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        let row_size = x_size + y_size;
        if x_size == 0 || y_size == 0 || data.is_empty() || data.len() % row_size != 0 {
            return Err(RegressionErr::SizeMismatch {
                what: "dataset rows",
                got: data.len(),
                expected: row_size,
            });
        }

        let rows = data.len() / row_size;
        let data = Array2::from_shape_vec((rows, row_size), data).map_err(|_| {
            RegressionErr::SizeMismatch {
                what: "dataset rows",
                got: rows,
                expected: row_size,
            }
        })?;

        Ok(Self {
            data,
            x_size,
            y_size,
        })
    }

    /// Creates a new `Dataset` from a features matrix and a targets matrix with the same amount of
    /// rows.
    pub fn from_parts(x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(RegressionErr::SizeMismatch {
                what: "dataset targets",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        let data: Vec<f32> = x
            .rows()
            .into_iter()
            .zip(y.rows())
            .flat_map(|(xr, yr)| xr.into_iter().chain(yr).copied())
            .collect();

        Self::new(data, x.ncols(), y.ncols())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Returns views over all the features and all the targets.
    pub fn view(&self) -> (ArrayView2<'_, f32>, ArrayView2<'_, f32>) {
        self.data.view().split_at(Axis(1), self.x_size)
    }

    /// Randomly permutes the order of the samples.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        self.data = self.data.select(Axis(0), &order);
    }

    /// Splits the dataset in consecutive batches of at most `batch_size` samples.
    ///
    /// # Returns
    /// An iterator of `(x, y)` views, the last one may be shorter than `batch_size`.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        let x_size = self.x_size;

        self.data
            .axis_chunks_iter(Axis(0), batch_size.get())
            .map(move |chunk| chunk.split_at(Axis(1), x_size))
    }
}
