use ndarray::{Array2, ArrayView2};

use crate::{RegressionErr, Result};

/// A loss function measuring the distance between a model's output and the expected one.
pub trait LossFn {
    /// Returns the loss of every output entry.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Returns the derivative of the loss with respect to every output entry.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>>;
}

/// Fails unless the predictions and the targets have the same shape.
pub(crate) fn check_shapes(y_pred: &ArrayView2<f32>, y: &ArrayView2<f32>) -> Result<()> {
    if y_pred.nrows() != y.nrows() {
        return Err(RegressionErr::SizeMismatch {
            what: "target rows",
            got: y.nrows(),
            expected: y_pred.nrows(),
        });
    }

    if y_pred.ncols() != y.ncols() {
        return Err(RegressionErr::SizeMismatch {
            what: "target columns",
            got: y.ncols(),
            expected: y_pred.ncols(),
        });
    }

    Ok(())
}
