use log::debug;
use ndarray::{linalg, prelude::*};
use rand::rngs::StdRng;

use crate::{
    arch::{init::Initializer, Model},
    optimization::Optimizer,
    RegressionErr, Result,
};

const LAYER: &str = "dense";

/// The parameters of an affine map `x · weight + bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearParams {
    /// Shape `(in_dim, units)`.
    pub weight: Array2<f32>,
    /// Shape `(units,)`.
    pub bias: Array1<f32>,
}

impl LinearParams {
    /// Returns zeroed parameters for a `(in_dim, units)` map.
    pub fn zeros(in_dim: usize, units: usize) -> Self {
        Self {
            weight: Array2::zeros((in_dim, units)),
            bias: Array1::zeros(units),
        }
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weight.nrows()
    }

    #[inline]
    pub fn units(&self) -> usize {
        self.bias.len()
    }

    /// Returns the amount of scalar parameters.
    pub fn size(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Iterates the parameters by name.
    pub fn named(&self) -> [(&'static str, ArrayViewD<'_, f32>); 2] {
        [
            ("weight", self.weight.view().into_dyn()),
            ("bias", self.bias.view().into_dyn()),
        ]
    }

    /// Iterates the parameters by name, mutably.
    pub fn named_mut(&mut self) -> [(&'static str, ArrayViewMutD<'_, f32>); 2] {
        [
            ("weight", self.weight.view_mut().into_dyn()),
            ("bias", self.bias.view_mut().into_dyn()),
        ]
    }
}

/// A bound initializer waiting for the input dimension to be known.
#[derive(Debug, Clone)]
struct Binding {
    init: Initializer,
    rng: StdRng,
}

impl Binding {
    fn sample(&mut self, in_dim: usize, units: usize) -> Result<LinearParams> {
        Ok(LinearParams {
            weight: self.init.sample((in_dim, units), &mut self.rng)?,
            bias: self.init.sample(units, &mut self.rng)?,
        })
    }
}

#[derive(Debug, Clone)]
enum ParamState {
    Unbound,
    Deferred(Binding),
    Ready {
        params: LinearParams,
        grad: LinearParams,
    },
}

/// Builds `Dense` layers.
#[derive(Debug, Clone, Copy)]
pub struct DenseBuilder {
    units: usize,
    in_dim: Option<usize>,
}

impl DenseBuilder {
    /// Declares the input dimension upfront, so `initialize` can materialize the parameters
    /// right away instead of waiting for the first forward pass.
    pub fn in_dim(mut self, in_dim: usize) -> Self {
        self.in_dim = Some(in_dim);
        self
    }

    pub fn build(self) -> Dense {
        Dense {
            units: self.units,
            in_dim: self.in_dim,
            state: ParamState::Unbound,
            x: Array2::zeros((0, 0)),
        }
    }
}

/// A fully connected layer without activation, that is, a linear regression model.
///
/// The parameters go through three states: *unbound* (no initializer), *deferred* (initializer
/// bound, input dimension unknown) and *ready*. The transition to *ready* happens in `initialize`
/// when the input dimension was declared, or otherwise on the first forward pass.
#[derive(Debug, Clone)]
pub struct Dense {
    units: usize,
    in_dim: Option<usize>,
    state: ParamState,

    // Forward metadata
    x: Array2<f32>,
}

impl Dense {
    /// Starts building a layer with `units` outputs.
    pub fn builder(units: usize) -> DenseBuilder {
        DenseBuilder {
            units,
            in_dim: None,
        }
    }

    #[inline]
    pub fn units(&self) -> usize {
        self.units
    }

    /// Returns the input dimension, if it was declared or already observed.
    #[inline]
    pub fn in_dim(&self) -> Option<usize> {
        self.in_dim
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ParamState::Ready { .. })
    }

    /// Binds an initializer to the parameters.
    ///
    /// If the input dimension is known the parameters get sampled immediately, otherwise sampling
    /// is deferred to the first forward pass. Initializing an already initialized layer resamples
    /// its parameters.
    ///
    /// # Arguments
    /// * `init` - The distribution to sample the parameters from.
    /// * `rng` - The random number generator owned by the initializer.
    ///
    /// # Returns
    /// An error if the initializer is invalid.
    pub fn initialize(&mut self, init: Initializer, rng: StdRng) -> Result<()> {
        init.validate()?;
        self.state = ParamState::Deferred(Binding { init, rng });

        match self.in_dim {
            Some(in_dim) => self.materialize(in_dim),
            None => {
                debug!("{LAYER} initialization deferred until the input dimension is known");
                Ok(())
            }
        }
    }

    /// Samples the parameters for the given input dimension. Does nothing if the layer is
    /// already initialized with that dimension.
    ///
    /// # Returns
    /// An error if there's no initializer bound or the layer was initialized with a different
    /// input dimension.
    pub fn materialize(&mut self, in_dim: usize) -> Result<()> {
        match &mut self.state {
            ParamState::Unbound => Err(RegressionErr::ParamsUninitialized { layer: LAYER }),
            ParamState::Ready { params, .. } if params.in_dim() != in_dim => {
                Err(RegressionErr::SizeMismatch {
                    what: "dense input features",
                    got: in_dim,
                    expected: params.in_dim(),
                })
            }
            ParamState::Ready { .. } => Ok(()),
            ParamState::Deferred(binding) => {
                let params = binding.sample(in_dim, self.units)?;
                debug!("{LAYER} materialized with shape ({in_dim}, {})", self.units);

                self.in_dim = Some(in_dim);
                self.state = ParamState::Ready {
                    grad: LinearParams::zeros(in_dim, self.units),
                    params,
                };
                Ok(())
            }
        }
    }

    /// Returns the parameters.
    ///
    /// # Returns
    /// `ParamsUninitialized` if there's no initializer bound, `DeferredInit` if the initializer is
    /// bound but the parameters have not been materialized yet.
    pub fn params(&self) -> Result<&LinearParams> {
        match &self.state {
            ParamState::Unbound => Err(RegressionErr::ParamsUninitialized { layer: LAYER }),
            ParamState::Deferred(_) => Err(RegressionErr::DeferredInit { layer: LAYER }),
            ParamState::Ready { params, .. } => Ok(params),
        }
    }

    pub fn weight(&self) -> Result<ArrayView2<'_, f32>> {
        Ok(self.params()?.weight.view())
    }

    pub fn bias(&self) -> Result<ArrayView1<'_, f32>> {
        Ok(self.params()?.bias.view())
    }

    /// Returns the gradient written by the last `backward` call.
    pub fn grad(&self) -> Result<&LinearParams> {
        match &self.state {
            ParamState::Unbound => Err(RegressionErr::ParamsUninitialized { layer: LAYER }),
            ParamState::Deferred(_) => Err(RegressionErr::DeferredInit { layer: LAYER }),
            ParamState::Ready { grad, .. } => Ok(grad),
        }
    }

    /// Computes `x · weight + bias` without touching the layer's state.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let params = self.params()?;
        if x.ncols() != params.in_dim() {
            return Err(RegressionErr::SizeMismatch {
                what: "dense input features",
                got: x.ncols(),
                expected: params.in_dim(),
            });
        }

        let mut z = Array2::zeros((x.nrows(), self.units));
        linalg::general_mat_mul(1.0, &x, &params.weight, 0.0, &mut z);
        z += &params.bias;
        Ok(z)
    }
}

impl Model for Dense {
    fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.materialize(x.ncols())?;
        let z = self.predict(x)?;
        self.x = x.to_owned();
        Ok(z)
    }

    fn backward(&mut self, d: ArrayView2<f32>) -> Result<()> {
        let ParamState::Ready { grad, .. } = &mut self.state else {
            return Err(RegressionErr::ParamsUninitialized { layer: LAYER });
        };

        if d.nrows() != self.x.nrows() {
            return Err(RegressionErr::SizeMismatch {
                what: "dense output delta rows",
                got: d.nrows(),
                expected: self.x.nrows(),
            });
        }
        if d.ncols() != self.units {
            return Err(RegressionErr::SizeMismatch {
                what: "dense output delta columns",
                got: d.ncols(),
                expected: self.units,
            });
        }

        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut grad.weight);
        grad.bias.assign(&d.sum_axis(Axis(0)));
        Ok(())
    }

    fn optimize<O: Optimizer>(&mut self, optimizer: &mut O, batch_size: usize) -> Result<()> {
        let ParamState::Ready { params, grad } = &mut self.state else {
            return Err(RegressionErr::ParamsUninitialized { layer: LAYER });
        };

        for ((_, p), (_, g)) in params.named_mut().into_iter().zip(grad.named()) {
            optimizer.update_params(p, g, batch_size);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn constant_layer(value: f32) -> Dense {
        let mut layer = Dense::builder(1).in_dim(2).build();
        layer
            .initialize(Initializer::Constant { value }, rng())
            .unwrap();
        layer
    }

    #[test]
    fn unbound_layer_refuses_forward() {
        let mut layer = Dense::builder(1).build();
        let x = array![[1., 2.]];

        assert!(matches!(
            layer.forward(x.view()),
            Err(RegressionErr::ParamsUninitialized { .. })
        ));
        assert!(matches!(
            layer.params(),
            Err(RegressionErr::ParamsUninitialized { .. })
        ));
    }

    #[test]
    fn deferred_layer_refuses_reads_until_forward() {
        let mut layer = Dense::builder(1).build();
        layer.initialize(Initializer::default(), rng()).unwrap();

        assert!(!layer.is_initialized());
        assert!(matches!(
            layer.weight(),
            Err(RegressionErr::DeferredInit { .. })
        ));

        layer.forward(array![[1., 2.], [3., 4.]].view()).unwrap();

        assert!(layer.is_initialized());
        assert_eq!(layer.in_dim(), Some(2));
        assert_eq!(layer.weight().unwrap().dim(), (2, 1));
        assert_eq!(layer.bias().unwrap().len(), 1);
    }

    #[test]
    fn declared_in_dim_initializes_eagerly() {
        let mut layer = Dense::builder(3).in_dim(4).build();
        layer.initialize(Initializer::default(), rng()).unwrap();

        assert_eq!(layer.params().unwrap().size(), 4 * 3 + 3);
    }

    #[test]
    fn materialize_is_a_noop_once_ready() {
        let mut layer = Dense::builder(1).build();
        layer.initialize(Initializer::default(), rng()).unwrap();
        layer.materialize(2).unwrap();
        let before = layer.params().unwrap().clone();

        layer.materialize(2).unwrap();
        assert_eq!(layer.params().unwrap(), &before);
        assert!(layer.materialize(3).is_err());
    }

    #[test]
    fn forward_is_affine() {
        let mut layer = constant_layer(0.5);
        let y = layer.forward(array![[1., 2.], [-2., 4.]].view()).unwrap();

        assert_eq!(y, array![[2.0_f32], [1.5]]);
    }

    #[test]
    fn forward_is_idempotent() {
        let mut layer = Dense::builder(1).build();
        layer.initialize(Initializer::default(), rng()).unwrap();
        let x = array![[0.3, -1.2], [2.5, 0.7], [1., 1.]];

        let first = layer.forward(x.view()).unwrap();
        let second = layer.forward(x.view()).unwrap();
        assert_eq!(first, second);
        assert_eq!(layer.predict(x.view()).unwrap(), first);
    }

    #[test]
    fn forward_rejects_other_input_dims() {
        let mut layer = constant_layer(1.);
        assert!(matches!(
            layer.forward(array![[1., 2., 3.]].view()),
            Err(RegressionErr::SizeMismatch { .. })
        ));
    }

    #[test]
    fn backward_sums_over_the_batch() {
        let mut layer = constant_layer(0.);
        layer.forward(array![[1., 2.], [3., 4.]].view()).unwrap();
        layer.backward(array![[1.], [-1.]].view()).unwrap();

        let grad = layer.grad().unwrap();
        assert_eq!(grad.weight, array![[-2.0_f32], [-2.]]);
        assert_eq!(grad.bias, array![0.0_f32]);
    }

    #[test]
    fn backward_rejects_wrong_delta() {
        let mut layer = constant_layer(0.);
        layer.forward(array![[1., 2.], [3., 4.]].view()).unwrap();

        assert!(matches!(
            layer.backward(array![[1.]].view()),
            Err(RegressionErr::SizeMismatch {
                what: "dense output delta rows",
                got: 1,
                expected: 2,
            })
        ));
        assert!(matches!(
            layer.backward(array![[1., 0.], [1., 0.]].view()),
            Err(RegressionErr::SizeMismatch {
                what: "dense output delta columns",
                got: 2,
                expected: 1,
            })
        ));
    }

    #[test]
    fn exposes_its_dimensions() {
        let mut layer = Dense::builder(1).build();
        assert_eq!(layer.units(), 1);
        assert_eq!(layer.in_dim(), None);

        layer
            .initialize(Initializer::default(), rng())
            .unwrap();
        layer.forward(array![[1., 2., 3.]].view()).unwrap();
        assert_eq!(layer.in_dim(), Some(3));
        assert_eq!(layer.params().unwrap().size(), 4);
    }

    #[test]
    fn named_params_are_weight_then_bias() {
        let params = LinearParams::zeros(2, 1);
        let names: Vec<_> = params.named().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["weight", "bias"]);
    }
}
