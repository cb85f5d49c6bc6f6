//! Correlated Gaussian shocks.

use crate::error::{EngineError, ValidationError};
use crate::rng::PricerRng;
use autocall_models::correlation::CorrelationMatrix;
use rayon::prelude::*;
use tracing::debug;

/// Correlated Brownian increments for every (step, simulation, asset).
///
/// Storage is simulation-major: all steps of simulation 0 first, and within
/// a step the assets are contiguous. That lets the path simulator hand each
/// simulation to a different thread.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedShocks {
    n_steps: usize,
    n_simulations: usize,
    n_assets: usize,
    data: Vec<f64>,
}

impl CorrelatedShocks {
    /// Draws correlated increments scaled by `sqrt(dt)`.
    ///
    /// Independent normals are drawn sequentially from `rng`, so the result
    /// depends only on the generator state and the shape, never on the
    /// thread count.
    ///
    /// # Errors
    ///
    /// `ConfigurationError::Correlation` if the matrix is not positive
    /// semi-definite.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_pricing::mc::CorrelatedShocks;
    /// use autocall_pricing::rng::PricerRng;
    /// use autocall_models::correlation::CorrelationMatrix;
    ///
    /// let corr = CorrelationMatrix::new(&[1.0, 1.0, 1.0, 1.0], 2).unwrap();
    /// let mut rng = PricerRng::from_seed(1);
    /// let shocks = CorrelatedShocks::generate(&corr, 10, 4, 1.0 / 360.0, &mut rng).unwrap();
    ///
    /// // Perfectly correlated assets receive the same shock
    /// assert_eq!(shocks.get(3, 2, 0), shocks.get(3, 2, 1));
    /// ```
    pub fn generate(
        correlation: &CorrelationMatrix<f64>,
        n_steps: usize,
        n_simulations: usize,
        dt: f64,
        rng: &mut PricerRng,
    ) -> Result<Self, EngineError> {
        let n_assets = correlation.dim();
        let cholesky = correlation.cholesky()?;
        let scale = dt.sqrt();

        let mut data = vec![0.0; n_steps * n_simulations * n_assets];
        rng.fill_normal(&mut data);

        if n_assets > 0 {
            data.par_chunks_mut(n_assets).for_each_init(
                || vec![0.0; n_assets],
                |buffer, z| {
                    cholesky.transform_into(z, buffer);
                    for (out, w) in z.iter_mut().zip(buffer.iter()) {
                        *out = w * scale;
                    }
                },
            );
        }

        debug!(
            n_steps,
            n_simulations,
            n_assets,
            seed = ?rng.seed(),
            "correlated shocks generated"
        );

        Ok(Self {
            n_steps,
            n_simulations,
            n_assets,
            data,
        })
    }

    /// Wraps externally produced increments laid out simulation-major,
    /// `data[(sim * n_steps + step) * n_assets + asset]`.
    ///
    /// # Errors
    ///
    /// `ValidationError::ShapeMismatch` if `data` has the wrong length.
    pub fn from_raw(
        n_steps: usize,
        n_simulations: usize,
        n_assets: usize,
        data: Vec<f64>,
    ) -> Result<Self, EngineError> {
        let expected = n_steps * n_simulations * n_assets;
        if data.len() != expected {
            return Err(ValidationError::ShapeMismatch {
                what: "shock buffer",
                expected,
                got: data.len(),
            }
            .into());
        }
        Ok(Self {
            n_steps,
            n_simulations,
            n_assets,
            data,
        })
    }

    /// Number of time steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Number of assets.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Shock applied to `asset` between time index `step` and `step + 1`.
    #[inline]
    pub fn get(&self, step: usize, simulation: usize, asset: usize) -> f64 {
        self.data[(simulation * self.n_steps + step) * self.n_assets + asset]
    }

    /// All shocks of one simulation, step-major then asset.
    #[inline]
    pub fn simulation(&self, simulation: usize) -> &[f64] {
        let len = self.n_steps * self.n_assets;
        &self.data[simulation * len..(simulation + 1) * len]
    }
}
