//! Interpolation methods for market data lookups.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation with a configurable
//!   [`Extrapolation`] policy outside the knot range
//! - [`NearestNeighbourInterpolator`]: Scattered 2-D lookup that snaps to the
//!   closest data point (no smoothing)
//!
//! ## Core Trait
//!
//! 1-D interpolators implement the [`Interpolator`] trait, which defines:
//! - `interpolate(x: T) -> Result<T, InterpolationError>`: Compute interpolated value
//! - `domain() -> (T, T)`: Return the knot range
//!
//! ## Example
//!
//! ```
//! use autocall_core::math::interpolators::{Extrapolation, Interpolator, LinearInterpolator};
//!
//! let interp = LinearInterpolator::new(&[0.0_f64, 1.0, 2.0], &[0.0, 1.0, 4.0])
//!     .unwrap()
//!     .with_extrapolation(Extrapolation::Linear);
//!
//! assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
//! assert!((interp.interpolate(3.0).unwrap() - 7.0).abs() < 1e-12);
//! ```

mod linear;
mod nearest;
mod traits;

pub use linear::{Extrapolation, LinearInterpolator};
pub use nearest::NearestNeighbourInterpolator;
pub use traits::Interpolator;
