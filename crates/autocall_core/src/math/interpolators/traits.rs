//! One-dimensional interpolator trait.

use crate::types::InterpolationError;
use num_traits::Float;

/// Common interface for 1-D interpolators.
///
/// Implementations are generic over `T: Float` so the same curve code serves
/// `f64` and `f32` callers.
pub trait Interpolator<T: Float> {
    /// Interpolate the value at `x`.
    ///
    /// Behaviour outside [`domain`](Interpolator::domain) depends on the
    /// implementation's extrapolation policy.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Return the knot range `(x_min, x_max)`.
    fn domain(&self) -> (T, T);
}
