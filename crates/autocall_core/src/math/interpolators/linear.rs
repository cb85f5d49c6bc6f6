//! Linear interpolation implementation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Behaviour of a [`LinearInterpolator`] outside its knot range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Reject queries outside the knot range.
    #[default]
    Error,
    /// Hold the boundary value constant.
    Flat,
    /// Extend the first/last segment's slope.
    Linear,
}

/// Piecewise linear interpolator.
///
/// Stores sorted (x, y) data points and performs linear interpolation
/// between adjacent points.
///
/// # Construction
///
/// Data points are sorted by x-coordinate during construction. At least 2
/// distinct, finite data points are required.
///
/// # Example
///
/// ```
/// use autocall_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[2.0, 0.0, 1.0], &[4.0, 0.0, 2.0]).unwrap();
/// assert_eq!(interp.domain(), (0.0, 2.0));
/// assert!(interp.interpolate(3.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    /// Sorted x-coordinates
    xs: Vec<T>,
    /// Corresponding y-values (in same order as xs after sorting)
    ys: Vec<T>,
    /// Out-of-range policy
    extrapolation: Extrapolation,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct a linear interpolator from x and y data points.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 data points
    /// * `Err(InterpolationError::NonFiniteData)` - NaN or infinite inputs
    /// * `Err(InterpolationError::DuplicateKnot)` - Repeated x-coordinate
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }

        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }

        if let Some(index) = xs
            .iter()
            .zip(ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InterpolationError::NonFiniteData { index });
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(InterpolationError::DuplicateKnot {
                x: w[0].0.to_f64().unwrap_or(f64::NAN),
            });
        }

        let (sorted_xs, sorted_ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

        Ok(Self {
            xs: sorted_xs,
            ys: sorted_ys,
            extrapolation: Extrapolation::Error,
        })
    }

    /// Returns the interpolator with a different extrapolation policy.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Returns the extrapolation policy.
    #[inline]
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Returns a reference to the sorted x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns a reference to the y-values (in sorted x order).
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of data points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Returns the index `i` such that `xs[i] <= x < xs[i+1]`,
    /// clamped to the valid segment range [0, n-2].
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);

        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    #[inline]
    fn on_segment(&self, i: usize, x: T) -> T {
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    /// Interpolate value at point `x`.
    ///
    /// # Formula
    ///
    /// ```text
    /// y = y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    /// ```
    ///
    /// With [`Extrapolation::Linear`] the same formula is applied on the
    /// boundary segment for points outside the domain.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        if x.is_nan() {
            return Err(InterpolationError::InvalidInput(
                "query point is NaN".to_string(),
            ));
        }

        let (x_min, x_max) = self.domain();
        let last = self.ys.len() - 1;

        if x < x_min || x > x_max {
            return match self.extrapolation {
                Extrapolation::Error => Err(InterpolationError::OutOfBounds {
                    x: x.to_f64().unwrap_or(f64::NAN),
                    min: x_min.to_f64().unwrap_or(f64::NAN),
                    max: x_max.to_f64().unwrap_or(f64::NAN),
                }),
                Extrapolation::Flat if x < x_min => Ok(self.ys[0]),
                Extrapolation::Flat => Ok(self.ys[last]),
                Extrapolation::Linear => Ok(self.on_segment(self.find_segment(x), x)),
            };
        }

        Ok(self.on_segment(self.find_segment(x), x))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
