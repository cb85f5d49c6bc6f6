//! Interpolated zero-rate curve implementation.

use super::traits::{check_maturity, YieldCurve};
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{Extrapolation, Interpolator, LinearInterpolator};
use num_traits::Float;

/// Zero-rate curve built from (maturity in years, rate) pillars.
///
/// Rates are interpolated linearly between pillars and extrapolated
/// linearly from the boundary segments outside them, so the short end below
/// the first pillar follows the slope of the first segment.
///
/// # Example
///
/// ```
/// use autocall_core::market_data::curves::{YieldCurve, ZeroRateCurve};
///
/// let curve = ZeroRateCurve::new(&[1.0_f64, 2.0], &[0.03, 0.04]).unwrap();
///
/// assert!((curve.zero_rate(1.5).unwrap() - 0.035).abs() < 1e-12);
/// // Extrapolated below the first pillar
/// assert!((curve.zero_rate(0.5).unwrap() - 0.025).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZeroRateCurve<T: Float> {
    interp: LinearInterpolator<T>,
}

impl<T: Float> ZeroRateCurve<T> {
    /// Builds the curve from pillar maturities and zero rates.
    ///
    /// Pillars need not be sorted.
    ///
    /// # Errors
    ///
    /// * `MarketDataError::InvalidMaturity` - Negative or non-finite maturity
    /// * `MarketDataError::Interpolation` - Fewer than two pillars, duplicated
    ///   maturities, mismatched lengths or non-finite rates
    pub fn new(maturities: &[T], rates: &[T]) -> Result<Self, MarketDataError> {
        for &t in maturities {
            check_maturity(t)?;
        }

        let interp = LinearInterpolator::new(maturities, rates)?
            .with_extrapolation(Extrapolation::Linear);

        Ok(Self { interp })
    }

    /// Builds the curve from `(maturity, rate)` rows as delivered by a
    /// market-data provider.
    pub fn from_rows(rows: &[(T, T)]) -> Result<Self, MarketDataError> {
        let (maturities, rates): (Vec<T>, Vec<T>) = rows.iter().copied().unzip();
        Self::new(&maturities, &rates)
    }

    /// Returns the pillar maturities (sorted).
    #[inline]
    pub fn maturities(&self) -> &[T] {
        self.interp.xs()
    }

    /// Returns the pillar rates in maturity order.
    #[inline]
    pub fn rates(&self) -> &[T] {
        self.interp.ys()
    }

    /// Returns the pillar range `(t_min, t_max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        self.interp.domain()
    }
}

impl<T: Float> YieldCurve<T> for ZeroRateCurve<T> {
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        check_maturity(t)?;
        Ok(self.interp.interpolate(t)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_curve() -> ZeroRateCurve<f64> {
        ZeroRateCurve::from_rows(&[(0.25, 0.040), (1.0, 0.035), (2.0, 0.033), (5.0, 0.036)])
            .unwrap()
    }

    #[test]
    fn test_pillars_reproduced() {
        let curve = sample_curve();
        for (&t, &r) in curve.maturities().iter().zip(curve.rates()) {
            assert_relative_eq!(curve.zero_rate(t).unwrap(), r, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_linear_between_pillars() {
        let curve = sample_curve();
        assert_relative_eq!(curve.zero_rate(1.5).unwrap(), 0.034, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_both_ends() {
        let curve = sample_curve();
        // First segment slope: (0.035 - 0.040) / 0.75
        let slope = -0.005 / 0.75;
        assert_relative_eq!(
            curve.zero_rate(0.0).unwrap(),
            0.040 - 0.25 * slope,
            epsilon = 1e-12
        );
        // Last segment slope: 0.003 / 3
        assert_relative_eq!(curve.zero_rate(8.0).unwrap(), 0.039, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_factor_at_zero_is_one() {
        assert_eq!(sample_curve().discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_discount_factor_uses_interpolated_rate() {
        let curve = sample_curve();
        let df = curve.discount_factor(1.5).unwrap();
        assert_relative_eq!(df, (-0.034_f64 * 1.5).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_pillars() {
        assert!(matches!(
            ZeroRateCurve::new(&[1.0], &[0.03]),
            Err(MarketDataError::Interpolation(_))
        ));
        assert!(matches!(
            ZeroRateCurve::new(&[-1.0, 1.0], &[0.03, 0.03]),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_negative_query_rejected() {
        assert!(sample_curve().zero_rate(-0.01).is_err());
    }
}
