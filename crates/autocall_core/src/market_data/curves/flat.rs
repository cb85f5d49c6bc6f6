//! Flat yield curve implementation.

use super::traits::{check_maturity, YieldCurve};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Yield curve with a single constant zero rate.
///
/// Mostly useful as a discount curve in tests and for quick what-if runs.
///
/// # Example
///
/// ```
/// use autocall_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.03_f64);
/// assert_eq!(curve.rate(), 0.03);
/// assert!((curve.discount_factor(2.0).unwrap() - (-0.06_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Creates a flat curve at `rate` (continuously compounded).
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Returns the constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    #[inline]
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        check_maturity(t)?;
        Ok(self.rate)
    }
}
