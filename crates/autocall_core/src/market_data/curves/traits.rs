//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Generic yield curve trait for zero rate and discount factor lookups.
///
/// # Contract
///
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t)
/// - `discount_factor(t)` returns D(t) = exp(-r(t) * t)
///
/// # Invariants
///
/// - D(0) = 1 exactly
/// - D(t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use autocall_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// assert!((curve.zero_rate(3.0).unwrap() - 0.05).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the continuously compounded zero rate for maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if `t` is negative or not finite.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the discount factor for maturity `t`.
    ///
    /// # Mathematical Definition
    ///
    /// ```text
    /// D(t) = exp(-r(t) * t)
    /// ```
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t == T::zero() {
            return Ok(T::one());
        }
        let rate = self.zero_rate(t)?;
        Ok((-rate * t).exp())
    }
}

/// Rejects negative and non-finite maturities.
#[inline]
pub(crate) fn check_maturity<T: Float>(t: T) -> Result<(), MarketDataError> {
    if t < T::zero() || !t.is_finite() {
        return Err(MarketDataError::InvalidMaturity {
            t: t.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}
