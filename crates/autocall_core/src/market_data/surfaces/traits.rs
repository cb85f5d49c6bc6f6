//! Volatility surface trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Volatility lookup on a (maturity in years, strike) grid.
///
/// The path simulator queries the surface with the current time and the
/// previous spot level, so the "strike" coordinate is really a spot level
/// for local-volatility style lookups.
pub trait VolatilitySurface<T: Float> {
    /// Returns the annualised volatility at `(t, strike)`.
    ///
    /// # Errors
    ///
    /// Implementations fail on non-finite coordinates.
    fn volatility(&self, t: T, strike: T) -> Result<T, MarketDataError>;
}

/// Checks a volatility quote is strictly positive and finite.
#[inline]
pub(crate) fn check_volatility<T: Float>(vol: T, t: T, strike: T) -> Result<(), MarketDataError> {
    if !(vol > T::zero()) || !vol.is_finite() {
        return Err(MarketDataError::InvalidVolatility {
            vol: vol.to_f64().unwrap_or(f64::NAN),
            t: t.to_f64().unwrap_or(f64::NAN),
            strike: strike.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_volatility() {
        assert!(check_volatility(0.2_f64, 1.0, 100.0).is_ok());
        assert!(check_volatility(0.0_f64, 1.0, 100.0).is_err());
        assert!(check_volatility(-0.1_f64, 1.0, 100.0).is_err());
        assert!(check_volatility(f64::NAN, 1.0, 100.0).is_err());
        assert!(check_volatility(f64::INFINITY, 1.0, 100.0).is_err());
    }
}
