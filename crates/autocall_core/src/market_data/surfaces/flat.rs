//! Flat volatility surface implementation.

use super::traits::{check_volatility, VolatilitySurface};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Constant volatility across maturities and strikes.
///
/// # Example
///
/// ```
/// use autocall_core::market_data::surfaces::{FlatVol, VolatilitySurface};
///
/// let vol = FlatVol::new(0.25_f64).unwrap();
/// assert_eq!(vol.volatility(2.0, 80.0).unwrap(), 0.25);
/// assert!(FlatVol::new(0.0_f64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatVol<T: Float> {
    sigma: T,
}

impl<T: Float> FlatVol<T> {
    /// Creates a flat surface at `sigma`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidVolatility` if `sigma` is not strictly
    /// positive and finite.
    pub fn new(sigma: T) -> Result<Self, MarketDataError> {
        check_volatility(sigma, T::zero(), T::zero())?;
        Ok(Self { sigma })
    }

    /// Returns the constant volatility.
    #[inline]
    pub fn sigma(&self) -> T {
        self.sigma
    }
}

impl<T: Float> VolatilitySurface<T> for FlatVol<T> {
    #[inline]
    fn volatility(&self, t: T, strike: T) -> Result<T, MarketDataError> {
        if !t.is_finite() || !strike.is_finite() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let vol = FlatVol::new(0.3_f64).unwrap();
        assert_eq!(vol.sigma(), 0.3);
        assert_eq!(vol.volatility(0.0, 1.0).unwrap(), 0.3);
        assert_eq!(vol.volatility(10.0, 1_000.0).unwrap(), 0.3);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            FlatVol::new(-0.2_f64),
            Err(MarketDataError::InvalidVolatility { .. })
        ));
        assert!(FlatVol::new(f64::NAN).is_err());
    }

    #[test]
    fn test_nan_query() {
        let vol = FlatVol::new(0.3_f64).unwrap();
        assert!(vol.volatility(f64::NAN, 100.0).is_err());
    }
}
