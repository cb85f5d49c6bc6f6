//! Nearest-neighbour volatility surface over scattered quotes.

use super::traits::{check_volatility, VolatilitySurface};
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::NearestNeighbourInterpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Volatility surface built from scattered (maturity, strike, vol) quotes.
///
/// A lookup returns the volatility of the quote closest to the query in
/// raw (years, strike) coordinates. The coordinates are not rescaled, so in
/// practice the strike axis dominates the distance. Ties resolve to the
/// quote listed first.
///
/// # Example
///
/// ```
/// use autocall_core::market_data::surfaces::{NearestVolSurface, VolatilitySurface};
///
/// let surface = NearestVolSurface::from_rows(&[
///     (0.5, 90.0, 0.24),
///     (0.5, 110.0, 0.18),
///     (1.0, 100.0, 0.20),
/// ])
/// .unwrap();
///
/// assert_eq!(surface.volatility(0.4, 92.0).unwrap(), 0.24);
/// assert_eq!(surface.volatility(2.0, 101.0).unwrap(), 0.20);
/// ```
#[derive(Debug, Clone)]
pub struct NearestVolSurface<T: Float> {
    interp: NearestNeighbourInterpolator<T>,
}

impl<T: Float> NearestVolSurface<T> {
    /// Builds the surface from `(maturity, strike, vol)` rows.
    ///
    /// # Errors
    ///
    /// * `MarketDataError::InsufficientData` - No rows
    /// * `MarketDataError::InvalidVolatility` - A quote is not strictly
    ///   positive and finite
    /// * `MarketDataError::Interpolation` - Non-finite coordinates
    pub fn from_rows(rows: &[(T, T, T)]) -> Result<Self, MarketDataError> {
        if rows.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        for &(t, strike, vol) in rows {
            check_volatility(vol, t, strike)?;
        }
        let interp = NearestNeighbourInterpolator::new(rows)?;
        Ok(Self { interp })
    }

    /// Builds the surface from parallel columns.
    pub fn new(maturities: &[T], strikes: &[T], vols: &[T]) -> Result<Self, MarketDataError> {
        if maturities.len() != strikes.len() || strikes.len() != vols.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "column lengths differ: {} maturities, {} strikes, {} vols",
                maturities.len(),
                strikes.len(),
                vols.len()
            ))
            .into());
        }
        let rows: Vec<(T, T, T)> = maturities
            .iter()
            .zip(strikes)
            .zip(vols)
            .map(|((&t, &k), &v)| (t, k, v))
            .collect();
        Self::from_rows(&rows)
    }

    /// Returns the quotes as `(maturity, strike, vol)`.
    #[inline]
    pub fn quotes(&self) -> &[(T, T, T)] {
        self.interp.nodes()
    }

    /// Returns the number of quotes.
    #[inline]
    pub fn len(&self) -> usize {
        self.interp.len()
    }

    /// Returns `true` if the surface holds no quotes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interp.is_empty()
    }
}

impl<T: Float> VolatilitySurface<T> for NearestVolSurface<T> {
    fn volatility(&self, t: T, strike: T) -> Result<T, MarketDataError> {
        Ok(self.interp.interpolate(t, strike)?)
    }
}
