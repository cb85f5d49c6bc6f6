//! Underlying assets and their market data.

use autocall_core::market_data::curves::{YieldCurve, ZeroRateCurve};
use autocall_core::market_data::surfaces::{NearestVolSurface, VolatilitySurface};
use autocall_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors raised while assembling an [`Underlying`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnderlyingError {
    /// Ticker is empty or blank.
    #[error("Underlying ticker must not be empty")]
    EmptyTicker,

    /// Spot is not strictly positive and finite.
    #[error("Invalid spot {spot} for '{ticker}'")]
    InvalidSpot {
        /// Ticker of the asset
        ticker: String,
        /// Offending spot
        spot: f64,
    },

    /// Dividend yield is not finite.
    #[error("Invalid dividend yield {dividend_yield} for '{ticker}'")]
    InvalidDividendYield {
        /// Ticker of the asset
        ticker: String,
        /// Offending yield
        dividend_yield: f64,
    },

    /// Surface or curve construction failed.
    #[error("Market data for '{ticker}': {source}")]
    MarketData {
        /// Ticker of the asset
        ticker: String,
        /// Underlying cause
        #[source]
        source: MarketDataError,
    },
}

/// One underlying asset as seen by the path simulator.
///
/// Immutable once constructed. The simulation borrows underlyings rather
/// than owning them.
///
/// # Example
///
/// ```
/// use autocall_models::underlying::Underlying;
///
/// let asset = Underlying::builder("SX5E")
///     .spot(4_500.0)
///     .dividend_yield(0.03)
///     .vol_rows(&[(0.5, 4_000.0, 0.22), (0.5, 5_000.0, 0.18)])
///     .rate_rows(&[(0.5, 0.030), (2.0, 0.028)])
///     .build()
///     .unwrap();
///
/// assert_eq!(asset.ticker(), "SX5E");
/// assert_eq!(asset.volatility(0.1, 4_100.0).unwrap(), 0.22);
/// ```
#[derive(Debug, Clone)]
pub struct Underlying {
    ticker: String,
    spot: f64,
    dividend_yield: f64,
    vol_surface: NearestVolSurface<f64>,
    rate_curve: ZeroRateCurve<f64>,
}

impl Underlying {
    /// Assembles an underlying from already-built market data.
    ///
    /// # Errors
    ///
    /// Blank ticker, non-positive or non-finite spot, non-finite dividend
    /// yield.
    pub fn new(
        ticker: impl Into<String>,
        spot: f64,
        dividend_yield: f64,
        vol_surface: NearestVolSurface<f64>,
        rate_curve: ZeroRateCurve<f64>,
    ) -> Result<Self, UnderlyingError> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(UnderlyingError::EmptyTicker);
        }
        if !(spot > 0.0) || !spot.is_finite() {
            return Err(UnderlyingError::InvalidSpot { ticker, spot });
        }
        if !dividend_yield.is_finite() {
            return Err(UnderlyingError::InvalidDividendYield {
                ticker,
                dividend_yield,
            });
        }

        Ok(Self {
            ticker,
            spot,
            dividend_yield,
            vol_surface,
            rate_curve,
        })
    }

    /// Starts a builder taking raw provider rows.
    pub fn builder(ticker: impl Into<String>) -> UnderlyingBuilder {
        UnderlyingBuilder::new(ticker)
    }

    /// Underlying with constant volatility and a flat rate curve.
    ///
    /// ```
    /// use autocall_models::underlying::Underlying;
    ///
    /// let asset = Underlying::flat("ABC", 100.0, 0.0, 0.2, 0.03).unwrap();
    /// assert_eq!(asset.volatility(3.0, 250.0).unwrap(), 0.2);
    /// assert!((asset.rate(10.0).unwrap() - 0.03).abs() < 1e-15);
    /// ```
    pub fn flat(
        ticker: impl Into<String>,
        spot: f64,
        dividend_yield: f64,
        vol: f64,
        rate: f64,
    ) -> Result<Self, UnderlyingError> {
        Self::builder(ticker)
            .spot(spot)
            .dividend_yield(dividend_yield)
            .vol_rows(&[(0.0, spot, vol)])
            .rate_rows(&[(0.0, rate), (1.0, rate)])
            .build()
    }

    /// Returns the ticker.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the day-0 spot.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Returns the volatility surface.
    #[inline]
    pub fn vol_surface(&self) -> &NearestVolSurface<f64> {
        &self.vol_surface
    }

    /// Returns the rate curve.
    #[inline]
    pub fn rate_curve(&self) -> &ZeroRateCurve<f64> {
        &self.rate_curve
    }

    /// Volatility at elapsed time `t` (years) and spot level `level`.
    #[inline]
    pub fn volatility(&self, t: f64, level: f64) -> Result<f64, MarketDataError> {
        self.vol_surface.volatility(t, level)
    }

    /// Drift rate at elapsed time `t` (years).
    #[inline]
    pub fn rate(&self, t: f64) -> Result<f64, MarketDataError> {
        self.rate_curve.zero_rate(t)
    }
}

/// Builder for [`Underlying`] from provider rows.
#[derive(Debug, Clone)]
pub struct UnderlyingBuilder {
    ticker: String,
    spot: Option<f64>,
    dividend_yield: f64,
    vol_rows: Vec<(f64, f64, f64)>,
    rate_rows: Vec<(f64, f64)>,
}

impl UnderlyingBuilder {
    fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            spot: None,
            dividend_yield: 0.0,
            vol_rows: Vec::new(),
            rate_rows: Vec::new(),
        }
    }

    /// Sets the day-0 spot.
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the dividend yield (default 0).
    pub fn dividend_yield(mut self, q: f64) -> Self {
        self.dividend_yield = q;
        self
    }

    /// Sets volatility quotes as `(maturity in years, strike, vol)` rows.
    pub fn vol_rows(mut self, rows: &[(f64, f64, f64)]) -> Self {
        self.vol_rows = rows.to_vec();
        self
    }

    /// Sets rate pillars as `(maturity in years, rate)` rows.
    pub fn rate_rows(mut self, rows: &[(f64, f64)]) -> Self {
        self.rate_rows = rows.to_vec();
        self
    }

    /// Builds the underlying.
    ///
    /// # Errors
    ///
    /// Missing spot is reported as `InvalidSpot` with a NaN spot. Surface
    /// and curve failures are wrapped in `MarketData`.
    pub fn build(self) -> Result<Underlying, UnderlyingError> {
        let ticker = self.ticker;
        let wrap = |source: MarketDataError| UnderlyingError::MarketData {
            ticker: ticker.clone(),
            source,
        };

        let vol_surface = NearestVolSurface::from_rows(&self.vol_rows).map_err(wrap)?;
        let rate_curve = ZeroRateCurve::from_rows(&self.rate_rows).map_err(wrap)?;
        let spot = self.spot.unwrap_or(f64::NAN);

        Underlying::new(ticker, spot, self.dividend_yield, vol_surface, rate_curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Underlying {
        Underlying::builder("AAA")
            .spot(100.0)
            .dividend_yield(0.01)
            .vol_rows(&[(0.25, 90.0, 0.30), (0.25, 110.0, 0.20), (1.0, 100.0, 0.25)])
            .rate_rows(&[(0.5, 0.02), (1.5, 0.04)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let u = sample();
        assert_eq!(u.ticker(), "AAA");
        assert_eq!(u.spot(), 100.0);
        assert_eq!(u.dividend_yield(), 0.01);
        assert_eq!(u.vol_surface().len(), 3);
        assert_eq!(u.rate_curve().maturities(), &[0.5, 1.5]);
    }

    #[test]
    fn test_lookups() {
        let u = sample();
        assert_eq!(u.volatility(0.2, 92.0).unwrap(), 0.30);
        assert_relative_eq!(u.rate(1.0).unwrap(), 0.03, epsilon = 1e-14);
        // Extrapolated below the first pillar
        assert_relative_eq!(u.rate(0.0).unwrap(), 0.01, epsilon = 1e-14);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            Underlying::flat("", 100.0, 0.0, 0.2, 0.0),
            Err(UnderlyingError::EmptyTicker)
        ));
        assert!(matches!(
            Underlying::flat("X", -1.0, 0.0, 0.2, 0.0),
            Err(UnderlyingError::InvalidSpot { .. })
        ));
        assert!(matches!(
            Underlying::flat("X", 100.0, f64::NAN, 0.2, 0.0),
            Err(UnderlyingError::InvalidDividendYield { .. })
        ));
        assert!(matches!(
            Underlying::flat("X", 100.0, 0.0, 0.0, 0.0),
            Err(UnderlyingError::MarketData { .. })
        ));
    }

    #[test]
    fn test_missing_spot() {
        let err = Underlying::builder("X")
            .vol_rows(&[(1.0, 100.0, 0.2)])
            .rate_rows(&[(1.0, 0.0), (2.0, 0.0)])
            .build();
        assert!(matches!(err, Err(UnderlyingError::InvalidSpot { .. })));
    }

    #[test]
    fn test_missing_market_data() {
        let err = Underlying::builder("X").spot(100.0).build();
        assert!(matches!(err, Err(UnderlyingError::MarketData { .. })));
    }
}
