//! Market data error types.
//!
//! Structured errors for rate curve and volatility surface construction and
//! lookups.

use crate::types::InterpolationError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Examples
///
/// ```
/// use autocall_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative or non-finite time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Invalid volatility quote (non-positive or non-finite).
    #[error("Invalid volatility {vol} at (t = {t}, K = {strike})")]
    InvalidVolatility {
        /// The offending volatility
        vol: f64,
        /// Maturity of the quote in years
        t: f64,
        /// Strike of the quote
        strike: f64,
    },

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_invalid_volatility_display() {
        let err = MarketDataError::InvalidVolatility {
            vol: 0.0,
            t: 0.5,
            strike: 100.0,
        };
        assert_eq!(
            format!("{}", err),
            "Invalid volatility 0 at (t = 0.5, K = 100)"
        );
    }

    #[test]
    fn test_from_interpolation_error() {
        let interp_err = InterpolationError::InsufficientData { got: 1, need: 2 };
        let mkt_err: MarketDataError = interp_err.into();
        assert!(matches!(mkt_err, MarketDataError::Interpolation(_)));
    }
}
