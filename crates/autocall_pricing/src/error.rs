//! Error types for the simulation and payoff engine.
//!
//! Errors are grouped by when they can be detected:
//!
//! - [`ConfigurationError`]: the inputs describe something that cannot be priced
//! - [`ValidationError`]: the inputs are inconsistent with each other
//! - [`NumericalError`]: the computation produced or consumed invalid numbers
//!
//! All three fold into [`EngineError`], the error type of every public
//! engine operation.

use autocall_core::market_data::MarketDataError;
use autocall_core::types::time::Date;
use autocall_models::{
    BasketStrategy, CorrelationError, InstrumentError, ScheduleError, UnderlyingError,
};
use thiserror::Error;

/// Inputs that cannot describe a valid simulation or contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Correlation matrix rejected (including non positive semi-definite).
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// Observation schedule could not be derived.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Contract terms rejected.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Underlying rejected.
    #[error(transparent)]
    Underlying(#[from] UnderlyingError),

    /// End date not strictly after start date.
    #[error("End date {end} must be after start date {start}")]
    InvalidDateRange {
        /// Simulation start
        start: Date,
        /// Simulation end
        end: Date,
    },

    /// Basket strategy given too few underlyings.
    #[error("Strategy {strategy} needs at least {need} underlyings, got {got}")]
    StrategyRequiresBasket {
        /// Selected strategy
        strategy: BasketStrategy,
        /// Minimum number of underlyings
        need: usize,
        /// Number supplied
        got: usize,
    },

    /// Simulation parameter out of range.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },
}

/// Inputs whose shapes or contents disagree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two inputs that must agree in size do not.
    #[error("Shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// What was being compared
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        got: usize,
    },

    /// No observation dates to evaluate.
    #[error("Observation schedule has no dates")]
    EmptySchedule,

    /// An observation date outside the simulated range.
    #[error("Observation date {date} is outside the simulated range ({start}, {end}]")]
    ObservationOutOfRange {
        /// Offending date
        date: Date,
        /// Simulation start
        start: Date,
        /// Simulation end
        end: Date,
    },

    /// No paths, no underlyings or no simulations.
    #[error("Price path input is empty")]
    EmptyPaths,

    /// A supplied price is non-finite or non-positive.
    #[error("Malformed price {value} for '{ticker}' at time index {step}, simulation {simulation}")]
    MalformedPrice {
        /// Ticker of the asset
        ticker: String,
        /// Time index
        step: usize,
        /// Simulation index
        simulation: usize,
        /// Offending value
        value: f64,
    },

    /// Reproducibility was requested without a seed.
    #[error("A seed is required for a reproducible simulation")]
    MissingSeed,
}

/// Invalid numbers met during path evolution or valuation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Evolved price is non-finite or non-positive.
    #[error("Invalid price {value} for '{ticker}' at step {step}, simulation {simulation}")]
    InvalidPrice {
        /// Ticker of the asset
        ticker: String,
        /// Time index
        step: usize,
        /// Simulation index
        simulation: usize,
        /// Offending value
        value: f64,
    },

    /// Volatility or rate lookup failed.
    #[error("Market data lookup failed: {0}")]
    MarketData(#[from] MarketDataError),
}

/// Top-level engine error.
///
/// # Examples
///
/// ```
/// use autocall_pricing::error::{EngineError, ValidationError};
///
/// let err: EngineError = ValidationError::EmptySchedule.into();
/// assert_eq!(err.to_string(), "Validation error: Observation schedule has no dates");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Numerical error.
    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),
}

macro_rules! configuration_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for EngineError {
                fn from(err: $source) -> Self {
                    EngineError::Configuration(err.into())
                }
            }
        )*
    };
}

configuration_from!(CorrelationError, ScheduleError, InstrumentError, UnderlyingError);

impl From<MarketDataError> for EngineError {
    fn from(err: MarketDataError) -> Self {
        EngineError::Numerical(err.into())
    }
}
