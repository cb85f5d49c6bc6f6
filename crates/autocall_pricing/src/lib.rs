//! # Autocall Pricing (L3: Engine)
//!
//! Monte Carlo valuation of autocallable notes on one or more underlyings.
//!
//! ## Pipeline
//!
//! 1. [`config::SimulationConfig`]: dates, simulation count, day count,
//!    observation frequency and seed
//! 2. [`mc::CorrelatedShocks`]: correlated Gaussian increments from one owned
//!    [`rng::PricerRng`]
//! 3. [`mc::MonteCarloSimulation`]: daily local-volatility paths per
//!    underlying plus the observation schedule
//! 4. [`payoff::Autocall`]: coupon, autocall and put cashflows under a
//!    mono, worst-of or best-of strategy, discounted on a yield curve
//! 5. [`aggregate`]: average price, standard error and probability profiles
//!
//! Every stage is a pure function of its inputs and the seeded generator:
//! the same seed gives bit-identical paths and payoffs on any thread count.
//!
//! ## Usage Example
//!
//! ```rust
//! use autocall_pricing::prelude::*;
//! use autocall_core::market_data::curves::FlatCurve;
//! use autocall_core::types::time::Date;
//!
//! let assets = vec![
//!     Underlying::flat("AAA", 100.0, 0.01, 0.25, 0.03).unwrap(),
//!     Underlying::flat("BBB", 40.0, 0.0, 0.30, 0.03).unwrap(),
//! ];
//! let corr = CorrelationMatrix::new(&[1.0, 0.6, 0.6, 1.0], 2).unwrap();
//! let config = SimulationConfig::builder()
//!     .start_date(Date::from_ymd(2024, 1, 2).unwrap())
//!     .end_date(Date::from_ymd(2025, 1, 2).unwrap())
//!     .n_simulations(1_000)
//!     .frequency(ObservationFrequency::Quarterly)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let simulation = MonteCarloSimulation::run(&assets, &corr, &config).unwrap();
//! let terms = AutocallTerms::builder()
//!     .coupon_rate(0.02)
//!     .coupon_barrier(1.0)
//!     .autocall_barrier(1.05)
//!     .put_barrier(0.7)
//!     .build()
//!     .unwrap();
//! let curve = FlatCurve::new(0.03);
//! let note = Autocall::new(&simulation, BasketStrategy::WorstOf, terms, &curve).unwrap();
//!
//! let summary = note.summary();
//! assert_eq!(summary.autocall_probabilities.len(), simulation.schedule().len());
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod mc;
pub mod payoff;
pub mod rng;

pub use error::{ConfigurationError, EngineError, NumericalError, ValidationError};

/// Common imports for pricing a note end to end.
pub mod prelude {
    pub use crate::aggregate::PricingSummary;
    pub use crate::config::SimulationConfig;
    pub use crate::error::EngineError;
    pub use crate::mc::MonteCarloSimulation;
    pub use crate::payoff::Autocall;
    pub use crate::rng::PricerRng;
    pub use autocall_models::{
        AutocallTerms, BasketStrategy, CorrelationMatrix, ObservationFrequency, Underlying,
    };
}
