//! Market data structures consumed by the simulation.
//!
//! This module provides rate curve and volatility surface abstractions for
//! discount factors, drift rates and local volatility lookups.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations (`FlatCurve`, `ZeroRateCurve`)
//! - [`surfaces`]: Volatility surface trait and implementations (`FlatVol`, `NearestVolSurface`)
//! - [`error`]: Market data error types (`MarketDataError`)
//!
//! # Example
//!
//! ```
//! use autocall_core::market_data::curves::{YieldCurve, FlatCurve};
//! use autocall_core::market_data::surfaces::{VolatilitySurface, FlatVol};
//!
//! let curve = FlatCurve::new(0.05_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//!
//! let vol_surface = FlatVol::new(0.20_f64).unwrap();
//! assert_eq!(vol_surface.volatility(0.5, 100.0).unwrap(), 0.20);
//! ```

pub mod curves;
pub mod error;
pub mod surfaces;

pub use curves::{FlatCurve, YieldCurve, ZeroRateCurve};
pub use error::MarketDataError;
pub use surfaces::{FlatVol, NearestVolSurface, VolatilitySurface};
