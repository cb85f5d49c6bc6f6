//! # autocall_core: Foundation Layer for the Autocall Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! autocall_core is the bottom layer of the three-crate workspace, providing:
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Error types: `DateError`, `InterpolationError` (`types::error`)
//! - Interpolators: linear with extrapolation, 2-D nearest neighbour (`math::interpolators`)
//! - Market data: yield curves and volatility surfaces (`market_data`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other autocall_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use autocall_core::market_data::curves::{YieldCurve, ZeroRateCurve};
//! use autocall_core::types::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 3, 1).unwrap();
//! let end = Date::from_ymd(2025, 3, 1).unwrap();
//! let t = DayCountConvention::ActualActual360.year_fraction_dates(start, end);
//!
//! let curve = ZeroRateCurve::new(&[0.5, 1.0, 2.0], &[0.03, 0.032, 0.035]).unwrap();
//! let df = curve.discount_factor(t).unwrap();
//! assert!(df < 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `Date` and `DayCountConvention`

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
