//! Core time and error types.
//!
//! This module provides:
//! - `time`: `Date` and `DayCountConvention` for year-fraction arithmetic
//! - `error`: Structured error types for date and interpolation operations
//!
//! # Re-exports
//!
//! - [`Date`], [`DayCountConvention`] from `time`
//! - [`DateError`], [`InterpolationError`] from `error`

pub mod error;
pub mod time;

pub use error::{DateError, InterpolationError};
pub use time::{Date, DayCountConvention};
