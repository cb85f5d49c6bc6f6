//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `InterpolationError`: Errors from interpolation operations

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use autocall_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date arithmetic left the representable calendar range.
    #[error("Date arithmetic overflow: {0}")]
    Overflow(String),
}

/// Interpolation-related errors.
///
/// # Examples
/// ```
/// use autocall_core::types::InterpolationError;
///
/// let err = InterpolationError::InsufficientData { got: 1, need: 2 };
/// assert!(format!("{}", err).contains("need at least 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Two knots share the same abscissa.
    #[error("Duplicate knot at x = {x}")]
    DuplicateKnot {
        /// The repeated x-coordinate
        x: f64,
    },

    /// Non-finite coordinate or value.
    #[error("Non-finite data at index {index}")]
    NonFiniteData {
        /// Index of the offending point
        index: usize,
    },

    /// General invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
