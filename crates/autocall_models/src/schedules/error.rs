//! Schedule generation error types.

use autocall_core::types::time::Date;
use thiserror::Error;

/// Errors that can occur during schedule generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// End date must be strictly after start date.
    #[error("End date {end} must be after start date {start}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Unrecognised observation frequency tag.
    #[error("Unknown observation frequency: '{tag}'")]
    UnknownFrequency {
        /// The tag as supplied.
        tag: String,
    },

    /// Date arithmetic overflow.
    #[error("Date arithmetic overflow: {reason}")]
    DateOverflow {
        /// Reason for the overflow.
        reason: String,
    },
}
