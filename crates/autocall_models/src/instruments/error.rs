//! Instrument error types.

use thiserror::Error;

/// Contract parameter errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// A numeric parameter is out of its admissible range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Admissible range
        reason: &'static str,
    },

    /// Unrecognised basket strategy tag.
    #[error("Unknown basket strategy: '{0}'")]
    UnknownStrategy(String),
}
