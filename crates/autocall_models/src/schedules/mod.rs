//! Observation schedules for autocallable notes.
//!
//! This module provides:
//! - [`ObservationFrequency`]: Observation cadence (monthly, quarterly, semiannual, annual)
//! - [`BusinessCalendar`] / [`WeekendCalendar`]: Business-day rules
//! - [`ObservationSchedule`]: Ordered, deduplicated observation dates
//! - [`ObservationScheduleBuilder`]: Builder deriving the dates from a frequency
//!
//! # Examples
//!
//! ```
//! use autocall_models::schedules::{ObservationFrequency, ObservationScheduleBuilder};
//! use autocall_core::types::time::Date;
//!
//! let schedule = ObservationScheduleBuilder::new()
//!     .start(Date::from_ymd(2024, 1, 15).unwrap())
//!     .end(Date::from_ymd(2025, 1, 15).unwrap())
//!     .frequency(ObservationFrequency::Quarterly)
//!     .build()
//!     .unwrap();
//!
//! // Business quarter ends of Mar, Jun, Sep and Dec 2024
//! assert_eq!(schedule.len(), 4);
//! assert_eq!(schedule.last(), Some(Date::from_ymd(2024, 12, 31).unwrap()));
//! ```

mod calendar;
mod error;
mod frequency;
mod observation;

pub use calendar::{BusinessCalendar, WeekendCalendar};
pub use error::ScheduleError;
pub use frequency::ObservationFrequency;
pub use observation::{ObservationSchedule, ObservationScheduleBuilder};
