//! # Autocall Models (L2: Business Logic)
//!
//! Everything that describes *what* is priced, independent of how the paths
//! are generated:
//!
//! - [`underlying`]: Underlying assets with their volatility surface and rate curve
//! - [`correlation`]: Correlation matrices, Cholesky factors and correlation sources
//! - [`schedules`]: Observation frequencies, business-day rules and observation schedules
//! - [`instruments`]: Autocallable note terms and basket strategies
//!
//! ## Design Principles
//!
//! - **Validation at construction**: every type here is immutable and valid once built
//! - **Builder pattern** for the multi-field configuration types
//! - **Enum-based strategy selection** for static dispatch in the engine

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod correlation;
pub mod instruments;
pub mod schedules;
pub mod underlying;

pub use correlation::{
    CholeskyFactor, CorrelationError, CorrelationMatrix, CorrelationSource, PairwiseCorrelations,
};
pub use instruments::{AutocallTerms, AutocallTermsBuilder, Barrier, BasketStrategy, InstrumentError};
pub use schedules::{
    BusinessCalendar, ObservationFrequency, ObservationSchedule, ObservationScheduleBuilder,
    ScheduleError, WeekendCalendar,
};
pub use underlying::{Underlying, UnderlyingBuilder, UnderlyingError};
