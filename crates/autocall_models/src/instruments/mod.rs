//! Autocallable note contract terms.
//!
//! - [`AutocallTerms`]: Nominal, coupon rate and the three barriers
//! - [`BasketStrategy`]: Mono-asset, worst-of or best-of path selection
//! - [`InstrumentError`]: Invalid contract parameters

mod autocall;
mod error;
mod strategy;

pub use autocall::{AutocallTerms, AutocallTermsBuilder, Barrier, DEFAULT_NOMINAL};
pub use error::InstrumentError;
pub use strategy::BasketStrategy;
