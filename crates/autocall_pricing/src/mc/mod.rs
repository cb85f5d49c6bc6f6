//! Monte Carlo path generation.
//!
//! Pipeline, leaf first:
//!
//! 1. [`CorrelatedShocks`]: Cholesky-correlated Gaussian increments, drawn
//!    from one owned generator
//! 2. [`PathSimulator`]: daily local-volatility evolution of one underlying
//! 3. [`MonteCarloSimulation`]: one [`PricePathSet`] per underlying plus the
//!    observation schedule
//!
//! Path evolution runs in parallel across simulations. Every shock is drawn
//! before any path is evolved, so results do not depend on the thread count.

mod paths;
mod shocks;
mod simulation;

pub use paths::{PathSimulator, PricePathSet};
pub use shocks::CorrelatedShocks;
pub use simulation::MonteCarloSimulation;
