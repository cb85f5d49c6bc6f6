//! Autocallable payoff evaluation.
//!
//! - [`EffectivePath`]: mono, worst-of or best-of path selection
//! - [`PathState`]: per-path eligibility and ratio extremes
//! - [`evaluate_payoffs`]: coupon, autocall and put cashflows per path
//! - [`Autocall`]: a note valued on a [`crate::mc::MonteCarloSimulation`],
//!   with its results cached
//!
//! Paths are evaluated in parallel across simulations; each simulation's
//! dates are walked in order with its own [`PathState`].

mod autocall;
mod engine;
mod matrix;
mod state;
mod strategy;

pub use autocall::Autocall;
pub use engine::{evaluate_payoffs, PayoffMatrices};
pub use matrix::ObservationMatrix;
pub use state::PathState;
pub use strategy::EffectivePath;
