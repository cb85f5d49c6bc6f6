//! Numerical building blocks shared by the market data layer.

pub mod interpolators;
