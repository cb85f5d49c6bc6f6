//! Volatility surfaces.
//!
//! - [`VolatilitySurface`]: Volatility lookup contract on (maturity, strike)
//! - [`FlatVol`]: Constant volatility
//! - [`NearestVolSurface`]: Scattered quotes, nearest-neighbour lookup

mod flat;
mod nearest;
mod traits;

pub use flat::FlatVol;
pub use nearest::NearestVolSurface;
pub use traits::VolatilitySurface;
