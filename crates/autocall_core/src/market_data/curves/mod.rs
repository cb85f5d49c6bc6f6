//! Yield curves for drift rates and discounting.
//!
//! - [`YieldCurve`]: Zero rate and discount factor contract
//! - [`FlatCurve`]: Constant rate
//! - [`ZeroRateCurve`]: Pillar zero rates, linear interpolation with linear extrapolation

mod flat;
mod traits;
mod zero_rate;

pub use flat::FlatCurve;
pub use traits::YieldCurve;
pub use zero_rate::ZeroRateCurve;
