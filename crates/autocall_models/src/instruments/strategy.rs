//! Basket strategy selector.

use super::error::InstrumentError;
use std::fmt;
use std::str::FromStr;

/// How the effective price path is derived from the underlyings.
///
/// # Examples
///
/// ```
/// use autocall_models::instruments::BasketStrategy;
///
/// let s: BasketStrategy = "worst-off".parse().unwrap();
/// assert_eq!(s, BasketStrategy::WorstOf);
/// assert_eq!(s.min_assets(), 2);
/// assert_eq!(BasketStrategy::Mono.to_string(), "mono");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BasketStrategy {
    /// Path of the first underlying.
    #[default]
    Mono,
    /// Minimum of the normalised underlying prices.
    WorstOf,
    /// Maximum of the normalised underlying prices.
    BestOf,
}

impl BasketStrategy {
    /// Minimum number of underlyings the strategy needs.
    #[inline]
    pub fn min_assets(&self) -> usize {
        match self {
            BasketStrategy::Mono => 1,
            BasketStrategy::WorstOf | BasketStrategy::BestOf => 2,
        }
    }

    /// Returns the canonical tag.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            BasketStrategy::Mono => "mono",
            BasketStrategy::WorstOf => "worst-off",
            BasketStrategy::BestOf => "best-off",
        }
    }
}

impl fmt::Display for BasketStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BasketStrategy {
    type Err = InstrumentError;

    /// Parses a strategy tag (case-insensitive).
    ///
    /// Accepts "mono", "worst-off"/"worst-of" and "best-off"/"best-of".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "mono" | "monoasset" | "single" => Ok(BasketStrategy::Mono),
            "worstoff" | "worstof" | "worst" => Ok(BasketStrategy::WorstOf),
            "bestoff" | "bestof" | "best" => Ok(BasketStrategy::BestOf),
            _ => Err(InstrumentError::UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::BasketStrategy;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for BasketStrategy {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for BasketStrategy {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            BasketStrategy::from_str(&s).map_err(de::Error::custom)
        }
    }
}
