//! Observation frequency enumeration.

use super::error::ScheduleError;
use std::fmt;
use std::str::FromStr;

/// How often the note observes its barriers.
///
/// Each frequency anchors observations on business month ends of a fixed
/// set of calendar months.
///
/// # Examples
///
/// ```
/// use autocall_models::schedules::ObservationFrequency;
///
/// let freq: ObservationFrequency = "semi-annual".parse().unwrap();
/// assert_eq!(freq, ObservationFrequency::SemiAnnual);
/// assert_eq!(freq.anchor_months(), &[2, 8]);
/// assert!("fortnightly".parse::<ObservationFrequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObservationFrequency {
    /// Every business month end.
    Monthly,
    /// Business quarter ends (Mar, Jun, Sep, Dec).
    #[default]
    Quarterly,
    /// Business month ends of February and August.
    SemiAnnual,
    /// Business year end (December).
    Annual,
}

impl ObservationFrequency {
    /// Returns the calendar months (1-12) carrying an observation.
    pub fn anchor_months(&self) -> &'static [u32] {
        match self {
            ObservationFrequency::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            ObservationFrequency::Quarterly => &[3, 6, 9, 12],
            ObservationFrequency::SemiAnnual => &[2, 8],
            ObservationFrequency::Annual => &[12],
        }
    }

    /// Returns `true` if `month` carries an observation.
    #[inline]
    pub fn is_anchor_month(&self, month: u32) -> bool {
        self.anchor_months().contains(&month)
    }

    /// Returns the number of observations per year.
    #[inline]
    pub fn periods_per_year(&self) -> u32 {
        self.anchor_months().len() as u32
    }

    /// Returns the canonical tag.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            ObservationFrequency::Monthly => "monthly",
            ObservationFrequency::Quarterly => "quarterly",
            ObservationFrequency::SemiAnnual => "semiannually",
            ObservationFrequency::Annual => "annually",
        }
    }
}

impl fmt::Display for ObservationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ObservationFrequency {
    type Err = ScheduleError;

    /// Parses a frequency tag (case-insensitive).
    ///
    /// Supported formats:
    /// - Monthly: "monthly", "1m"
    /// - Quarterly: "quarterly", "3m"
    /// - SemiAnnual: "semiannually", "semiannual", "semi-annual", "6m"
    /// - Annual: "annually", "annual", "yearly", "1y", "12m"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "monthly" | "1m" => Ok(ObservationFrequency::Monthly),
            "quarterly" | "3m" => Ok(ObservationFrequency::Quarterly),
            "semiannually" | "semiannual" | "6m" => Ok(ObservationFrequency::SemiAnnual),
            "annually" | "annual" | "yearly" | "1y" | "12m" => Ok(ObservationFrequency::Annual),
            _ => Err(ScheduleError::UnknownFrequency { tag: s.to_string() }),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::ObservationFrequency;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for ObservationFrequency {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for ObservationFrequency {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            ObservationFrequency::from_str(&s).map_err(de::Error::custom)
        }
    }
}
