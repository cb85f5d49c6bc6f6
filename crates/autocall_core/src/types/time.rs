//! Time types and day count conventions for the simulation calendar.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Year-fraction conventions (ACT/365, ACT/360, 30/360)
//!
//! # Examples
//!
//! ```
//! use autocall_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::ActualActual360.year_fraction_dates(start, end);
//! assert!((yf - 182.0 / 360.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Serialises as an ISO 8601 string (`YYYY-MM-DD`).
///
/// # Examples
///
/// ```
/// use autocall_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns `true` for Saturdays and Sundays.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 6, 15).unwrap().is_weekend()); // Saturday
    /// assert!(!Date::from_ymd(2024, 6, 14).unwrap().is_weekend()); // Friday
    /// ```
    pub fn is_weekend(&self) -> bool {
        matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns the date shifted by `days` calendar days (negative moves back).
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} shifted by {} days", self, days)))
    }

    /// Returns the last calendar day of the month containing this date.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_core::types::time::Date;
    ///
    /// let eom = Date::from_ymd(2024, 2, 10).unwrap().end_of_month().unwrap();
    /// assert_eq!(eom, Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn end_of_month(&self) -> Result<Self, DateError> {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        Date::from_ymd(year, month, 1)?.add_days(-1)
    }

    /// Returns every calendar day from `start` to `end`, both inclusive.
    ///
    /// Empty when `end < start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_core::types::time::Date;
    ///
    /// let start = Date::from_ymd(2024, 12, 30).unwrap();
    /// let end = Date::from_ymd(2025, 1, 2).unwrap();
    /// assert_eq!(Date::daily_range(start, end).len(), 4);
    /// ```
    pub fn daily_range(start: Date, end: Date) -> Vec<Date> {
        start
            .0
            .iter_days()
            .take_while(|d| *d <= end.0)
            .map(Date)
            .collect()
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Day Count Convention (year fraction convention).
///
/// The convention also fixes the simulation's daily time step: one calendar
/// day is `1 / days_per_year()` years.
///
/// # Variants
/// - `ActualActual365`: Actual days / 365
/// - `ActualActual360`: Actual days / 360
/// - `Thirty360`: Each month treated as 30 days, year as 360 days
///
/// # Examples
///
/// ```
/// use autocall_core::types::time::DayCountConvention;
///
/// assert_eq!(DayCountConvention::ActualActual360.days_per_year(), 360);
/// assert_eq!("ACT/365".parse::<DayCountConvention>().unwrap(),
///            DayCountConvention::ActualActual365);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    ActualActual365,

    /// Actual/360: actual_days / 360.0
    #[default]
    ActualActual360,

    /// 30/360 US Bond Basis
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::ActualActual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Returns the number of days in a year under this convention.
    #[inline]
    pub fn days_per_year(&self) -> u32 {
        match self {
            DayCountConvention::ActualActual365 => 365,
            DayCountConvention::ActualActual360 | DayCountConvention::Thirty360 => 360,
        }
    }

    /// Converts a count of elapsed calendar days into years.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::ActualActual360.years_from_days(180), 0.5);
    /// ```
    #[inline]
    pub fn years_from_days(&self, days: i64) -> f64 {
        days as f64 / self.days_per_year() as f64
    }

    /// Calculates the year fraction between two dates.
    ///
    /// Returns negative values when `start > end`.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::ActualActual365 | DayCountConvention::ActualActual360 => {
                self.years_from_days(end - start)
            }
            DayCountConvention::Thirty360 => {
                let (first, last, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };

                let d1 = if first.day() == 31 { 30 } else { first.day() };
                let d2 = if last.day() == 31 && d1 == 30 {
                    30
                } else {
                    last.day()
                };

                let days = 360 * (last.year() - first.year())
                    + 30 * (last.month() as i32 - first.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses day count convention from string (case-insensitive).
    ///
    /// Accepts the bare basis too: "360" and "365".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365" | "ACTUAL365" | "A365" | "365" => Ok(DayCountConvention::ActualActual365),
            "ACT360" | "ACTUAL360" | "A360" | "360" => Ok(DayCountConvention::ActualActual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}
