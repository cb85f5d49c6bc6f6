//! Business-day rules.

use super::error::ScheduleError;
use autocall_core::types::time::Date;
use chrono::Weekday;

/// Business-day calendar.
///
/// Only `is_business_day` is required; the roll conventions are derived
/// from it.
pub trait BusinessCalendar {
    /// Returns `true` if `date` is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Rolls `date` back to the closest business day on or before it.
    fn adjust_preceding(&self, date: Date) -> Result<Date, ScheduleError> {
        let mut current = date;
        while !self.is_business_day(current) {
            current = current.add_days(-1).map_err(|e| ScheduleError::DateOverflow {
                reason: e.to_string(),
            })?;
        }
        Ok(current)
    }

    /// Returns the last business day of `month` in `year`.
    fn business_month_end(&self, year: i32, month: u32) -> Result<Date, ScheduleError> {
        let eom = Date::from_ymd(year, month, 1)
            .and_then(|first| first.end_of_month())
            .map_err(|e| ScheduleError::DateOverflow {
                reason: e.to_string(),
            })?;
        self.adjust_preceding(eom)
    }
}

/// Calendar whose only holidays are Saturdays and Sundays.
///
/// # Examples
///
/// ```
/// use autocall_models::schedules::{BusinessCalendar, WeekendCalendar};
/// use autocall_core::types::time::Date;
///
/// // 31 March 2024 is a Sunday
/// let bme = WeekendCalendar.business_month_end(2024, 3).unwrap();
/// assert_eq!(bme, Date::from_ymd(2024, 3, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendCalendar;

impl BusinessCalendar for WeekendCalendar {
    #[inline]
    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
