//! ObservationSchedule and ObservationScheduleBuilder implementation.

use super::calendar::{BusinessCalendar, WeekendCalendar};
use super::error::ScheduleError;
use super::frequency::ObservationFrequency;
use autocall_core::types::time::Date;
use tracing::{debug, warn};

/// Ordered, deduplicated observation dates of a note.
///
/// The same dates index the rows of the payoff matrices, so the order is
/// part of the contract.
///
/// # Examples
///
/// ```
/// use autocall_models::schedules::ObservationSchedule;
/// use autocall_core::types::time::Date;
///
/// let d1 = Date::from_ymd(2024, 6, 28).unwrap();
/// let d2 = Date::from_ymd(2024, 12, 31).unwrap();
///
/// let schedule = ObservationSchedule::from_dates(vec![d2, d1, d2]);
/// assert_eq!(schedule.dates(), &[d1, d2]);
/// assert_eq!(schedule.index_of(d2), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Date>", into = "Vec<Date>"))]
pub struct ObservationSchedule {
    dates: Vec<Date>,
}

impl ObservationSchedule {
    /// Creates a schedule from arbitrary dates, sorting and deduplicating them.
    pub fn from_dates(mut dates: Vec<Date>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    /// Returns the observation dates in ascending order.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the number of observation dates.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns whether the schedule has no dates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns the first observation date.
    #[inline]
    pub fn first(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Returns the last observation date.
    #[inline]
    pub fn last(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Returns the row index of `date`, if it is an observation date.
    pub fn index_of(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Returns `true` if `date` is an observation date.
    #[inline]
    pub fn contains(&self, date: Date) -> bool {
        self.index_of(date).is_some()
    }

    /// Returns an iterator over the dates.
    pub fn iter(&self) -> impl Iterator<Item = &Date> {
        self.dates.iter()
    }
}

impl From<Vec<Date>> for ObservationSchedule {
    fn from(dates: Vec<Date>) -> Self {
        Self::from_dates(dates)
    }
}

impl From<ObservationSchedule> for Vec<Date> {
    fn from(schedule: ObservationSchedule) -> Self {
        schedule.dates
    }
}

impl<'a> IntoIterator for &'a ObservationSchedule {
    type Item = &'a Date;
    type IntoIter = std::slice::Iter<'a, Date>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

/// Builder deriving observation dates from a frequency and date range.
///
/// Dates are business month ends of the frequency's anchor months, confined
/// to `(start, end]`.
///
/// # Examples
///
/// ```
/// use autocall_models::schedules::{ObservationFrequency, ObservationScheduleBuilder};
/// use autocall_core::types::time::Date;
///
/// let schedule = ObservationScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 1).unwrap())
///     .end(Date::from_ymd(2026, 1, 1).unwrap())
///     .frequency("semiannually".parse::<ObservationFrequency>().unwrap())
///     .build()
///     .unwrap();
///
/// let months: Vec<u32> = schedule.iter().map(|d| d.month()).collect();
/// assert_eq!(months, vec![2, 8, 2, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct ObservationScheduleBuilder<C: BusinessCalendar = WeekendCalendar> {
    start_date: Option<Date>,
    end_date: Option<Date>,
    frequency: Option<ObservationFrequency>,
    calendar: C,
}

impl Default for ObservationScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationScheduleBuilder {
    /// Creates a builder using the weekend-only calendar.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            frequency: None,
            calendar: WeekendCalendar,
        }
    }
}

impl<C: BusinessCalendar> ObservationScheduleBuilder<C> {
    /// Sets the start date (exclusive).
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date (inclusive).
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the observation frequency.
    pub fn frequency(mut self, freq: ObservationFrequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Replaces the business-day calendar.
    pub fn calendar<C2: BusinessCalendar>(self, calendar: C2) -> ObservationScheduleBuilder<C2> {
        ObservationScheduleBuilder {
            start_date: self.start_date,
            end_date: self.end_date,
            frequency: self.frequency,
            calendar,
        }
    }

    /// Builds the schedule.
    ///
    /// The result may be empty when no anchor month end falls inside the
    /// range; consumers that need dates reject that themselves.
    ///
    /// # Errors
    ///
    /// - A missing start date, end date or frequency
    /// - End date not strictly after start date
    pub fn build(self) -> Result<ObservationSchedule, ScheduleError> {
        let start = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self
            .end_date
            .ok_or(ScheduleError::MissingField { field: "end" })?;
        let frequency = self
            .frequency
            .ok_or(ScheduleError::MissingField { field: "frequency" })?;

        if end <= start {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }

        let mut dates = Vec::new();
        let (mut year, mut month) = (start.year(), start.month());
        while (year, month) <= (end.year(), end.month()) {
            if frequency.is_anchor_month(month) {
                let date = self.calendar.business_month_end(year, month)?;
                if date > start && date <= end {
                    dates.push(date);
                }
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }

        let schedule = ObservationSchedule::from_dates(dates);
        debug!(
            %frequency,
            %start,
            %end,
            dates = schedule.len(),
            "observation schedule built"
        );
        if schedule.len() <= 1 {
            warn!(
                %frequency,
                %start,
                %end,
                dates = schedule.len(),
                "observation schedule has at most one date"
            );
        }

        Ok(schedule)
    }
}
