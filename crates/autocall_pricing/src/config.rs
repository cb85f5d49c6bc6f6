//! Monte Carlo simulation configuration.

use crate::error::{ConfigurationError, EngineError, ValidationError};
use crate::rng::PricerRng;
use autocall_core::types::time::{Date, DayCountConvention};
use autocall_models::schedules::{
    ObservationFrequency, ObservationSchedule, ObservationScheduleBuilder,
};
use tracing::warn;

/// Maximum number of simulations allowed.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// Simulation configuration.
///
/// Immutable; use [`SimulationConfig::builder`] to construct instances.
/// The time grid has one step per calendar day from `start_date` to
/// `end_date`, each step `1 / basis` years long.
///
/// # Examples
///
/// ```rust
/// use autocall_pricing::config::SimulationConfig;
/// use autocall_core::types::time::{Date, DayCountConvention};
/// use autocall_models::schedules::ObservationFrequency;
///
/// let config = SimulationConfig::builder()
///     .start_date(Date::from_ymd(2024, 1, 2).unwrap())
///     .end_date(Date::from_ymd(2025, 1, 2).unwrap())
///     .n_simulations(10_000)
///     .day_count(DayCountConvention::ActualActual360)
///     .frequency(ObservationFrequency::Quarterly)
///     .seed(24)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_steps(), 366);
/// assert_eq!(config.n_times(), 367);
/// assert_eq!(config.dt(), 1.0 / 360.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSimulationConfig"))]
pub struct SimulationConfig {
    start_date: Date,
    end_date: Date,
    n_simulations: usize,
    day_count: DayCountConvention,
    frequency: ObservationFrequency,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the simulation start date (day 0).
    #[inline]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the simulation end date.
    #[inline]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Returns the number of simulated paths per asset.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Returns the day-count convention.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the observation frequency.
    #[inline]
    pub fn frequency(&self) -> ObservationFrequency {
        self.frequency
    }

    /// Returns the seed, `None` for non-reproducible draws.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of daily steps between start and end.
    #[inline]
    pub fn n_steps(&self) -> usize {
        (self.end_date - self.start_date) as usize
    }

    /// Number of time points including day 0.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.n_steps() + 1
    }

    /// Days per year of the day-count convention.
    #[inline]
    pub fn basis(&self) -> f64 {
        self.day_count.days_per_year() as f64
    }

    /// Length of one step in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.basis()
    }

    /// Elapsed years at time index `step`.
    #[inline]
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 / self.basis()
    }

    /// Every calendar day of the simulation, day 0 first.
    pub fn dates(&self) -> Vec<Date> {
        Date::daily_range(self.start_date, self.end_date)
    }

    /// Time index of `date`, if it lies in the simulated range.
    pub fn time_index(&self, date: Date) -> Option<usize> {
        let days = date - self.start_date;
        if days < 0 || date > self.end_date {
            return None;
        }
        Some(days as usize)
    }

    /// Year fraction from the start date to `date` under the day count.
    #[inline]
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction_dates(self.start_date, date)
    }

    /// Observation dates implied by the frequency.
    pub fn observation_schedule(&self) -> Result<ObservationSchedule, EngineError> {
        Ok(ObservationScheduleBuilder::new()
            .start(self.start_date)
            .end(self.end_date)
            .frequency(self.frequency)
            .build()?)
    }

    /// Random generator for this run: seeded if a seed is set, entropy
    /// otherwise.
    pub fn rng(&self) -> PricerRng {
        PricerRng::from_optional_seed(self.seed)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::InvalidDateRange` unless end is after start
    /// - `ConfigurationError::InvalidParameter` if `n_simulations` is 0 or
    ///   above [`MAX_SIMULATIONS`]
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.end_date <= self.start_date {
            return Err(ConfigurationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            }
            .into());
        }
        if self.n_simulations == 0 || self.n_simulations > MAX_SIMULATIONS {
            return Err(ConfigurationError::InvalidParameter {
                name: "n_simulations",
                value: format!(
                    "{} outside [1, {}]",
                    self.n_simulations, MAX_SIMULATIONS
                ),
            }
            .into());
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Start date, end date and simulation count are required. The day count
/// defaults to ACT/360 and the frequency to quarterly.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    n_simulations: Option<usize>,
    day_count: DayCountConvention,
    frequency: ObservationFrequency,
    seed: Option<u64>,
    require_seed: bool,
}

impl SimulationConfigBuilder {
    /// Sets the start date (day 0).
    #[inline]
    pub fn start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date.
    #[inline]
    pub fn end_date(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the number of simulations in [1, 10_000_000].
    #[inline]
    pub fn n_simulations(mut self, n: usize) -> Self {
        self.n_simulations = Some(n);
        self
    }

    /// Sets the day-count convention (360 or 365 basis).
    #[inline]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the observation frequency.
    #[inline]
    pub fn frequency(mut self, frequency: ObservationFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects seedless configurations at build time.
    #[inline]
    pub fn require_seed(mut self, required: bool) -> Self {
        self.require_seed = required;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::InvalidParameter` for a missing field or an
    ///   out-of-range simulation count
    /// - `ConfigurationError::InvalidDateRange` unless end is after start
    /// - `ValidationError::MissingSeed` if a seed is required but absent
    pub fn build(self) -> Result<SimulationConfig, EngineError> {
        let missing = |name: &'static str| ConfigurationError::InvalidParameter {
            name,
            value: "must be specified".to_string(),
        };

        let start_date = self.start_date.ok_or_else(|| missing("start_date"))?;
        let end_date = self.end_date.ok_or_else(|| missing("end_date"))?;
        let n_simulations = self.n_simulations.ok_or_else(|| missing("n_simulations"))?;

        if self.require_seed && self.seed.is_none() {
            return Err(ValidationError::MissingSeed.into());
        }

        let config = SimulationConfig {
            start_date,
            end_date,
            n_simulations,
            day_count: self.day_count,
            frequency: self.frequency,
            seed: self.seed,
        };

        config.validate()?;
        if config.seed.is_none() {
            warn!("simulation configured without a seed; draws are not reproducible");
        }
        Ok(config)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSimulationConfig {
    start_date: Date,
    end_date: Date,
    n_simulations: usize,
    #[serde(default)]
    day_count: DayCountConvention,
    #[serde(default)]
    frequency: ObservationFrequency,
    #[serde(default)]
    seed: Option<u64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSimulationConfig> for SimulationConfig {
    type Error = EngineError;

    fn try_from(raw: RawSimulationConfig) -> Result<Self, Self::Error> {
        SimulationConfig::builder()
            .start_date(raw.start_date)
            .end_date(raw.end_date)
            .n_simulations(raw.n_simulations)
            .day_count(raw.day_count)
            .frequency(raw.frequency)
            .optional_seed(raw.seed)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn base() -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .start_date(d(2024, 1, 1))
            .end_date(d(2024, 12, 31))
            .n_simulations(1_000)
    }

    #[test]
    fn test_builder_defaults() {
        let config = base().build().unwrap();
        assert_eq!(config.day_count(), DayCountConvention::ActualActual360);
        assert_eq!(config.frequency(), ObservationFrequency::Quarterly);
        assert_eq!(config.seed(), None);
        assert_eq!(config.n_steps(), 365);
        assert_eq!(config.dates().len(), config.n_times());
    }

    #[test]
    fn test_time_grid() {
        let config = base()
            .day_count(DayCountConvention::ActualActual365)
            .build()
            .unwrap();
        assert_eq!(config.dt(), 1.0 / 365.0);
        assert_eq!(config.time_at(0), 0.0);
        assert_eq!(config.time_at(365), 1.0);
        assert_eq!(config.time_index(d(2024, 1, 1)), Some(0));
        assert_eq!(config.time_index(d(2024, 12, 31)), Some(365));
        assert_eq!(config.time_index(d(2025, 1, 1)), None);
        assert_eq!(config.time_index(d(2023, 12, 31)), None);
        assert_eq!(config.year_fraction(d(2024, 1, 1)), 0.0);
    }

    #[test]
    fn test_invalid_date_range() {
        let result = base().end_date(d(2024, 1, 1)).build();
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigurationError::InvalidDateRange { .. }))
        ));
    }

    #[test]
    fn test_invalid_simulation_count() {
        let result = base().n_simulations(0).build();
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigurationError::InvalidParameter {
                name: "n_simulations",
                ..
            }))
        ));
        let result = base().n_simulations(MAX_SIMULATIONS + 1).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields() {
        let result = SimulationConfig::builder().n_simulations(10).build();
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigurationError::InvalidParameter {
                name: "start_date",
                ..
            }))
        ));
    }

    #[test]
    fn test_required_seed() {
        let result = base().require_seed(true).build();
        assert_eq!(result, Err(EngineError::Validation(ValidationError::MissingSeed)));
        assert!(base().require_seed(true).seed(5).build().is_ok());
    }

    #[test]
    fn test_rng_follows_seed() {
        let config = base().seed(24).build().unwrap();
        let mut a = config.rng();
        let mut b = config.rng();
        assert_eq!(a.seed(), Some(24));
        assert_eq!(a.gen_normal(), b.gen_normal());
        assert_eq!(base().build().unwrap().rng().seed(), None);
    }

    #[test]
    fn test_observation_schedule() {
        let schedule = base().build().unwrap().observation_schedule().unwrap();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.last(), Some(d(2024, 12, 31)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_runs_validation() {
        let json = r#"{
            "start_date": "2024-01-01",
            "end_date": "2025-01-01",
            "n_simulations": 500,
            "day_count": "ACT/365",
            "frequency": "monthly",
            "seed": 24
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.n_simulations(), 500);
        assert_eq!(config.frequency(), ObservationFrequency::Monthly);
        assert_eq!(config.seed(), Some(24));

        let back: SimulationConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(back, config);

        let bad = r#"{"start_date": "2025-01-01", "end_date": "2024-01-01", "n_simulations": 5}"#;
        assert!(serde_json::from_str::<SimulationConfig>(bad).is_err());
    }
}
