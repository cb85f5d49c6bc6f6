//! Multi-asset Monte Carlo simulation.

use super::paths::{PathSimulator, PricePathSet};
use super::shocks::CorrelatedShocks;
use crate::config::SimulationConfig;
use crate::error::{ConfigurationError, EngineError, ValidationError};
use autocall_core::types::time::Date;
use autocall_models::correlation::{CorrelationMatrix, CorrelationSource};
use autocall_models::schedules::ObservationSchedule;
use autocall_models::underlying::Underlying;
use std::sync::Arc;
use tracing::{debug, info};

/// Completed simulation: one [`PricePathSet`] per underlying plus the
/// observation schedule the payoff engine evaluates on.
///
/// Borrows the underlyings; owns everything it computed.
///
/// # Examples
///
/// ```
/// use autocall_pricing::config::SimulationConfig;
/// use autocall_pricing::mc::MonteCarloSimulation;
/// use autocall_models::correlation::CorrelationMatrix;
/// use autocall_models::underlying::Underlying;
/// use autocall_core::types::time::Date;
///
/// let assets = vec![
///     Underlying::flat("AAA", 100.0, 0.0, 0.2, 0.02).unwrap(),
///     Underlying::flat("BBB", 50.0, 0.01, 0.3, 0.02).unwrap(),
/// ];
/// let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
/// let config = SimulationConfig::builder()
///     .start_date(Date::from_ymd(2024, 1, 2).unwrap())
///     .end_date(Date::from_ymd(2024, 7, 2).unwrap())
///     .n_simulations(100)
///     .seed(24)
///     .build()
///     .unwrap();
///
/// let sim = MonteCarloSimulation::run(&assets, &corr, &config).unwrap();
/// assert_eq!(sim.paths().len(), 2);
/// assert_eq!(sim.paths()[1].value(0, 0), 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloSimulation<'a> {
    underlyings: &'a [Underlying],
    config: SimulationConfig,
    dates: Arc<[Date]>,
    schedule: ObservationSchedule,
    paths: Vec<PricePathSet>,
}

impl<'a> MonteCarloSimulation<'a> {
    /// Simulates every underlying with shocks drawn from the configured
    /// generator.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyPaths` without underlyings
    /// - `ValidationError::ShapeMismatch` if the matrix does not match the
    ///   number of underlyings
    /// - `ConfigurationError::Correlation` for a non positive semi-definite
    ///   matrix
    /// - Any error of [`PathSimulator::simulate`]
    pub fn run(
        underlyings: &'a [Underlying],
        correlation: &CorrelationMatrix<f64>,
        config: &SimulationConfig,
    ) -> Result<Self, EngineError> {
        check_underlyings(underlyings, correlation.dim())?;
        let mut rng = config.rng();
        let shocks = CorrelatedShocks::generate(
            correlation,
            config.n_steps(),
            config.n_simulations(),
            config.dt(),
            &mut rng,
        )?;
        Self::run_with_shocks(underlyings, &shocks, config)
    }

    /// Like [`MonteCarloSimulation::run`], taking the correlation matrix
    /// from `source` keyed by the underlyings' tickers.
    pub fn run_with_source<S: CorrelationSource + ?Sized>(
        underlyings: &'a [Underlying],
        source: &S,
        config: &SimulationConfig,
    ) -> Result<Self, EngineError> {
        let tickers: Vec<&str> = underlyings.iter().map(Underlying::ticker).collect();
        let correlation = source
            .correlation_matrix(&tickers)
            .map_err(ConfigurationError::from)?;
        Self::run(underlyings, &correlation, config)
    }

    /// Simulates every underlying from precomputed shocks.
    pub fn run_with_shocks(
        underlyings: &'a [Underlying],
        shocks: &CorrelatedShocks,
        config: &SimulationConfig,
    ) -> Result<Self, EngineError> {
        check_underlyings(underlyings, shocks.n_assets())?;
        config.validate()?;
        let schedule = config.observation_schedule()?;

        info!(
            n_assets = underlyings.len(),
            n_simulations = config.n_simulations(),
            n_steps = config.n_steps(),
            seed = ?config.seed(),
            "starting path simulation"
        );

        let dates: Arc<[Date]> = config.dates().into();
        let simulator = PathSimulator::new(config, &dates);
        let paths = underlyings
            .iter()
            .enumerate()
            .map(|(asset, underlying)| {
                let set = simulator.simulate(underlying, asset, shocks)?;
                debug!(ticker = underlying.ticker(), "asset simulated");
                Ok(set)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        info!(
            n_assets = paths.len(),
            observation_dates = schedule.len(),
            "path simulation finished"
        );

        Ok(Self {
            underlyings,
            config: config.clone(),
            dates,
            schedule,
            paths,
        })
    }

    /// Assembles a simulation from already simulated paths.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyPaths` without paths
    /// - `ValidationError::ShapeMismatch` if the number of path sets differs
    ///   from the number of underlyings, or a path set's time axis or
    ///   simulation count differs from `config`
    pub fn from_paths(
        underlyings: &'a [Underlying],
        paths: Vec<PricePathSet>,
        config: &SimulationConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if paths.is_empty() {
            return Err(ValidationError::EmptyPaths.into());
        }
        check_underlyings(underlyings, paths.len())?;

        let dates: Arc<[Date]> = config.dates().into();
        for set in &paths {
            if set.dates() != &dates[..] {
                return Err(ValidationError::ShapeMismatch {
                    what: "path time axis",
                    expected: dates.len(),
                    got: set.n_times(),
                }
                .into());
            }
            if set.n_simulations() != config.n_simulations() {
                return Err(ValidationError::ShapeMismatch {
                    what: "path simulations",
                    expected: config.n_simulations(),
                    got: set.n_simulations(),
                }
                .into());
            }
        }

        Ok(Self {
            underlyings,
            config: config.clone(),
            dates,
            schedule: config.observation_schedule()?,
            paths,
        })
    }

    /// Replaces the frequency-derived observation schedule.
    ///
    /// # Errors
    ///
    /// `ValidationError::ObservationOutOfRange` for a date outside
    /// `(start, end]`.
    pub fn with_schedule(mut self, schedule: ObservationSchedule) -> Result<Self, EngineError> {
        let (start, end) = (self.config.start_date(), self.config.end_date());
        if let Some(&date) = schedule.iter().find(|d| **d <= start || **d > end) {
            return Err(ValidationError::ObservationOutOfRange { date, start, end }.into());
        }
        self.schedule = schedule;
        Ok(self)
    }

    /// Underlyings, in path order.
    #[inline]
    pub fn underlyings(&self) -> &'a [Underlying] {
        self.underlyings
    }

    /// Configuration the paths were simulated with.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Calendar dates of the time axis.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Observation schedule.
    #[inline]
    pub fn schedule(&self) -> &ObservationSchedule {
        &self.schedule
    }

    /// One path set per underlying.
    #[inline]
    pub fn paths(&self) -> &[PricePathSet] {
        &self.paths
    }

    /// Path set of `ticker`.
    pub fn paths_for(&self, ticker: &str) -> Option<&PricePathSet> {
        self.paths.iter().find(|p| p.ticker() == ticker)
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.config.n_simulations()
    }
}

fn check_underlyings(underlyings: &[Underlying], n_assets: usize) -> Result<(), ValidationError> {
    if underlyings.is_empty() {
        return Err(ValidationError::EmptyPaths);
    }
    if underlyings.len() != n_assets {
        return Err(ValidationError::ShapeMismatch {
            what: "number of underlyings",
            expected: n_assets,
            got: underlyings.len(),
        });
    }
    Ok(())
}
