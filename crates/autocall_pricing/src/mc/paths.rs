//! Simulated price paths and the daily path simulator.

use super::shocks::CorrelatedShocks;
use crate::config::SimulationConfig;
use crate::error::{EngineError, NumericalError, ValidationError};
use autocall_core::types::time::Date;
use autocall_models::underlying::Underlying;
use rayon::prelude::*;
use std::sync::Arc;

/// Simulated prices of one underlying: calendar date x simulation.
///
/// Values are stored per simulation, `values[sim * n_times + t]`, so one
/// simulated path is a contiguous slice (see [`PricePathSet::column`]).
/// Created once by the simulator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePathSet {
    ticker: String,
    dates: Arc<[Date]>,
    n_simulations: usize,
    values: Vec<f64>,
}

impl PricePathSet {
    /// Wraps precomputed prices laid out `values[sim * dates.len() + t]`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyPaths` without dates or simulations
    /// - `ValidationError::ShapeMismatch` if `values` has the wrong length
    /// - `ValidationError::MalformedPrice` for a non-finite or non-positive
    ///   price
    ///
    /// # Examples
    ///
    /// ```
    /// use autocall_pricing::mc::PricePathSet;
    /// use autocall_core::types::time::Date;
    ///
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// let dates = Date::daily_range(start, start.add_days(2).unwrap());
    ///
    /// // Two simulations of three days each
    /// let paths = PricePathSet::new("ABC", dates, 2, vec![
    ///     100.0, 101.0, 99.0,
    ///     100.0, 98.0, 97.0,
    /// ]).unwrap();
    ///
    /// assert_eq!(paths.value(2, 1), 97.0);
    /// assert_eq!(paths.column(0), &[100.0, 101.0, 99.0]);
    /// assert_eq!(paths.get(start, 1), Some(100.0));
    /// ```
    pub fn new(
        ticker: impl Into<String>,
        dates: impl Into<Arc<[Date]>>,
        n_simulations: usize,
        values: Vec<f64>,
    ) -> Result<Self, EngineError> {
        let dates = dates.into();
        if dates.is_empty() || n_simulations == 0 {
            return Err(ValidationError::EmptyPaths.into());
        }
        let expected = dates.len() * n_simulations;
        if values.len() != expected {
            return Err(ValidationError::ShapeMismatch {
                what: "price path values",
                expected,
                got: values.len(),
            }
            .into());
        }
        let ticker = ticker.into();
        if let Some(pos) = values.iter().position(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ValidationError::MalformedPrice {
                ticker,
                step: pos % dates.len(),
                simulation: pos / dates.len(),
                value: values[pos],
            }
            .into());
        }
        Ok(Self {
            ticker,
            dates,
            n_simulations,
            values,
        })
    }

    /// Ticker of the simulated asset.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Calendar dates of the time axis, day 0 first.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of time points.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.dates.len()
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Price at time index `t` in simulation `sim`.
    #[inline]
    pub fn value(&self, t: usize, sim: usize) -> f64 {
        self.values[sim * self.dates.len() + t]
    }

    /// Price on `date` in simulation `sim`, `None` off the time axis.
    pub fn get(&self, date: Date, sim: usize) -> Option<f64> {
        if sim >= self.n_simulations {
            return None;
        }
        let t = self.dates.binary_search(&date).ok()?;
        Some(self.value(t, sim))
    }

    /// Whole path of simulation `sim`.
    #[inline]
    pub fn column(&self, sim: usize) -> &[f64] {
        let n = self.dates.len();
        &self.values[sim * n..(sim + 1) * n]
    }

    /// Prices of every simulation at time index `t`.
    pub fn row(&self, t: usize) -> Vec<f64> {
        self.values
            .chunks_exact(self.dates.len())
            .map(|path| path[t])
            .collect()
    }

    /// Raw simulation-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Evolves one underlying day by day under local volatility.
///
/// ```text
/// S(k) = S(k-1) * exp((r(t) - q - vol(t, S(k-1))^2 / 2) * dt + vol(t, S(k-1)) * dW(k))
/// ```
///
/// with `t = k / basis` and `dt = 1 / basis`. Volatility and rate are looked
/// up again at every step.
#[derive(Debug, Clone, Copy)]
pub struct PathSimulator<'a> {
    config: &'a SimulationConfig,
    dates: &'a Arc<[Date]>,
}

impl<'a> PathSimulator<'a> {
    /// Creates a simulator over the time axis `dates` of `config`.
    pub fn new(config: &'a SimulationConfig, dates: &'a Arc<[Date]>) -> Self {
        Self { config, dates }
    }

    /// Simulates `underlying`, reading its shocks from column `asset` of
    /// `shocks`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::ShapeMismatch` if the dates or the shocks do not
    ///   match the configuration
    /// - `NumericalError::MarketData` for a failing volatility or rate lookup
    /// - `NumericalError::InvalidPrice` for a non-finite or non-positive price
    pub fn simulate(
        &self,
        underlying: &Underlying,
        asset: usize,
        shocks: &CorrelatedShocks,
    ) -> Result<PricePathSet, EngineError> {
        let n_times = self.dates.len();
        check_shape("simulated dates", self.config.n_times(), n_times)?;
        let n_steps = n_times - 1;
        let n_simulations = self.config.n_simulations();

        check_shape("shock steps", n_steps, shocks.n_steps())?;
        check_shape("shock simulations", n_simulations, shocks.n_simulations())?;
        if asset >= shocks.n_assets() {
            return Err(ValidationError::ShapeMismatch {
                what: "shock assets",
                expected: asset + 1,
                got: shocks.n_assets(),
            }
            .into());
        }

        let spot = underlying.spot();
        let q = underlying.dividend_yield();
        let dt = self.config.dt();
        let n_assets = shocks.n_assets();

        // Rates depend on time only
        let rates = (1..n_times)
            .map(|step| underlying.rate(self.config.time_at(step)))
            .collect::<Result<Vec<f64>, _>>()
            .map_err(NumericalError::from)?;

        let mut values = vec![0.0; n_simulations * n_times];
        values
            .par_chunks_mut(n_times)
            .enumerate()
            .try_for_each(|(sim, path)| -> Result<(), NumericalError> {
                let sim_shocks = shocks.simulation(sim);
                path[0] = spot;
                for step in 1..n_times {
                    let t = self.config.time_at(step);
                    let prev = path[step - 1];
                    let vol = underlying.volatility(t, prev)?;
                    let dw = sim_shocks[(step - 1) * n_assets + asset];
                    let drift = (rates[step - 1] - q - 0.5 * vol * vol) * dt;
                    let next = prev * (drift + vol * dw).exp();

                    if !next.is_finite() || next <= 0.0 {
                        return Err(NumericalError::InvalidPrice {
                            ticker: underlying.ticker().to_string(),
                            step,
                            simulation: sim,
                            value: next,
                        });
                    }
                    path[step] = next;
                }
                Ok(())
            })?;

        PricePathSet::new(
            underlying.ticker(),
            Arc::clone(self.dates),
            n_simulations,
            values,
        )
    }
}

fn check_shape(what: &'static str, expected: usize, got: usize) -> Result<(), ValidationError> {
    if expected != got {
        return Err(ValidationError::ShapeMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use autocall_core::types::time::DayCountConvention;

    fn config(days: i64, n_sims: usize) -> SimulationConfig {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        SimulationConfig::builder()
            .start_date(start)
            .end_date(start.add_days(days).unwrap())
            .n_simulations(n_sims)
            .day_count(DayCountConvention::ActualActual360)
            .seed(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_zero_shocks_follow_drift() {
        let config = config(10, 2);
        let dates: Arc<[Date]> = config.dates().into();
        let asset = Underlying::flat("A", 100.0, 0.01, 0.2, 0.05).unwrap();
        let shocks = CorrelatedShocks::from_raw(10, 2, 1, vec![0.0; 20]).unwrap();

        let paths = PathSimulator::new(&config, &dates)
            .simulate(&asset, 0, &shocks)
            .unwrap();

        let dt: f64 = 1.0 / 360.0;
        let growth = ((0.05 - 0.01 - 0.5 * 0.04) * dt).exp();
        for sim in 0..2 {
            assert_eq!(paths.value(0, sim), 100.0);
            assert_relative_eq!(
                paths.value(10, sim),
                100.0 * growth.powi(10),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_single_step_with_shock() {
        let config = config(1, 1);
        let dates: Arc<[Date]> = config.dates().into();
        let asset = Underlying::flat("A", 50.0, 0.0, 0.3, 0.0).unwrap();
        let shocks = CorrelatedShocks::from_raw(1, 1, 1, vec![0.1]).unwrap();

        let paths = PathSimulator::new(&config, &dates)
            .simulate(&asset, 0, &shocks)
            .unwrap();

        let expected = 50.0 * ((-0.5 * 0.09) / 360.0 + 0.3 * 0.1_f64).exp();
        assert_relative_eq!(paths.value(1, 0), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_vol_looked_up_at_previous_spot() {
        let config = config(2, 1);
        let dates: Arc<[Date]> = config.dates().into();
        // Below 100 the nearest quote is 0.1, above it 0.5
        let asset = Underlying::builder("A")
            .spot(100.0)
            .vol_rows(&[(0.0, 90.0, 0.1), (0.0, 110.0, 0.5)])
            .rate_rows(&[(0.0, 0.0), (1.0, 0.0)])
            .build()
            .unwrap();
        let shocks = CorrelatedShocks::from_raw(2, 1, 1, vec![0.2, 0.0]).unwrap();

        let paths = PathSimulator::new(&config, &dates)
            .simulate(&asset, 0, &shocks)
            .unwrap();

        // Spot 100 is equidistant: the first quote (0.1) wins
        let dt: f64 = 1.0 / 360.0;
        let s1 = 100.0 * ((-0.5 * 0.01) * dt + 0.1 * 0.2_f64).exp();
        let s2 = s1 * ((-0.5 * 0.25) * dt).exp();
        assert_relative_eq!(paths.value(1, 0), s1, max_relative = 1e-14);
        assert_relative_eq!(paths.value(2, 0), s2, max_relative = 1e-14);
    }

    #[test]
    fn test_exploding_path_rejected() {
        let config = config(1, 1);
        let dates: Arc<[Date]> = config.dates().into();
        let asset = Underlying::flat("A", 100.0, 0.0, 0.2, 0.0).unwrap();
        let shocks = CorrelatedShocks::from_raw(1, 1, 1, vec![1.0e6]).unwrap();

        let result = PathSimulator::new(&config, &dates).simulate(&asset, 0, &shocks);
        assert!(matches!(
            result,
            Err(EngineError::Numerical(NumericalError::InvalidPrice { step: 1, .. }))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let config = config(5, 2);
        let dates: Arc<[Date]> = config.dates().into();
        let asset = Underlying::flat("A", 100.0, 0.0, 0.2, 0.0).unwrap();
        let shocks = CorrelatedShocks::from_raw(4, 2, 1, vec![0.0; 8]).unwrap();

        let result = PathSimulator::new(&config, &dates).simulate(&asset, 0, &shocks);
        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_path_set_accessors() {
        let start = Date::from_ymd(2024, 3, 1).unwrap();
        let dates = Date::daily_range(start, start.add_days(1).unwrap());
        let paths = PricePathSet::new("X", dates, 3, vec![1.0, 2.0, 1.0, 3.0, 1.0, 4.0]).unwrap();

        assert_eq!(paths.ticker(), "X");
        assert_eq!(paths.n_times(), 2);
        assert_eq!(paths.row(1), vec![2.0, 3.0, 4.0]);
        assert_eq!(paths.get(start.add_days(1).unwrap(), 2), Some(4.0));
        assert_eq!(paths.get(start.add_days(2).unwrap(), 0), None);
        assert_eq!(paths.get(start, 3), None);
    }

    #[test]
    fn test_path_set_validation() {
        let start = Date::from_ymd(2024, 3, 1).unwrap();
        assert!(matches!(
            PricePathSet::new("X", vec![start], 0, vec![]),
            Err(EngineError::Validation(ValidationError::EmptyPaths))
        ));
        assert!(matches!(
            PricePathSet::new("X", vec![start], 2, vec![1.0]),
            Err(EngineError::Validation(ValidationError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_path_set_rejects_malformed_prices() {
        let start = Date::from_ymd(2024, 3, 1).unwrap();
        let dates = Date::daily_range(start, start.add_days(2).unwrap());

        // Zero day-0 price would make every ratio infinite
        assert!(matches!(
            PricePathSet::new("X", dates.clone(), 1, vec![0.0, 75.0, 90.0]),
            Err(EngineError::Validation(ValidationError::MalformedPrice {
                step: 0,
                simulation: 0,
                ..
            }))
        ));
        assert!(matches!(
            PricePathSet::new("X", dates.clone(), 2, vec![100.0, 90.0, 80.0, 100.0, f64::NAN, 95.0]),
            Err(EngineError::Validation(ValidationError::MalformedPrice {
                step: 1,
                simulation: 1,
                ..
            }))
        ));
        assert!(matches!(
            PricePathSet::new("X", dates, 1, vec![100.0, 101.0, -5.0]),
            Err(EngineError::Validation(ValidationError::MalformedPrice { step: 2, .. }))
        ));
    }

    #[test]
    fn test_dates_must_match_config() {
        let config = config(5, 1);
        let asset = Underlying::flat("A", 100.0, 0.0, 0.2, 0.0).unwrap();
        let shocks = CorrelatedShocks::from_raw(5, 1, 1, vec![0.0; 5]).unwrap();

        let empty: Arc<[Date]> = Vec::new().into();
        assert!(matches!(
            PathSimulator::new(&config, &empty).simulate(&asset, 0, &shocks),
            Err(EngineError::Validation(ValidationError::ShapeMismatch {
                what: "simulated dates",
                ..
            }))
        ));

        let short: Arc<[Date]> = config.dates()[..3].to_vec().into();
        assert!(PathSimulator::new(&config, &short)
            .simulate(&asset, 0, &shocks)
            .is_err());
    }
}
