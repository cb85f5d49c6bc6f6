//! Autocallable note valued on a completed simulation.

use super::engine::{evaluate_payoffs, PayoffMatrices};
use super::matrix::ObservationMatrix;
use super::strategy::EffectivePath;
use crate::aggregate::{self, PricingSummary};
use crate::error::{ConfigurationError, EngineError, ValidationError};
use crate::mc::MonteCarloSimulation;
use autocall_core::market_data::curves::YieldCurve;
use autocall_core::types::time::Date;
use autocall_models::instruments::{AutocallTerms, BasketStrategy};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// An autocallable note over the underlyings of a [`MonteCarloSimulation`].
///
/// Payoffs are evaluated once on construction and cached together with the
/// average price. Changing the terms or the strategy re-evaluates before
/// anything is replaced, so a failed update leaves the note unchanged.
///
/// # Examples
///
/// ```
/// use autocall_pricing::config::SimulationConfig;
/// use autocall_pricing::mc::MonteCarloSimulation;
/// use autocall_pricing::payoff::Autocall;
/// use autocall_models::correlation::CorrelationMatrix;
/// use autocall_models::instruments::{AutocallTerms, BasketStrategy};
/// use autocall_models::underlying::Underlying;
/// use autocall_core::market_data::curves::FlatCurve;
/// use autocall_core::types::time::Date;
///
/// let assets = vec![Underlying::flat("AAA", 100.0, 0.0, 0.2, 0.03).unwrap()];
/// let config = SimulationConfig::builder()
///     .start_date(Date::from_ymd(2024, 1, 2).unwrap())
///     .end_date(Date::from_ymd(2025, 1, 2).unwrap())
///     .n_simulations(500)
///     .seed(7)
///     .build()
///     .unwrap();
/// let sim = MonteCarloSimulation::run(&assets, &CorrelationMatrix::identity(1), &config).unwrap();
///
/// let terms = AutocallTerms::builder()
///     .coupon_rate(0.02)
///     .coupon_barrier(1.0)
///     .autocall_barrier(1.1)
///     .put_barrier(0.7)
///     .build()
///     .unwrap();
/// let curve = FlatCurve::new(0.03);
/// let note = Autocall::new(&sim, BasketStrategy::Mono, terms, &curve).unwrap();
///
/// let n_obs = sim.schedule().len();
/// assert!(note.average_price() >= 0.0);
/// assert!(note.average_price() <= note.terms().max_price_pct(n_obs));
/// ```
pub struct Autocall<'a, C: YieldCurve<f64> + ?Sized> {
    simulation: &'a MonteCarloSimulation<'a>,
    strategy: BasketStrategy,
    terms: AutocallTerms,
    discount_curve: &'a C,
    observation_indices: Vec<usize>,
    discount_factors: Vec<f64>,
    matrices: PayoffMatrices,
    average_price: f64,
}

impl<'a, C: YieldCurve<f64> + ?Sized> Autocall<'a, C> {
    /// Values the note on `simulation`'s observation schedule.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::StrategyRequiresBasket` for a worst-of or
    ///   best-of note on fewer than two underlyings
    /// - `ConfigurationError::Instrument` for invalid terms
    /// - `ValidationError::EmptySchedule` without observation dates
    /// - `ValidationError::ObservationOutOfRange` for a date off the
    ///   simulated time axis
    /// - `NumericalError::MarketData` if the discount curve rejects a date
    pub fn new(
        simulation: &'a MonteCarloSimulation<'a>,
        strategy: BasketStrategy,
        terms: AutocallTerms,
        discount_curve: &'a C,
    ) -> Result<Self, EngineError> {
        check_strategy(strategy, simulation.paths().len())?;
        terms.validate()?;

        let schedule = simulation.schedule();
        if schedule.is_empty() {
            return Err(ValidationError::EmptySchedule.into());
        }

        let config = simulation.config();
        let observation_indices = schedule
            .iter()
            .map(|&date| {
                config
                    .time_index(date)
                    .ok_or(ValidationError::ObservationOutOfRange {
                        date,
                        start: config.start_date(),
                        end: config.end_date(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let discount_factors = schedule
            .iter()
            .map(|&date| discount_curve.discount_factor(config.year_fraction(date)))
            .collect::<Result<Vec<_>, _>>()?;

        let (matrices, average_price) = evaluate(
            simulation,
            strategy,
            &terms,
            &observation_indices,
            &discount_factors,
        )?;

        Ok(Self {
            simulation,
            strategy,
            terms,
            discount_curve,
            observation_indices,
            discount_factors,
            matrices,
            average_price,
        })
    }

    /// Replaces the contract terms and re-evaluates.
    pub fn set_terms(&mut self, terms: AutocallTerms) -> Result<(), EngineError> {
        terms.validate()?;
        let (matrices, price) = evaluate(
            self.simulation,
            self.strategy,
            &terms,
            &self.observation_indices,
            &self.discount_factors,
        )?;
        self.terms = terms;
        self.matrices = matrices;
        self.average_price = price;
        Ok(())
    }

    /// Switches the basket strategy and re-evaluates.
    pub fn set_strategy(&mut self, strategy: BasketStrategy) -> Result<(), EngineError> {
        check_strategy(strategy, self.simulation.paths().len())?;
        let (matrices, price) = evaluate(
            self.simulation,
            strategy,
            &self.terms,
            &self.observation_indices,
            &self.discount_factors,
        )?;
        self.strategy = strategy;
        self.matrices = matrices;
        self.average_price = price;
        Ok(())
    }

    /// Simulation the note is valued on.
    #[inline]
    pub fn simulation(&self) -> &'a MonteCarloSimulation<'a> {
        self.simulation
    }

    /// Basket strategy.
    #[inline]
    pub fn strategy(&self) -> BasketStrategy {
        self.strategy
    }

    /// Contract terms.
    #[inline]
    pub fn terms(&self) -> &AutocallTerms {
        &self.terms
    }

    /// Curve used for discounting.
    #[inline]
    pub fn discount_curve(&self) -> &C {
        self.discount_curve
    }

    /// Observation dates.
    #[inline]
    pub fn observation_dates(&self) -> &[Date] {
        self.simulation.schedule().dates()
    }

    /// Discount factor of each observation date.
    #[inline]
    pub fn discount_factors(&self) -> &[f64] {
        &self.discount_factors
    }

    /// Undiscounted cashflows.
    #[inline]
    pub fn payoffs(&self) -> &ObservationMatrix<f64> {
        &self.matrices.payoffs
    }

    /// Discounted cashflows.
    #[inline]
    pub fn discounted_payoffs(&self) -> &ObservationMatrix<f64> {
        &self.matrices.discounted
    }

    /// Effective ratio to day 0 on each observation date.
    #[inline]
    pub fn ratios(&self) -> &ObservationMatrix<f64> {
        &self.matrices.ratios
    }

    /// Whether each path could still pay on each observation date.
    #[inline]
    pub fn eligibility(&self) -> &ObservationMatrix<bool> {
        &self.matrices.eligibility
    }

    /// Average present value in percent of nominal.
    #[inline]
    pub fn average_price(&self) -> f64 {
        self.average_price
    }

    /// Monte Carlo standard error of [`Autocall::average_price`].
    pub fn standard_error(&self) -> f64 {
        aggregate::standard_error(&self.matrices.discounted, self.terms.nominal())
    }

    /// Raw autocall-barrier touch probability per observation date.
    pub fn autocall_probabilities(&self) -> BTreeMap<Date, f64> {
        aggregate::calculate_autocall_probabilities(
            &self.matrices.ratios,
            self.terms.autocall_barrier(),
        )
    }

    /// Termination probability per observation date.
    pub fn redemption_probabilities(&self) -> BTreeMap<Date, f64> {
        aggregate::redemption_probabilities(
            &self.matrices.eligibility,
            &self.matrices.ratios,
            self.terms.autocall_barrier(),
        )
    }

    /// Price, standard error and probability profiles in one value.
    pub fn summary(&self) -> PricingSummary {
        PricingSummary {
            price: self.average_price,
            standard_error: self.standard_error(),
            n_simulations: self.simulation.n_simulations(),
            autocall_probabilities: self.autocall_probabilities(),
            redemption_probabilities: self.redemption_probabilities(),
        }
    }
}

impl<C: YieldCurve<f64> + ?Sized> std::fmt::Debug for Autocall<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocall")
            .field("strategy", &self.strategy)
            .field("terms", &self.terms)
            .field("observation_dates", &self.observation_indices.len())
            .field("average_price", &self.average_price)
            .finish_non_exhaustive()
    }
}

fn check_strategy(strategy: BasketStrategy, n_assets: usize) -> Result<(), ConfigurationError> {
    let need = strategy.min_assets();
    if n_assets < need {
        return Err(ConfigurationError::StrategyRequiresBasket {
            strategy,
            need,
            got: n_assets,
        });
    }
    Ok(())
}

fn evaluate(
    simulation: &MonteCarloSimulation<'_>,
    strategy: BasketStrategy,
    terms: &AutocallTerms,
    observation_indices: &[usize],
    discount_factors: &[f64],
) -> Result<(PayoffMatrices, f64), EngineError> {
    let path = EffectivePath::select(strategy, simulation.paths())?;
    let matrices = evaluate_payoffs(
        &path,
        observation_indices,
        simulation.schedule().dates(),
        discount_factors,
        terms,
    )?;
    let price = aggregate::calculate_average_present_value(&matrices.discounted, terms.nominal());

    info!(
        %strategy,
        n_simulations = simulation.n_simulations(),
        observation_dates = observation_indices.len(),
        price,
        "autocall valuation finished"
    );
    debug!(max_price = terms.max_price_pct(observation_indices.len()), "price bound");

    Ok((matrices, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::mc::PricePathSet;
    use approx::assert_relative_eq;
    use autocall_core::market_data::curves::FlatCurve;
    use autocall_models::schedules::ObservationSchedule;
    use autocall_models::underlying::Underlying;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn config(n_sims: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .start_date(d(2024, 1, 1))
            .end_date(d(2024, 1, 11))
            .n_simulations(n_sims)
            .seed(1)
            .build()
            .unwrap()
    }

    fn terms() -> AutocallTerms {
        AutocallTerms::builder()
            .coupon_rate(0.05)
            .coupon_barrier(1.1)
            .autocall_barrier(1.3)
            .put_barrier(0.8)
            .build()
            .unwrap()
    }

    /// Flat path at 100 except for the given (day, level) points.
    fn path(ticker: &str, points: &[(usize, f64)]) -> PricePathSet {
        let cfg = config(1);
        let mut values = vec![100.0; cfg.n_times()];
        for &(day, level) in points {
            values[day] = level;
        }
        PricePathSet::new(ticker, cfg.dates(), 1, values).unwrap()
    }

    #[test]
    fn test_put_scenario_through_contract() {
        let assets = vec![Underlying::flat("X", 100.0, 0.0, 0.2, 0.0).unwrap()];
        let cfg = config(1);
        let sim = MonteCarloSimulation::from_paths(
            &assets,
            vec![path("X", &[(5, 75.0), (10, 90.0)])],
            &cfg,
        )
        .unwrap()
        .with_schedule(ObservationSchedule::from_dates(vec![d(2024, 1, 6), d(2024, 1, 11)]))
        .unwrap();

        let curve = FlatCurve::new(0.05);
        let note = Autocall::new(&sim, BasketStrategy::Mono, terms(), &curve).unwrap();

        let df = (-0.05_f64 * 10.0 / 360.0).exp();
        assert_eq!(note.payoffs().simulation(0), &[0.0, 900.0]);
        assert_relative_eq!(note.discount_factors()[1], df, epsilon = 1e-14);
        assert_relative_eq!(note.discounted_payoffs().get(1, 0), 900.0 * df, epsilon = 1e-10);
        assert_relative_eq!(note.average_price(), 90.0 * df, epsilon = 1e-10);
    }

    #[test]
    fn test_basket_strategy_needs_two_assets() {
        let assets = vec![Underlying::flat("X", 100.0, 0.0, 0.2, 0.0).unwrap()];
        let sim = MonteCarloSimulation::from_paths(&assets, vec![path("X", &[])], &config(1))
            .unwrap()
            .with_schedule(ObservationSchedule::from_dates(vec![d(2024, 1, 11)]))
            .unwrap();
        let curve = FlatCurve::new(0.0);

        let err =Autocall::new(&sim, BasketStrategy::WorstOf, terms(), &curve).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::StrategyRequiresBasket {
                need: 2,
                got: 1,
                ..
            })
        ));

        let mut note = Autocall::new(&sim, BasketStrategy::Mono, terms(), &curve).unwrap();
        assert!(note.set_strategy(BasketStrategy::BestOf).is_err());
        assert_eq!(note.strategy(), BasketStrategy::Mono);
    }

    #[test]
    fn test_empty_schedule_rejected() {
        // Ten days contain no quarter end
        let assets = vec![Underlying::flat("X", 100.0, 0.0, 0.2, 0.0).unwrap()];
        let sim = MonteCarloSimulation::from_paths(&assets, vec![path("X", &[])], &config(1))
            .unwrap();
        assert!(sim.schedule().is_empty());

        let curve = FlatCurve::new(0.0);
        assert!(matches!(
            Autocall::new(&sim, BasketStrategy::Mono, terms(), &curve),
            Err(EngineError::Validation(ValidationError::EmptySchedule))
        ));
    }

    #[test]
    fn test_set_terms_and_strategy_recompute() {
        let assets = vec![
            Underlying::flat("A", 100.0, 0.0, 0.2, 0.0).unwrap(),
            Underlying::flat("B", 100.0, 0.0, 0.2, 0.0).unwrap(),
        ];
        let sim = MonteCarloSimulation::from_paths(
            &assets,
            vec![path("A", &[(10, 112.0)]), path("B", &[(10, 95.0)])],
            &config(1),
        )
        .unwrap()
        .with_schedule(ObservationSchedule::from_dates(vec![d(2024, 1, 11)]))
        .unwrap();
        let curve = FlatCurve::new(0.0);

        let mut note = Autocall::new(&sim, BasketStrategy::BestOf, terms(), &curve).unwrap();
        assert_relative_eq!(note.average_price(), 105.0, epsilon = 1e-12);

        note.set_strategy(BasketStrategy::WorstOf).unwrap();
        assert_relative_eq!(note.average_price(), 100.0, epsilon = 1e-12);

        let richer = AutocallTerms::builder()
            .coupon_rate(0.05)
            .coupon_barrier(0.9)
            .autocall_barrier(1.3)
            .put_barrier(0.8)
            .build()
            .unwrap();
        note.set_terms(richer).unwrap();
        assert_relative_eq!(note.average_price(), 105.0, epsilon = 1e-12);

        let summary = note.summary();
        assert_eq!(summary.n_simulations, 1);
        assert_eq!(summary.redemption_probabilities[&d(2024, 1, 11)], 1.0);
        assert_eq!(summary.autocall_probabilities[&d(2024, 1, 11)], 0.0);
    }
}
