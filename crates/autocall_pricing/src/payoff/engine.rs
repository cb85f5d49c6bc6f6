//! Per-path coupon, autocall and capital-protection evaluation.

use super::matrix::ObservationMatrix;
use super::state::PathState;
use super::strategy::EffectivePath;
use crate::error::{EngineError, ValidationError};
use autocall_core::types::time::Date;
use autocall_models::instruments::AutocallTerms;
use rayon::prelude::*;

/// Everything the payoff pass produces, indexed by (observation date,
/// simulation).
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrices {
    /// Effective ratio to day 0 on each observation date.
    pub ratios: ObservationMatrix<f64>,
    /// Whether the path could still pay on each date.
    pub eligibility: ObservationMatrix<bool>,
    /// Undiscounted cashflows.
    pub payoffs: ObservationMatrix<f64>,
    /// Cashflows times the date's discount factor.
    pub discounted: ObservationMatrix<f64>,
}

/// Evaluates the note's cashflows on every simulated path.
///
/// `observation_indices[d]` is the time index of `dates[d]` on `path`, and
/// `discount_factors[d]` the factor applied to cashflows paid on that date.
///
/// On each date a still-eligible path pays the coupon if its ratio is at or
/// above the coupon barrier, and redeems the nominal if it is at or above
/// the autocall barrier. An eligible path always redeems on the last date.
/// Afterwards, a path that survived to maturity with its lowest observed
/// ratio at or below the put barrier and a final ratio below 1 loses every
/// payment and receives `nominal * final_ratio` at maturity instead.
///
/// # Errors
///
/// - `ValidationError::EmptySchedule` without observation dates
/// - `ValidationError::ShapeMismatch` if the three per-date inputs differ in
///   length or an index lies beyond the path
pub fn evaluate_payoffs(
    path: &EffectivePath<'_>,
    observation_indices: &[usize],
    dates: &[Date],
    discount_factors: &[f64],
    terms: &AutocallTerms,
) -> Result<PayoffMatrices, EngineError> {
    let n_dates = dates.len();
    if n_dates == 0 {
        return Err(ValidationError::EmptySchedule.into());
    }
    for (what, got) in [
        ("observation indices", observation_indices.len()),
        ("discount factors", discount_factors.len()),
    ] {
        if got != n_dates {
            return Err(ValidationError::ShapeMismatch {
                what,
                expected: n_dates,
                got,
            }
            .into());
        }
    }
    if let Some(&idx) = observation_indices.iter().find(|&&i| i >= path.n_times()) {
        return Err(ValidationError::ShapeMismatch {
            what: "observation time index",
            expected: path.n_times(),
            got: idx,
        }
        .into());
    }

    let n_sims = path.n_simulations();
    let mut ratios = ObservationMatrix::filled(dates, n_sims, 0.0);
    let mut eligibility = ObservationMatrix::filled(dates, n_sims, false);
    let mut payoffs = ObservationMatrix::filled(dates, n_sims, 0.0);
    let mut discounted = ObservationMatrix::filled(dates, n_sims, 0.0);

    ratios
        .as_mut_slice()
        .par_chunks_mut(n_dates)
        .zip(eligibility.as_mut_slice().par_chunks_mut(n_dates))
        .zip(payoffs.as_mut_slice().par_chunks_mut(n_dates))
        .zip(discounted.as_mut_slice().par_chunks_mut(n_dates))
        .enumerate()
        .for_each(|(sim, (((ratio, eligible), payoff), discounted))| {
            let column = path.column(sim);
            for (r, &idx) in ratio.iter_mut().zip(observation_indices) {
                *r = column[idx] / column[0];
            }
            evaluate_path(
                ratio,
                discount_factors,
                terms,
                PathOutput {
                    eligible,
                    payoff,
                    discounted,
                },
            );
        });

    Ok(PayoffMatrices {
        ratios,
        eligibility,
        payoffs,
        discounted,
    })
}

struct PathOutput<'o> {
    eligible: &'o mut [bool],
    payoff: &'o mut [f64],
    discounted: &'o mut [f64],
}

fn evaluate_path(
    ratios: &[f64],
    discount_factors: &[f64],
    terms: &AutocallTerms,
    out: PathOutput<'_>,
) {
    let last = ratios.len() - 1;
    let nominal = terms.nominal();
    let mut state = PathState::new();

    for (d, &ratio) in ratios.iter().enumerate() {
        let eligible = state.observe(ratio, terms.autocall_barrier());
        let coupon_hit = ratio >= terms.coupon_barrier();
        let autocall_hit = ratio >= terms.autocall_barrier() || (d == last && eligible);

        let mut payment = 0.0;
        if eligible {
            if coupon_hit {
                payment += terms.coupon_amount();
            }
            if autocall_hit {
                payment += nominal;
            }
        }

        out.eligible[d] = eligible;
        out.payoff[d] = payment;
        out.discounted[d] = payment * discount_factors[d];
    }

    let final_ratio = ratios[last];
    if out.eligible[last] && state.running_min() <= terms.put_barrier() && final_ratio < 1.0 {
        out.payoff.fill(0.0);
        out.discounted.fill(0.0);
        out.payoff[last] = nominal * final_ratio;
        out.discounted[last] = out.payoff[last] * discount_factors[last];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::PricePathSet;
    use approx::assert_relative_eq;
    use autocall_models::instruments::BasketStrategy;

    fn terms() -> AutocallTerms {
        AutocallTerms::builder()
            .nominal(1000.0)
            .coupon_rate(0.05)
            .coupon_barrier(1.1)
            .autocall_barrier(1.3)
            .put_barrier(0.8)
            .build()
            .unwrap()
    }

    fn start() -> Date {
        Date::from_ymd(2024, 1, 1).unwrap()
    }

    /// Path sets whose time index i is day i; observations on days 1..=n.
    fn paths(columns: &[&[f64]]) -> Vec<PricePathSet> {
        let n_times = columns[0].len();
        let dates = Date::daily_range(start(), start().add_days(n_times as i64 - 1).unwrap());
        let values = columns.iter().flat_map(|c| c.iter().copied()).collect();
        vec![PricePathSet::new("X", dates, columns.len(), values).unwrap()]
    }

    fn run(columns: &[&[f64]], dfs: &[f64]) -> PayoffMatrices {
        let sets = paths(columns);
        let path = EffectivePath::select(BasketStrategy::Mono, &sets).unwrap();
        let indices: Vec<usize> = (1..=dfs.len()).collect();
        let dates: Vec<Date> = indices
            .iter()
            .map(|&i| start().add_days(i as i64).unwrap())
            .collect();
        evaluate_payoffs(&path, &indices, &dates, dfs, &terms()).unwrap()
    }

    #[test]
    fn test_put_breach_pays_final_ratio() {
        let out = run(&[&[100.0, 75.0, 90.0]], &[0.99, 0.98]);

        assert_eq!(out.payoffs.simulation(0), &[0.0, 900.0]);
        assert_relative_eq!(out.discounted.get(1, 0), 900.0 * 0.98, epsilon = 1e-12);
        assert_eq!(out.discounted.get(0, 0), 0.0);
        assert_eq!(out.eligibility.simulation(0), &[true, true]);
    }

    #[test]
    fn test_put_breach_zeroes_earlier_coupons() {
        // Coupon on date 1, breach on date 2, recovery to 0.9 at maturity
        let out = run(&[&[100.0, 115.0, 75.0, 90.0]], &[0.99, 0.98, 0.97]);

        assert_eq!(out.payoffs.simulation(0), &[0.0, 0.0, 900.0]);
        assert_eq!(out.discounted.simulation(0)[..2], [0.0, 0.0]);
        assert_relative_eq!(out.discounted.get(2, 0), 900.0 * 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_put_breach_with_final_recovery_above_par() {
        let out = run(&[&[100.0, 75.0, 105.0]], &[1.0, 1.0]);
        assert_eq!(out.payoffs.simulation(0), &[0.0, 1000.0]);
    }

    #[test]
    fn test_forced_redemption_at_maturity() {
        let out = run(
            &[&[100.0, 95.0, 105.0], &[100.0, 95.0, 112.0]],
            &[1.0, 0.95],
        );

        // Below the coupon barrier: nominal only
        assert_eq!(out.payoffs.simulation(0), &[0.0, 1000.0]);
        // At or above the coupon barrier: nominal plus coupon
        assert_relative_eq!(out.payoffs.get(1, 1), 1050.0, epsilon = 1e-12);
        assert_relative_eq!(out.discounted.get(1, 1), 1050.0 * 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_early_autocall_terminates() {
        let out = run(&[&[100.0, 131.0, 150.0, 60.0]], &[1.0, 1.0, 1.0]);

        assert_relative_eq!(out.payoffs.get(0, 0), 1050.0, epsilon = 1e-12);
        assert_eq!(out.payoffs.simulation(0)[1..], [0.0, 0.0]);
        assert_eq!(out.eligibility.simulation(0), &[true, false, false]);
        // The put does not apply to a redeemed note
        assert_eq!(out.payoffs.get(2, 0), 0.0);
    }

    #[test]
    fn test_coupon_without_autocall() {
        let out = run(&[&[100.0, 120.0, 85.0, 100.0]], &[1.0, 1.0, 1.0]);
        assert_relative_eq!(out.payoffs.get(0, 0), 50.0, epsilon = 1e-12);
        assert_eq!(out.payoffs.get(1, 0), 0.0);
        assert_eq!(out.payoffs.get(2, 0), 1000.0);
    }

    #[test]
    fn test_ratios_recorded() {
        let out = run(&[&[200.0, 220.0, 180.0]], &[1.0, 1.0]);
        assert_eq!(out.ratios.simulation(0), &[1.1, 0.9]);
    }

    #[test]
    fn test_input_validation() {
        let sets = paths(&[&[100.0, 101.0]]);
        let path = EffectivePath::select(BasketStrategy::Mono, &sets).unwrap();
        let date = start().add_days(1).unwrap();

        assert!(matches!(
            evaluate_payoffs(&path, &[], &[], &[], &terms()),
            Err(EngineError::Validation(ValidationError::EmptySchedule))
        ));
        assert!(matches!(
            evaluate_payoffs(&path, &[1], &[date], &[1.0, 1.0], &terms()),
            Err(EngineError::Validation(ValidationError::ShapeMismatch { .. }))
        ));
        assert!(matches!(
            evaluate_payoffs(&path, &[2], &[date], &[1.0], &terms()),
            Err(EngineError::Validation(ValidationError::ShapeMismatch { .. }))
        ));
    }
}
