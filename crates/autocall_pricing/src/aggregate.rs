//! Reductions of the payoff matrices to prices and probability profiles.
//!
//! Every reduction is a sequential pass over simulations, so the same
//! matrices always give bit-identical results.

use crate::payoff::ObservationMatrix;
use autocall_core::types::time::Date;
use std::collections::BTreeMap;

/// Average present value of the note in percent of `nominal`.
///
/// Each simulation's discounted payments are summed across observation
/// dates; the sums are averaged over simulations. Returns 0 for a matrix
/// without simulations.
///
/// # Examples
///
/// ```
/// use autocall_pricing::aggregate::calculate_average_present_value;
/// use autocall_pricing::payoff::ObservationMatrix;
/// use autocall_core::types::time::Date;
///
/// let dates = [Date::from_ymd(2024, 6, 28).unwrap()];
/// let discounted = ObservationMatrix::filled(&dates, 4, 980.0);
/// assert!((calculate_average_present_value(&discounted, 1000.0) - 98.0).abs() < 1e-12);
/// ```
pub fn calculate_average_present_value(discounted: &ObservationMatrix<f64>, nominal: f64) -> f64 {
    let n = discounted.n_simulations();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = discounted
        .simulations()
        .take(n)
        .map(|sim| sim.iter().sum::<f64>())
        .sum();
    total / n as f64 / nominal * 100.0
}

/// Monte Carlo standard error of [`calculate_average_present_value`], in
/// percent of `nominal`.
///
/// Uses the unbiased sample variance of the per-simulation discounted sums.
/// Zero with fewer than two simulations.
pub fn standard_error(discounted: &ObservationMatrix<f64>, nominal: f64) -> f64 {
    let n = discounted.n_simulations();
    if n < 2 {
        return 0.0;
    }
    let values: Vec<f64> = discounted
        .simulations()
        .take(n)
        .map(|sim| sim.iter().sum::<f64>() / nominal * 100.0)
        .collect();
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (variance / n as f64).sqrt()
}

/// Fraction of simulations at or above `autocall_barrier` on each
/// observation date.
///
/// This is the raw barrier-touch frequency: paths that redeemed on an
/// earlier date still count. The key set is exactly the matrix's dates.
pub fn calculate_autocall_probabilities(
    ratios: &ObservationMatrix<f64>,
    autocall_barrier: f64,
) -> BTreeMap<Date, f64> {
    frequencies(ratios.dates(), ratios.n_simulations(), |d, sim| {
        ratios.get(d, sim) >= autocall_barrier
    })
}

/// Fraction of simulations whose note terminates on each observation date.
///
/// A path terminates on the first date it is eligible and at or above the
/// autocall barrier, or at maturity if it never was. The probabilities sum
/// to 1 across the schedule.
pub fn redemption_probabilities(
    eligibility: &ObservationMatrix<bool>,
    ratios: &ObservationMatrix<f64>,
    autocall_barrier: f64,
) -> BTreeMap<Date, f64> {
    let last = eligibility.n_dates().saturating_sub(1);
    frequencies(eligibility.dates(), eligibility.n_simulations(), |d, sim| {
        eligibility.get(d, sim) && (d == last || ratios.get(d, sim) >= autocall_barrier)
    })
}

fn frequencies(
    dates: &[Date],
    n_simulations: usize,
    hit: impl Fn(usize, usize) -> bool,
) -> BTreeMap<Date, f64> {
    dates
        .iter()
        .enumerate()
        .map(|(d, &date)| {
            let p = if n_simulations == 0 {
                0.0
            } else {
                let count = (0..n_simulations).filter(|&sim| hit(d, sim)).count();
                count as f64 / n_simulations as f64
            };
            (date, p)
        })
        .collect()
}

/// Headline results of one valuation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingSummary {
    /// Average present value, percent of nominal.
    pub price: f64,
    /// Monte Carlo standard error of `price`.
    pub standard_error: f64,
    /// Number of simulated paths.
    pub n_simulations: usize,
    /// Raw autocall-barrier touch probability per observation date.
    pub autocall_probabilities: BTreeMap<Date, f64>,
    /// Termination probability per observation date.
    pub redemption_probabilities: BTreeMap<Date, f64>,
}

impl PricingSummary {
    /// Probability that the note redeems before maturity.
    pub fn early_redemption_probability(&self) -> f64 {
        let n = self.redemption_probabilities.len();
        self.redemption_probabilities
            .values()
            .take(n.saturating_sub(1))
            .sum()
    }

    /// Expected life of the note: the termination-weighted mean of the
    /// year fractions `year_fraction(date)`.
    pub fn expected_life(&self, year_fraction: impl Fn(Date) -> f64) -> f64 {
        self.redemption_probabilities
            .iter()
            .map(|(&date, p)| p * year_fraction(date))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dates() -> Vec<Date> {
        vec![
            Date::from_ymd(2024, 3, 29).unwrap(),
            Date::from_ymd(2024, 6, 28).unwrap(),
            Date::from_ymd(2024, 9, 30).unwrap(),
        ]
    }

    fn matrix<T: Copy>(values: &[T], n_sims: usize, fill: T) -> ObservationMatrix<T> {
        let mut m = ObservationMatrix::filled(&dates(), n_sims, fill);
        m.as_mut_slice().copy_from_slice(values);
        m
    }

    #[test]
    fn test_average_present_value() {
        // sim 0 sums to 1000, sim 1 to 900
        let discounted = matrix(&[50.0, 0.0, 950.0, 0.0, 0.0, 900.0], 2, 0.0);
        assert_relative_eq!(
            calculate_average_present_value(&discounted, 1000.0),
            95.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(standard_error(&discounted, 1000.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_simulations() {
        let discounted = ObservationMatrix::filled(&dates(), 0, 0.0);
        assert_eq!(calculate_average_present_value(&discounted, 1000.0), 0.0);
        assert_eq!(standard_error(&discounted, 1000.0), 0.0);
        let probs = calculate_autocall_probabilities(&discounted, 1.0);
        assert!(probs.values().all(|&p| p == 0.0));
    }

    #[test]
    fn test_autocall_probabilities_ignore_termination() {
        let ratios = matrix(&[1.4, 1.5, 0.9, 1.0, 1.3, 1.2], 2, 0.0);
        let probs = calculate_autocall_probabilities(&ratios, 1.3);

        let keys: Vec<Date> = probs.keys().copied().collect();
        assert_eq!(keys, dates());
        assert_eq!(probs[&dates()[0]], 0.5);
        assert_eq!(probs[&dates()[1]], 1.0);
        assert_eq!(probs[&dates()[2]], 0.0);
    }

    #[test]
    fn test_redemption_probabilities_sum_to_one() {
        let ratios = matrix(&[1.4, 1.5, 0.9, 1.0, 1.3, 1.2], 2, 0.0);
        let eligibility = matrix(&[true, false, false, true, true, false], 2, false);
        let probs = redemption_probabilities(&eligibility, &ratios, 1.3);

        assert_eq!(probs[&dates()[0]], 0.5);
        assert_eq!(probs[&dates()[1]], 0.5);
        assert_eq!(probs[&dates()[2]], 0.0);
        assert_relative_eq!(probs.values().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summary_derived_figures() {
        let d = dates();
        let summary = PricingSummary {
            price: 101.0,
            standard_error: 0.5,
            n_simulations: 4,
            autocall_probabilities: BTreeMap::new(),
            redemption_probabilities: [(d[0], 0.25), (d[1], 0.25), (d[2], 0.5)]
                .into_iter()
                .collect(),
        };
        assert_relative_eq!(summary.early_redemption_probability(), 0.5, epsilon = 1e-12);
        let life = summary.expected_life(|date| (date - d[0]) as f64 / 360.0 + 0.25);
        let expected = 0.25 * 0.25 + 0.25 * (91.0 / 360.0 + 0.25) + 0.5 * (185.0 / 360.0 + 0.25);
        assert_relative_eq!(life, expected, epsilon = 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_summary_json_keys_are_dates() {
        let d = dates();
        let summary = PricingSummary {
            price: 99.5,
            standard_error: 0.1,
            n_simulations: 10,
            autocall_probabilities: [(d[0], 0.3)].into_iter().collect(),
            redemption_probabilities: [(d[0], 1.0)].into_iter().collect(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"2024-03-29\":0.3"));
        let back: PricingSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
