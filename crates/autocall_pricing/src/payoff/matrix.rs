//! Observation-date x simulation matrices.

use autocall_core::types::time::Date;

/// Values indexed by (observation date, simulation).
///
/// Stored per simulation, `values[sim * n_dates + d]`, matching the order in
/// which the payoff engine fills them.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMatrix<T> {
    dates: Vec<Date>,
    n_simulations: usize,
    values: Vec<T>,
}

impl<T: Copy> ObservationMatrix<T> {
    /// Matrix over `dates` x `n_simulations` filled with `value`.
    pub fn filled(dates: &[Date], n_simulations: usize, value: T) -> Self {
        Self {
            dates: dates.to_vec(),
            n_simulations,
            values: vec![value; dates.len() * n_simulations],
        }
    }

    /// Observation dates (row labels).
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of observation dates.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Value at date index `d` for simulation `sim`.
    #[inline]
    pub fn get(&self, d: usize, sim: usize) -> T {
        self.values[sim * self.dates.len() + d]
    }

    /// Value on `date` for simulation `sim`, `None` off the schedule.
    pub fn get_by_date(&self, date: Date, sim: usize) -> Option<T> {
        if sim >= self.n_simulations {
            return None;
        }
        let d = self.dates.binary_search(&date).ok()?;
        Some(self.get(d, sim))
    }

    /// All dates of one simulation.
    #[inline]
    pub fn simulation(&self, sim: usize) -> &[T] {
        let n = self.dates.len();
        &self.values[sim * n..(sim + 1) * n]
    }

    /// All simulations at date index `d`.
    pub fn row(&self, d: usize) -> Vec<T> {
        self.values
            .chunks_exact(self.dates.len())
            .map(|sim| sim[d])
            .collect()
    }

    /// Iterator over per-simulation slices.
    pub fn simulations(&self) -> impl Iterator<Item = &[T]> {
        self.values.chunks_exact(self.dates.len().max(1))
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }
}
