//! Effective path selection for mono, worst-of and best-of notes.

use crate::error::{EngineError, ValidationError};
use crate::mc::PricePathSet;
use autocall_models::instruments::BasketStrategy;
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::debug;

/// The single path the payoff is evaluated on.
///
/// For a mono-asset note it borrows the first underlying's prices. For a
/// basket it is the per-(time, simulation) minimum or maximum of each
/// underlying's price divided by its own day-0 price, so it starts at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivePath<'p> {
    n_times: usize,
    n_simulations: usize,
    values: Cow<'p, [f64]>,
}

impl<'p> EffectivePath<'p> {
    /// Builds the effective path of `strategy` over `paths`.
    ///
    /// The number of underlyings is not checked against
    /// [`BasketStrategy::min_assets`] here: a basket of one collapses to that
    /// asset's normalised path.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyPaths` without path sets
    /// - `ValidationError::ShapeMismatch` if the path sets differ in shape
    pub fn select(strategy: BasketStrategy, paths: &'p [PricePathSet]) -> Result<Self, EngineError> {
        let first = paths.first().ok_or(ValidationError::EmptyPaths)?;
        let n_times = first.n_times();
        let n_simulations = first.n_simulations();

        for set in &paths[1..] {
            if set.n_times() != n_times || set.n_simulations() != n_simulations {
                return Err(ValidationError::ShapeMismatch {
                    what: "basket path sets",
                    expected: n_times * n_simulations,
                    got: set.n_times() * set.n_simulations(),
                }
                .into());
            }
        }

        debug!(%strategy, n_assets = paths.len(), "effective path selected");

        let values = match strategy {
            BasketStrategy::Mono => Cow::Borrowed(first.as_slice()),
            BasketStrategy::WorstOf => Cow::Owned(normalised_extreme(paths, f64::INFINITY, f64::min)),
            BasketStrategy::BestOf => {
                Cow::Owned(normalised_extreme(paths, f64::NEG_INFINITY, f64::max))
            }
        };

        Ok(Self {
            n_times,
            n_simulations,
            values,
        })
    }

    /// Number of time points.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Effective level at time index `t` in simulation `sim`.
    #[inline]
    pub fn value(&self, t: usize, sim: usize) -> f64 {
        self.values[sim * self.n_times + t]
    }

    /// Level at `t` relative to the day-0 level.
    #[inline]
    pub fn ratio(&self, t: usize, sim: usize) -> f64 {
        self.value(t, sim) / self.value(0, sim)
    }

    /// Whole effective path of simulation `sim`.
    #[inline]
    pub fn column(&self, sim: usize) -> &[f64] {
        &self.values[sim * self.n_times..(sim + 1) * self.n_times]
    }

    /// `true` when the path borrows the underlying prices.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.values, Cow::Borrowed(_))
    }
}

fn normalised_extreme(paths: &[PricePathSet], init: f64, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let n_times = paths[0].n_times();
    let mut out = vec![init; paths[0].as_slice().len()];

    out.par_chunks_mut(n_times)
        .enumerate()
        .for_each(|(sim, slot)| {
            for set in paths {
                let column = set.column(sim);
                let initial = column[0];
                for (acc, &price) in slot.iter_mut().zip(column) {
                    *acc = pick(*acc, price / initial);
                }
            }
        });

    out
}
