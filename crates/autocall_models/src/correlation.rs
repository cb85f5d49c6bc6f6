//! Correlation matrices and their Cholesky factors.
//!
//! Given `n` independent standard normals `Z`, correlated normals are obtained
//! as `W = L * Z` where `L` is the lower triangular factor of the correlation
//! matrix `C = L * L^T`.
//!
//! The factorisation accepts positive *semi*-definite matrices: a zero pivot
//! (for instance two perfectly correlated assets) yields a zero column in `L`
//! instead of an error, as long as the rest of the matrix is consistent with
//! it.
//!
//! ## Usage
//!
//! ```
//! use autocall_models::correlation::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[
//!     1.0_f64, 0.5,
//!     0.5, 1.0,
//! ], 2).unwrap();
//!
//! let cholesky = corr.cholesky().unwrap();
//! let w = cholesky.transform(&[0.5_f64, 0.8]);
//! assert_eq!(w.len(), 2);
//! assert_eq!(w[0], 0.5);
//! ```

use num_traits::Float;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Error types for correlation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive semi-definite.
    #[error("Correlation matrix is not positive semi-definite (pivot {index} = {pivot})")]
    NotPositiveSemiDefinite {
        /// Column at which the factorisation broke down
        index: usize,
        /// Residual pivot value
        pivot: f64,
    },

    /// Number of elements does not match `dim * dim`.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count
        expected: usize,
        /// Supplied element count
        got: usize,
    },

    /// Diagonal element is not 1.0.
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Matrix is not symmetric.
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
    },

    /// Correlation outside [-1, 1] or not finite.
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
        /// Offending value
        value: f64,
    },

    /// The same ticker was requested twice from a correlation source.
    #[error("Ticker '{0}' appears more than once")]
    DuplicateTicker(String),
}

/// Correlation matrix with validation and Cholesky decomposition.
///
/// A correlation matrix must be:
/// - Square and symmetric
/// - Unit diagonal
/// - Off-diagonal elements in [-1, 1]
/// - Positive semi-definite (checked by [`CorrelationMatrix::cholesky`])
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix<T: Float> {
    /// Matrix elements in row-major order
    data: Vec<T>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Create a new correlation matrix from a flat row-major array.
    ///
    /// # Errors
    ///
    /// - `InvalidDimensions` unless there are exactly `dim * dim` elements
    /// - `InvalidDiagonal` unless every diagonal element is 1.0
    /// - `NotSymmetric` if `C[i][j] != C[j][i]`
    /// - `OutOfRange` for off-diagonal elements outside [-1, 1]
    pub fn new(data: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let one = T::one();
        let epsilon = T::from(1e-10).unwrap_or_else(T::zero);

        for i in 0..dim {
            let diag = data[i * dim + i];
            if !((diag - one).abs() <= epsilon) {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if !(val_ij >= -one && val_ij <= one) {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij.to_f64().unwrap_or(f64::NAN),
                    });
                }

                if !((val_ij - val_ji).abs() <= epsilon) {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Create a correlation matrix from nested rows.
    ///
    /// ```
    /// use autocall_models::correlation::CorrelationMatrix;
    ///
    /// let corr = CorrelationMatrix::from_rows(&[
    ///     vec![1.0, 0.3],
    ///     vec![0.3, 1.0],
    /// ]).unwrap();
    /// assert_eq!(corr.get(0, 1), 0.3);
    /// ```
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, CorrelationError> {
        let dim = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(CorrelationError::InvalidDimensions {
                expected: dim * dim,
                got: dim * (dim - 1) + row.len(),
            });
        }
        let data: Vec<T> = rows.iter().flatten().copied().collect();
        Self::new(&data, dim)
    }

    /// Create an identity correlation matrix (no correlation).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Get matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Compute the lower triangular factor `L` with `C = L * L^T`.
    ///
    /// Pivots within `1e-12` of zero are treated as exact zeros so singular
    /// but positive semi-definite matrices factorise.
    ///
    /// # Errors
    ///
    /// `NotPositiveSemiDefinite` if a pivot is negative, or if a zero pivot
    /// leaves an off-diagonal residual that no factor could reproduce.
    pub fn cholesky(&self) -> Result<CholeskyFactor<T>, CorrelationError> {
        let n = self.dim;
        let mut lower = vec![T::zero(); n * n];
        let pivot_tol = T::from(1e-12).unwrap_or_else(T::zero);
        let residual_tol = T::from(1e-8).unwrap_or_else(T::zero);

        for j in 0..n {
            let mut sum = T::zero();
            for k in 0..j {
                let l_jk = lower[j * n + k];
                sum = sum + l_jk * l_jk;
            }
            let diag = self.get(j, j) - sum;

            if diag < -pivot_tol {
                return Err(CorrelationError::NotPositiveSemiDefinite {
                    index: j,
                    pivot: diag.to_f64().unwrap_or(f64::NAN),
                });
            }

            if diag <= pivot_tol {
                // Column is linearly dependent on the previous ones
                for i in (j + 1)..n {
                    let mut s = T::zero();
                    for k in 0..j {
                        s = s + lower[i * n + k] * lower[j * n + k];
                    }
                    let residual = self.get(i, j) - s;
                    if residual.abs() > residual_tol {
                        return Err(CorrelationError::NotPositiveSemiDefinite {
                            index: j,
                            pivot: diag.to_f64().unwrap_or(f64::NAN),
                        });
                    }
                }
                continue;
            }

            let l_jj = diag.sqrt();
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let mut s = T::zero();
                for k in 0..j {
                    s = s + lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = (self.get(i, j) - s) / l_jj;
            }
        }

        debug!(dim = n, "Cholesky factor built");
        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower triangular Cholesky factor of a correlation matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor<T: Float> {
    /// Lower triangular matrix elements (row-major)
    data: Vec<T>,
    /// Matrix dimension
    dim: usize,
}

impl<T: Float> CholeskyFactor<T> {
    /// Get matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j). Zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Computes `W = L * Z` into `out` without allocating.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `out` is shorter than `self.dim()`.
    #[inline]
    pub fn transform_into(&self, z: &[T], out: &mut [T]) {
        let n = self.dim;
        for i in 0..n {
            let row = &self.data[i * n..i * n + i + 1];
            out[i] = row
                .iter()
                .zip(&z[..=i])
                .fold(T::zero(), |acc, (&l, &zj)| acc + l * zj);
        }
    }

    /// Transforms independent standard normals into correlated normals.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[T]) -> Vec<T> {
        let mut w = vec![T::zero(); self.dim];
        self.transform_into(z, &mut w);
        w
    }

    /// Reconstructs `L * L^T`.
    pub fn reconstruct(&self) -> Vec<T> {
        let n = self.dim;
        let mut out = vec![T::zero(); n * n];
        for i in 0..n {
            for j in 0..n {
                let mut s = T::zero();
                for k in 0..=i.min(j) {
                    s = s + self.get(i, k) * self.get(j, k);
                }
                out[i * n + j] = s;
            }
        }
        out
    }
}

/// Provider of correlation matrices for an ordered set of tickers.
///
/// Implementations return a matrix whose row/column `i` corresponds to
/// `tickers[i]`.
pub trait CorrelationSource {
    /// Returns the correlation matrix for `tickers`, in that order.
    fn correlation_matrix(&self, tickers: &[&str])
        -> Result<CorrelationMatrix<f64>, CorrelationError>;
}

impl CorrelationSource for CorrelationMatrix<f64> {
    fn correlation_matrix(
        &self,
        tickers: &[&str],
    ) -> Result<CorrelationMatrix<f64>, CorrelationError> {
        check_unique(tickers)?;
        if tickers.len() != self.dim {
            return Err(CorrelationError::InvalidDimensions {
                expected: tickers.len() * tickers.len(),
                got: self.data.len(),
            });
        }
        Ok(self.clone())
    }
}

/// Pairwise correlation table keyed by ticker.
///
/// Pairs are symmetric. The diagonal is always 1 and pairs that were never
/// inserted are uncorrelated.
///
/// # Example
///
/// ```
/// use autocall_models::correlation::{CorrelationSource, PairwiseCorrelations};
///
/// let source = PairwiseCorrelations::new()
///     .with_pair("AAPL", "MSFT", 0.6)
///     .with_pair("MSFT", "GOOG", 0.4);
///
/// let corr = source.correlation_matrix(&["GOOG", "MSFT", "AAPL"]).unwrap();
/// assert_eq!(corr.get(0, 1), 0.4);
/// assert_eq!(corr.get(2, 1), 0.6);
/// assert_eq!(corr.get(0, 2), 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PairwiseCorrelations {
    pairs: HashMap<(String, String), f64>,
}

impl PairwiseCorrelations {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair, builder style.
    pub fn with_pair(mut self, a: &str, b: &str, rho: f64) -> Self {
        self.insert(a, b, rho);
        self
    }

    /// Inserts or replaces the correlation between `a` and `b`.
    pub fn insert(&mut self, a: &str, b: &str, rho: f64) {
        self.pairs.insert(Self::key(a, b), rho);
    }

    /// Returns the stored correlation between `a` and `b`.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.pairs.get(&Self::key(a, b)).copied()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}

impl CorrelationSource for PairwiseCorrelations {
    fn correlation_matrix(
        &self,
        tickers: &[&str],
    ) -> Result<CorrelationMatrix<f64>, CorrelationError> {
        check_unique(tickers)?;
        let n = tickers.len();
        let mut data = vec![0.0; n * n];
        for (i, a) in tickers.iter().enumerate() {
            for (j, b) in tickers.iter().enumerate() {
                data[i * n + j] = if i == j {
                    1.0
                } else {
                    self.get(a, b).unwrap_or(0.0)
                };
            }
        }
        CorrelationMatrix::new(&data, n)
    }
}

fn check_unique(tickers: &[&str]) -> Result<(), CorrelationError> {
    let mut seen = HashSet::with_capacity(tickers.len());
    for ticker in tickers {
        if !seen.insert(*ticker) {
            return Err(CorrelationError::DuplicateTicker(ticker.to_string()));
        }
    }
    Ok(())
}
