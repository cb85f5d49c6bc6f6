//! Pseudo-random number generator wrapper for Monte Carlo simulations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Monte Carlo simulation random number generator.
///
/// Wraps `StdRng` and remembers the seed it was initialised with, if any,
/// so runs can be logged and replayed.
///
/// # Examples
///
/// ```rust
/// use autocall_pricing::rng::PricerRng;
///
/// let mut rng = PricerRng::from_seed(42);
/// assert_eq!(rng.seed(), Some(42));
///
/// let mut buffer = vec![0.0; 100];
/// rng.fill_normal(&mut buffer);
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    inner: StdRng,
    seed: Option<u64>,
}

impl PricerRng {
    /// Creates a generator initialised with `seed`.
    ///
    /// The same seed always produces the same sequence.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a generator seeded from operating-system entropy.
    ///
    /// Draws are not reproducible.
    #[inline]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when `seed` is `Some`, entropy-seeded otherwise.
    #[inline]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Returns the seed used for initialisation, `None` for entropy.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generates a single uniform value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Generates a single standard normal variate.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills the buffer with standard normal variates, in order.
    ///
    /// Zero-allocation; an empty buffer is a no-op.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PricerRng::from_seed(7);
        let mut b = PricerRng::from_seed(7);
        let mut buf_a = vec![0.0; 64];
        let mut buf_b = vec![0.0; 64];
        a.fill_normal(&mut buf_a);
        b.fill_normal(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_different_seed_different_sequence() {
        let mut a = PricerRng::from_seed(1);
        let mut b = PricerRng::from_seed(2);
        assert_ne!(a.gen_normal(), b.gen_normal());
    }

    #[test]
    fn test_entropy_has_no_seed() {
        assert_eq!(PricerRng::from_entropy().seed(), None);
        assert_eq!(PricerRng::from_optional_seed(Some(3)).seed(), Some(3));
        assert_eq!(PricerRng::from_optional_seed(None).seed(), None);
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = PricerRng::from_seed(11);
        for _ in 0..1_000 {
            let u = rng.gen_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = PricerRng::from_seed(2024);
        let mut buf = vec![0.0; 200_000];
        rng.fill_normal(&mut buf);
        let n = buf.len() as f64;
        let mean = buf.iter().sum::<f64>() / n;
        let var = buf.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!(mean.abs() < 0.01);
        assert!((var - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_empty_buffer() {
        let mut rng = PricerRng::from_seed(0);
        let mut buf: Vec<f64> = Vec::new();
        rng.fill_normal(&mut buf);
        assert!(buf.is_empty());
    }
}
