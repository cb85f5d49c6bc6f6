//! Nearest-neighbour lookup over scattered 2-D data.

use crate::types::InterpolationError;
use num_traits::Float;

/// Scattered 2-D interpolator that returns the value of the closest node.
///
/// Distance is Euclidean in the raw `(x, y)` coordinates; the axes are not
/// rescaled. Ties resolve to the node supplied first. The result is
/// piecewise constant: there is no smoothing between nodes.
///
/// # Example
///
/// ```
/// use autocall_core::math::interpolators::NearestNeighbourInterpolator;
///
/// let interp = NearestNeighbourInterpolator::new(&[
///     (0.5, 90.0, 0.25),
///     (0.5, 110.0, 0.20),
///     (1.0, 90.0, 0.27),
///     (1.0, 110.0, 0.22),
/// ]).unwrap();
///
/// assert_eq!(interp.interpolate(0.6, 104.0).unwrap(), 0.20);
/// assert_eq!(interp.interpolate(2.0, 10.0).unwrap(), 0.27);
/// ```
#[derive(Debug, Clone)]
pub struct NearestNeighbourInterpolator<T: Float> {
    /// Node coordinates and values: (x, y, z)
    nodes: Vec<(T, T, T)>,
}

impl<T: Float> NearestNeighbourInterpolator<T> {
    /// Builds the interpolator from `(x, y, value)` triples.
    ///
    /// # Errors
    ///
    /// * `InterpolationError::InsufficientData` - No nodes supplied
    /// * `InterpolationError::NonFiniteData` - NaN or infinite coordinate/value
    pub fn new(nodes: &[(T, T, T)]) -> Result<Self, InterpolationError> {
        if nodes.is_empty() {
            return Err(InterpolationError::InsufficientData { got: 0, need: 1 });
        }

        if let Some(index) = nodes
            .iter()
            .position(|(x, y, z)| !x.is_finite() || !y.is_finite() || !z.is_finite())
        {
            return Err(InterpolationError::NonFiniteData { index });
        }

        Ok(Self {
            nodes: nodes.to_vec(),
        })
    }

    /// Returns the value at the node closest to `(x, y)`.
    ///
    /// # Errors
    ///
    /// `InterpolationError::InvalidInput` if either coordinate is NaN.
    pub fn interpolate(&self, x: T, y: T) -> Result<T, InterpolationError> {
        if x.is_nan() || y.is_nan() {
            return Err(InterpolationError::InvalidInput(
                "query point is NaN".to_string(),
            ));
        }

        let mut best = self.nodes[0];
        let mut best_dist = Self::squared_distance(best, x, y);

        for &node in &self.nodes[1..] {
            let dist = Self::squared_distance(node, x, y);
            if dist < best_dist {
                best = node;
                best_dist = dist;
            }
        }

        Ok(best.2)
    }

    /// Returns the nodes in input order.
    #[inline]
    pub fn nodes(&self) -> &[(T, T, T)] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the bounding box `((x_min, x_max), (y_min, y_max))`.
    pub fn bounds(&self) -> ((T, T), (T, T)) {
        let init = (
            (T::infinity(), T::neg_infinity()),
            (T::infinity(), T::neg_infinity()),
        );
        self.nodes
            .iter()
            .fold(init, |((x_lo, x_hi), (y_lo, y_hi)), &(x, y, _)| {
                ((x_lo.min(x), x_hi.max(x)), (y_lo.min(y), y_hi.max(y)))
            })
    }

    #[inline]
    fn squared_distance(node: (T, T, T), x: T, y: T) -> T {
        let dx = node.0 - x;
        let dy = node.1 - y;
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> NearestNeighbourInterpolator<f64> {
        NearestNeighbourInterpolator::new(&[
            (0.25, 80.0, 0.30),
            (0.25, 100.0, 0.25),
            (0.25, 120.0, 0.22),
            (1.0, 80.0, 0.28),
            (1.0, 100.0, 0.24),
            (1.0, 120.0, 0.21),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_node_returns_node_value() {
        let interp = grid();
        for &(x, y, z) in interp.nodes() {
            assert_eq!(interp.interpolate(x, y).unwrap(), z);
        }
    }

    #[test]
    fn test_snaps_instead_of_smoothing() {
        let interp = grid();
        // Just on the 100 side of the 90 midpoint
        assert_eq!(interp.interpolate(0.25, 90.5).unwrap(), 0.25);
        assert_eq!(interp.interpolate(0.25, 89.5).unwrap(), 0.30);
    }

    #[test]
    fn test_far_queries_clamp_to_boundary_nodes() {
        let interp = grid();
        assert_eq!(interp.interpolate(10.0, 1000.0).unwrap(), 0.21);
        assert_eq!(interp.interpolate(-1.0, 0.0).unwrap(), 0.30);
    }

    #[test]
    fn test_tie_resolves_to_first_node() {
        let interp =
            NearestNeighbourInterpolator::new(&[(0.0, 0.0, 1.0), (0.0, 2.0, 2.0)]).unwrap();
        assert_eq!(interp.interpolate(0.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        let empty: [(f64, f64, f64); 0] = [];
        assert!(NearestNeighbourInterpolator::new(&empty).is_err());
        assert!(matches!(
            NearestNeighbourInterpolator::new(&[(0.0, 1.0, f64::INFINITY)]),
            Err(InterpolationError::NonFiniteData { index: 0 })
        ));
    }

    #[test]
    fn test_bounds() {
        let ((x_lo, x_hi), (y_lo, y_hi)) = grid().bounds();
        assert_eq!((x_lo, x_hi), (0.25, 1.0));
        assert_eq!((y_lo, y_hi), (80.0, 120.0));
    }
}
