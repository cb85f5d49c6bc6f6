//! Per-path state threaded through the observation dates.

/// Redemption eligibility and ratio extremes of one simulated path.
///
/// Eligibility only ever goes from `true` to `false`: once the path has
/// touched the autocall barrier it has redeemed and no later date pays.
///
/// # Examples
///
/// ```
/// use autocall_pricing::payoff::PathState;
///
/// let mut state = PathState::new();
/// assert!(state.observe(1.05, 1.3));  // eligible on the first date
/// assert!(state.observe(1.35, 1.3));  // still eligible: redeems here
/// assert!(!state.observe(1.10, 1.3)); // terminated
/// assert_eq!(state.running_min(), 1.05);
/// assert_eq!(state.running_max(), 1.35);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathState {
    eligible: bool,
    running_max: f64,
    running_min: f64,
}

impl Default for PathState {
    fn default() -> Self {
        Self::new()
    }
}

impl PathState {
    /// Fresh state before the first observation.
    #[inline]
    pub fn new() -> Self {
        Self {
            eligible: true,
            running_max: f64::NEG_INFINITY,
            running_min: f64::INFINITY,
        }
    }

    /// `true` while no earlier date reached the autocall barrier.
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// Highest ratio observed so far.
    #[inline]
    pub fn running_max(&self) -> f64 {
        self.running_max
    }

    /// Lowest ratio observed so far.
    #[inline]
    pub fn running_min(&self) -> f64 {
        self.running_min
    }

    /// Records the ratio of the next observation date.
    ///
    /// Returns the eligibility *before* this date, which is what decides
    /// whether the date can pay.
    #[inline]
    pub fn observe(&mut self, ratio: f64, autocall_barrier: f64) -> bool {
        let eligible = self.eligible;
        self.running_max = self.running_max.max(ratio);
        self.running_min = self.running_min.min(ratio);
        if ratio >= autocall_barrier {
            self.eligible = false;
        }
        eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_barrier_touch_is_inclusive() {
        let mut state = PathState::new();
        assert!(state.observe(1.3, 1.3));
        assert!(!state.is_eligible());
    }

    #[test]
    fn test_fresh_state() {
        let state = PathState::default();
        assert!(state.is_eligible());
        assert_eq!(state.running_min(), f64::INFINITY);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_eligibility_never_returns(ratios in prop::collection::vec(0.2_f64..2.0, 1..24)) {
            let mut state = PathState::new();
            let mut seen_false = false;
            for r in &ratios {
                let eligible = state.observe(*r, 1.3);
                prop_assert!(!(seen_false && eligible));
                seen_false |= !eligible;
            }
            let min = ratios.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(state.running_min(), min);
        }
    }
}
