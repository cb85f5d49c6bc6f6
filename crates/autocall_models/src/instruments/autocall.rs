//! Autocallable note terms.

use super::error::InstrumentError;

/// Default notional when none is given to the builder.
pub const DEFAULT_NOMINAL: f64 = 1_000.0;

/// Selector for one of the three barriers of the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Barrier {
    /// Coupon paid when the ratio meets this level.
    Coupon,
    /// Early redemption when the ratio meets this level.
    Autocall,
    /// Capital at risk when the ratio falls to this level.
    Put,
}

/// Economic terms of an autocallable note.
///
/// Barriers are expressed as ratios of the effective path to its day-0
/// level (1.0 = at the money).
///
/// # Examples
///
/// ```
/// use autocall_models::instruments::{AutocallTerms, Barrier};
///
/// let terms = AutocallTerms::builder()
///     .nominal(1_000.0)
///     .coupon_rate(0.05)
///     .coupon_barrier(1.1)
///     .autocall_barrier(1.3)
///     .put_barrier(0.8)
///     .build()
///     .unwrap();
///
/// assert_eq!(terms.barrier_level(Barrier::Put, 250.0), 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTerms"))]
pub struct AutocallTerms {
    nominal: f64,
    coupon_rate: f64,
    coupon_barrier: f64,
    autocall_barrier: f64,
    put_barrier: f64,
}

impl AutocallTerms {
    /// Creates a new terms builder.
    #[inline]
    pub fn builder() -> AutocallTermsBuilder {
        AutocallTermsBuilder::default()
    }

    /// Returns the nominal.
    #[inline]
    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Returns the coupon rate per observation.
    #[inline]
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Returns the coupon barrier ratio.
    #[inline]
    pub fn coupon_barrier(&self) -> f64 {
        self.coupon_barrier
    }

    /// Returns the autocall barrier ratio.
    #[inline]
    pub fn autocall_barrier(&self) -> f64 {
        self.autocall_barrier
    }

    /// Returns the put barrier ratio.
    #[inline]
    pub fn put_barrier(&self) -> f64 {
        self.put_barrier
    }

    /// Returns the ratio of the selected barrier.
    #[inline]
    pub fn barrier(&self, barrier: Barrier) -> f64 {
        match barrier {
            Barrier::Coupon => self.coupon_barrier,
            Barrier::Autocall => self.autocall_barrier,
            Barrier::Put => self.put_barrier,
        }
    }

    /// Returns the selected barrier as a price level for a path starting
    /// at `spot`.
    #[inline]
    pub fn barrier_level(&self, barrier: Barrier, spot: f64) -> f64 {
        self.barrier(barrier) * spot
    }

    /// Coupon amount paid on an observation date.
    #[inline]
    pub fn coupon_amount(&self) -> f64 {
        self.nominal * self.coupon_rate
    }

    /// Largest undiscounted price, in percent of nominal, the note can reach
    /// over `n_observations` dates: every coupon plus the nominal.
    #[inline]
    pub fn max_price_pct(&self, n_observations: usize) -> f64 {
        (1.0 + self.coupon_rate * n_observations as f64) * 100.0
    }

    /// Checks every parameter's range.
    ///
    /// # Errors
    ///
    /// `InstrumentError::InvalidParameter` if:
    /// - `nominal` is not strictly positive and finite
    /// - `coupon_rate` is negative or not finite
    /// - any barrier is not strictly positive and finite
    pub fn validate(&self) -> Result<(), InstrumentError> {
        check_positive("nominal", self.nominal)?;
        if !(self.coupon_rate >= 0.0) || !self.coupon_rate.is_finite() {
            return Err(InstrumentError::InvalidParameter {
                name: "coupon_rate",
                value: self.coupon_rate,
                reason: "must be finite and non-negative",
            });
        }
        check_positive("coupon_barrier", self.coupon_barrier)?;
        check_positive("autocall_barrier", self.autocall_barrier)?;
        check_positive("put_barrier", self.put_barrier)?;
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), InstrumentError> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(InstrumentError::InvalidParameter {
            name,
            value,
            reason: "must be finite and strictly positive",
        });
    }
    Ok(())
}

/// Builder for [`AutocallTerms`].
///
/// Nominal defaults to [`DEFAULT_NOMINAL`]; every other field is required.
#[derive(Debug, Clone, Default)]
pub struct AutocallTermsBuilder {
    nominal: Option<f64>,
    coupon_rate: Option<f64>,
    coupon_barrier: Option<f64>,
    autocall_barrier: Option<f64>,
    put_barrier: Option<f64>,
}

impl AutocallTermsBuilder {
    /// Sets the nominal.
    #[inline]
    pub fn nominal(mut self, nominal: f64) -> Self {
        self.nominal = Some(nominal);
        self
    }

    /// Sets the coupon rate paid per observation.
    #[inline]
    pub fn coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the coupon barrier ratio.
    #[inline]
    pub fn coupon_barrier(mut self, barrier: f64) -> Self {
        self.coupon_barrier = Some(barrier);
        self
    }

    /// Sets the autocall barrier ratio.
    #[inline]
    pub fn autocall_barrier(mut self, barrier: f64) -> Self {
        self.autocall_barrier = Some(barrier);
        self
    }

    /// Sets the put barrier ratio.
    #[inline]
    pub fn put_barrier(mut self, barrier: f64) -> Self {
        self.put_barrier = Some(barrier);
        self
    }

    /// Builds and validates the terms.
    ///
    /// A missing field is reported as `InvalidParameter` with a NaN value.
    pub fn build(self) -> Result<AutocallTerms, InstrumentError> {
        let required = |name: &'static str, value: Option<f64>| {
            value.ok_or(InstrumentError::InvalidParameter {
                name,
                value: f64::NAN,
                reason: "must be specified",
            })
        };

        let terms = AutocallTerms {
            nominal: self.nominal.unwrap_or(DEFAULT_NOMINAL),
            coupon_rate: required("coupon_rate", self.coupon_rate)?,
            coupon_barrier: required("coupon_barrier", self.coupon_barrier)?,
            autocall_barrier: required("autocall_barrier", self.autocall_barrier)?,
            put_barrier: required("put_barrier", self.put_barrier)?,
        };

        terms.validate()?;
        Ok(terms)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTerms {
    #[serde(default = "default_nominal")]
    nominal: f64,
    coupon_rate: f64,
    coupon_barrier: f64,
    autocall_barrier: f64,
    put_barrier: f64,
}

#[cfg(feature = "serde")]
fn default_nominal() -> f64 {
    DEFAULT_NOMINAL
}

#[cfg(feature = "serde")]
impl TryFrom<RawTerms> for AutocallTerms {
    type Error = InstrumentError;

    fn try_from(raw: RawTerms) -> Result<Self, Self::Error> {
        AutocallTerms::builder()
            .nominal(raw.nominal)
            .coupon_rate(raw.coupon_rate)
            .coupon_barrier(raw.coupon_barrier)
            .autocall_barrier(raw.autocall_barrier)
            .put_barrier(raw.put_barrier)
            .build()
    }
}
