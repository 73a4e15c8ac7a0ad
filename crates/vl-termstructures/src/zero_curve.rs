//! `ZeroCurve` — a curve defined by zero rates at a set of times.
//!
//! Outside the quoted range the zero rate is held flat. Inside, one of three
//! linear schemes applies (see [`CurveInterpolation`]).

use crate::discount_curve::{discount_from_rate, rate_from_discount, DiscountCurve};
use vl_core::{ensure, errors::Result, Rate, Time};
use vl_math::LinearInterpolation;

/// Interpolation scheme between quoted times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveInterpolation {
    /// Linear in discount factors.
    #[default]
    LinearDiscount,
    /// Linear in zero rates.
    LinearZero,
    /// Linear in `r(t)·t`, i.e. piecewise-flat forward rates.
    LinearRateTime,
}

/// Zero-rate curve on quoted times.
#[derive(Debug, Clone)]
pub struct ZeroCurve {
    times: Vec<Time>,
    rates: Vec<Rate>,
    interpolation: CurveInterpolation,
    interpolator: LinearInterpolation,
}

impl ZeroCurve {
    /// Build a curve with [`CurveInterpolation::LinearDiscount`].
    pub fn new(times: &[Time], rates: &[Rate]) -> Result<Self> {
        Self::with_interpolation(times, rates, CurveInterpolation::default())
    }

    /// Build a curve with an explicit interpolation scheme.
    ///
    /// # Errors
    /// Empty or mismatched inputs, non-increasing times, rates at or below
    /// `-1`, or non-positive times under the rate·time scheme.
    pub fn with_interpolation(
        times: &[Time],
        rates: &[Rate],
        interpolation: CurveInterpolation,
    ) -> Result<Self> {
        ensure!(
            times.len() == rates.len(),
            "curve times and rates must have the same length ({} vs {})",
            times.len(),
            rates.len()
        );
        ensure!(
            rates.iter().all(|r| r.is_finite() && *r > -1.0),
            "curve rates must be finite and greater than -1"
        );
        let nodes: Vec<Rate> = match interpolation {
            CurveInterpolation::LinearDiscount => times
                .iter()
                .zip(rates)
                .map(|(&t, &r)| discount_from_rate(t, r))
                .collect(),
            CurveInterpolation::LinearZero => rates.to_vec(),
            CurveInterpolation::LinearRateTime => {
                ensure!(
                    times.first().map_or(false, |&t| t > 0.0),
                    "rate-time interpolation requires all times to be positive"
                );
                times.iter().zip(rates).map(|(&t, &r)| t * r).collect()
            }
        };
        let interpolator = LinearInterpolation::new(times, &nodes)?;
        Ok(Self {
            times: times.to_vec(),
            rates: rates.to_vec(),
            interpolation,
            interpolator,
        })
    }

    /// Quoted times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Quoted zero rates.
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }

    /// The interpolation scheme.
    pub fn interpolation(&self) -> CurveInterpolation {
        self.interpolation
    }
}

impl DiscountCurve for ZeroCurve {
    fn zero_rate(&self, t: Time) -> Rate {
        let n = self.times.len();
        if t <= self.times[0] {
            return self.rates[0];
        }
        if t >= self.times[n - 1] {
            return self.rates[n - 1];
        }
        let v = self.interpolator.value(t);
        match self.interpolation {
            CurveInterpolation::LinearDiscount => rate_from_discount(t, v),
            CurveInterpolation::LinearZero => v,
            CurveInterpolation::LinearRateTime => v / t,
        }
    }
}
