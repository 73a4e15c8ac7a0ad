//! `FlatCurve` — a curve with one zero rate for all maturities.

use crate::discount_curve::DiscountCurve;
use vl_core::{ensure, errors::Result, Rate, Time};

/// A constant zero-rate curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve {
    rate: Rate,
}

impl FlatCurve {
    /// Create a flat curve; the rate must be finite and above `-1`.
    pub fn new(rate: Rate) -> Result<Self> {
        ensure!(
            rate.is_finite() && rate > -1.0,
            "flat curve rate must be finite and greater than -1, got {rate}"
        );
        Ok(Self { rate })
    }

    /// The zero rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl DiscountCurve for FlatCurve {
    fn zero_rate(&self, _t: Time) -> Rate {
        self.rate
    }
}
