//! `DiscountCurve` — the yield-curve contract.
//!
//! Zero rates are annually compounded on an act/365 time axis, so
//! `P(t) = (1 + r(t))^-t`.

use vl_core::{DiscountFactor, Rate, Real, Time, EXPIRY_TOLERANCE};

/// A discount curve.
///
/// Implementors provide the zero rate; the discount factor and the simple
/// forward amount follow from it.
pub trait DiscountCurve: std::fmt::Debug + Send + Sync {
    /// Annually compounded zero rate for time `t`.
    fn zero_rate(&self, t: Time) -> Rate;

    /// Discount factor for time `t`.
    fn discount(&self, t: Time) -> DiscountFactor {
        discount_from_rate(t, self.zero_rate(t))
    }

    /// Simple forward amount `P(t0)/P(t1) - 1` for the period `[t0, t1]`,
    /// zero for periods shorter than a 512th of a year.
    fn forward_amount(&self, t0: Time, t1: Time) -> Real {
        if t1 - t0 < EXPIRY_TOLERANCE {
            return 0.0;
        }
        self.discount(t0) / self.discount(t1) - 1.0
    }
}

/// `(1 + r)^-t`.
#[inline]
pub fn discount_from_rate(t: Time, rate: Rate) -> DiscountFactor {
    (1.0 + rate).powf(-t)
}

/// Discount factor for time `t` on `disc` with the zero rate of `spread`
/// and a constant `residual` spread added to the curve's zero rate.
///
/// Without a spread curve and with a zero residual this is `disc.discount(t)`.
pub fn spreaded_discount(
    disc: &dyn DiscountCurve,
    spread: Option<&dyn DiscountCurve>,
    residual: Rate,
    t: Time,
) -> DiscountFactor {
    if spread.is_none() && residual == 0.0 {
        return disc.discount(t);
    }
    let mut rate = disc.zero_rate(t) + residual;
    if let Some(spread) = spread {
        rate += spread.zero_rate(t);
    }
    discount_from_rate(t, rate)
}

/// Inverse of [`discount_from_rate`]; `t` must be positive.
#[inline]
pub fn rate_from_discount(t: Time, df: DiscountFactor) -> Rate {
    df.powf(-1.0 / t) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Debug)]
    struct Constant(Rate);

    impl DiscountCurve for Constant {
        fn zero_rate(&self, _t: Time) -> Rate {
            self.0
        }
    }

    #[test]
    fn discount_is_annually_compounded() {
        let c = Constant(0.05);
        assert_abs_diff_eq!(c.discount(0.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(c.discount(2.0), 1.0 / 1.05 / 1.05, epsilon = 1e-14);
    }

    #[test]
    fn forward_amount_over_one_year() {
        let c = Constant(0.02);
        assert_abs_diff_eq!(c.forward_amount(3.0, 4.0), 0.02, epsilon = 1e-13);
        assert_eq!(c.forward_amount(3.0, 3.001), 0.0);
    }

    #[test]
    fn spreads_add_to_the_zero_rate() {
        let disc = Constant(0.03);
        let spread = Constant(0.015);
        let df = spreaded_discount(&disc, Some(&spread), 0.005, 4.0);
        assert_abs_diff_eq!(df, 1.05f64.powi(-4), epsilon = 1e-15);
        assert_eq!(spreaded_discount(&disc, None, 0.0, 4.0), disc.discount(4.0));
    }

    #[test]
    fn rate_discount_roundtrip() {
        let df = discount_from_rate(7.5, 0.031);
        assert_abs_diff_eq!(rate_from_discount(7.5, df), 0.031, epsilon = 1e-13);
    }
}
