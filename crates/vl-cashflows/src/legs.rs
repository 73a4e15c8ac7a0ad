//! Fixed and floating swap legs.
//!
//! Payments carry their accrual period, payment time, notional and year
//! fraction directly; schedule generation and day counting happen upstream.
//! [`regular_periods`] covers the common case of equally spaced periods.

use vl_core::{ensure, errors::Result, Real, Spread, Time, EXPIRY_TOLERANCE};
use vl_termstructures::DiscountCurve;

/// Split `[t_start, t_end]` into periods of length `period`, rolling back
/// from `t_end` so that any short stub sits at the front.
///
/// A remaining front piece shorter than a 512th of a year is merged into the
/// first full period.
pub fn regular_periods(t_start: Time, t_end: Time, period: Time) -> Result<Vec<(Time, Time)>> {
    ensure!(
        t_start.is_finite() && t_end.is_finite(),
        "period bounds must be finite"
    );
    ensure!(
        t_end - t_start >= EXPIRY_TOLERANCE,
        "period end {t_end} must be after start {t_start}"
    );
    ensure!(period > 0.0, "period length must be positive, got {period}");

    let mut boundaries = vec![t_end];
    let mut k = 1.0;
    loop {
        let t = t_end - k * period;
        if t <= t_start + EXPIRY_TOLERANCE {
            break;
        }
        boundaries.push(t);
        k += 1.0;
    }
    boundaries.push(t_start);
    boundaries.reverse();
    Ok(boundaries.windows(2).map(|w| (w[0], w[1])).collect())
}

// ── Fixed leg ─────────────────────────────────────────────────────────────────

/// One fixed-rate coupon period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPayment {
    /// Start of the accrual period.
    pub accrual_start: Time,
    /// End of the accrual period.
    pub accrual_end: Time,
    /// Payment time.
    pub payment_time: Time,
    /// Notional the coupon accrues on.
    pub notional: Real,
    /// Accrual year fraction.
    pub year_fraction: Real,
}

/// A fixed-rate leg. The rate lives on the instrument, so the leg only
/// knows notionals and year fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLeg {
    payments: Vec<FixedPayment>,
}

impl FixedLeg {
    /// Create a leg from payments ordered by payment time.
    pub fn new(payments: Vec<FixedPayment>) -> Result<Self> {
        ensure!(!payments.is_empty(), "fixed leg needs at least one payment");
        ensure!(
            payments
                .windows(2)
                .all(|w| w[1].payment_time > w[0].payment_time),
            "fixed leg payment times must be strictly increasing"
        );
        Ok(Self { payments })
    }

    /// Equally spaced periods on a constant notional, paid at period end,
    /// with the period length as year fraction.
    pub fn regular(t_start: Time, t_end: Time, period: Time, notional: Real) -> Result<Self> {
        let payments = regular_periods(t_start, t_end, period)?
            .into_iter()
            .map(|(s, e)| FixedPayment {
                accrual_start: s,
                accrual_end: e,
                payment_time: e,
                notional,
                year_fraction: e - s,
            })
            .collect();
        Self::new(payments)
    }

    /// The payments.
    pub fn payments(&self) -> &[FixedPayment] {
        &self.payments
    }

    /// `Σ notional · year_fraction · P(t_pmt)` over future payments.
    pub fn annuity(&self, disc: &dyn DiscountCurve) -> Real {
        self.payments
            .iter()
            .filter(|p| p.payment_time > 0.0)
            .map(|p| p.notional * p.year_fraction * disc.discount(p.payment_time))
            .sum()
    }
}

// ── Floating leg ──────────────────────────────────────────────────────────────

/// One floating-rate coupon period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPayment {
    /// Start of the accrual (and fixing) period.
    pub accrual_start: Time,
    /// End of the accrual period.
    pub accrual_end: Time,
    /// Payment time.
    pub payment_time: Time,
    /// Notional.
    pub notional: Real,
    /// Accrual year fraction.
    pub year_fraction: Real,
    /// Spread over the projected rate.
    pub spread: Spread,
}

/// A floating-rate leg projected off a forward curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLeg {
    payments: Vec<FloatPayment>,
}

impl FloatLeg {
    /// Create a leg from payments ordered by payment time.
    pub fn new(payments: Vec<FloatPayment>) -> Result<Self> {
        ensure!(!payments.is_empty(), "float leg needs at least one payment");
        ensure!(
            payments
                .windows(2)
                .all(|w| w[1].payment_time > w[0].payment_time),
            "float leg payment times must be strictly increasing"
        );
        Ok(Self { payments })
    }

    /// Equally spaced periods on a constant notional and spread.
    pub fn regular(
        t_start: Time,
        t_end: Time,
        period: Time,
        notional: Real,
        spread: Spread,
    ) -> Result<Self> {
        let payments = regular_periods(t_start, t_end, period)?
            .into_iter()
            .map(|(s, e)| FloatPayment {
                accrual_start: s,
                accrual_end: e,
                payment_time: e,
                notional,
                year_fraction: e - s,
                spread,
            })
            .collect();
        Self::new(payments)
    }

    /// The payments.
    pub fn payments(&self) -> &[FloatPayment] {
        &self.payments
    }

    /// Present value of the future coupons, projected on `fwd` and
    /// discounted on `disc`.
    pub fn value_with_curves(&self, disc: &dyn DiscountCurve, fwd: &dyn DiscountCurve) -> Real {
        self.payments
            .iter()
            .filter(|p| p.payment_time > 0.0)
            .map(|p| {
                let amount = fwd.forward_amount(p.accrual_start, p.accrual_end)
                    + p.spread * p.year_fraction;
                p.notional * amount * disc.discount(p.payment_time)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use vl_termstructures::FlatCurve;

    #[test]
    fn periods_roll_back_from_end() {
        let p = regular_periods(0.5, 3.0, 1.0).unwrap();
        assert_eq!(p.len(), 3);
        assert_abs_diff_eq!(p[0].0, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(p[0].1, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p[2].1, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn periods_exact_fit_has_no_stub() {
        let p = regular_periods(1.0, 6.0, 0.5).unwrap();
        assert_eq!(p.len(), 10);
        assert!(p.iter().all(|(s, e)| (e - s - 0.5).abs() < 1e-12));
    }

    #[test]
    fn periods_reject_bad_input() {
        assert!(regular_periods(2.0, 1.0, 1.0).is_err());
        assert!(regular_periods(0.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn annuity_on_flat_curve() {
        let disc = FlatCurve::new(0.0).unwrap();
        let leg = FixedLeg::regular(1.0, 6.0, 1.0, 100.0).unwrap();
        assert_abs_diff_eq!(leg.annuity(&disc), 500.0, epsilon = 1e-10);
    }

    #[test]
    fn float_leg_single_curve_is_par() {
        // on a single curve the float leg is worth P(start) - P(end) per unit
        let curve = FlatCurve::new(0.02).unwrap();
        let leg = FloatLeg::regular(2.0, 7.0, 0.5, 1.0, 0.0).unwrap();
        let pv = leg.value_with_curves(&curve, &curve);
        assert_abs_diff_eq!(pv, curve.discount(2.0) - curve.discount(7.0), epsilon = 1e-12);
    }

    #[test]
    fn float_leg_spread_adds_annuity() {
        let curve = FlatCurve::new(0.02).unwrap();
        let plain = FloatLeg::regular(1.0, 3.0, 1.0, 1.0, 0.0).unwrap();
        let spread = FloatLeg::regular(1.0, 3.0, 1.0, 1.0, 0.01).unwrap();
        let annuity = FixedLeg::regular(1.0, 3.0, 1.0, 1.0).unwrap().annuity(&curve);
        let diff =
            spread.value_with_curves(&curve, &curve) - plain.value_with_curves(&curve, &curve);
        assert_abs_diff_eq!(diff, 0.01 * annuity, epsilon = 1e-14);
    }

    #[test]
    fn past_payments_are_ignored() {
        let disc = FlatCurve::new(0.0).unwrap();
        let leg = FixedLeg::regular(-2.0, 2.0, 1.0, 1.0).unwrap();
        assert_abs_diff_eq!(leg.annuity(&disc), 2.0, epsilon = 1e-12);
    }
}
