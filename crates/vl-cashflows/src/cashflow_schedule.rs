//! `CashFlowSchedule` — the underlying cash flows of a callable instrument.
//!
//! Row `i` holds a payment time, the total amount paid (interest plus
//! redemption), optionally the interest part, and the principal that would
//! be redeemed if the holder exercised immediately before that payment.

use vl_core::{ensure, errors::Result, Rate, Real, Time};
use vl_math::find_root_secant;
use vl_termstructures::{spreaded_discount, DiscountCurve};

use crate::legs::regular_periods;

/// Payment schedule with per-row redemption principal.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSchedule {
    t_pmt: Vec<Time>,
    pmt_total: Vec<Real>,
    pmt_interest: Option<Vec<Real>>,
    current_principal: Vec<Real>,
}

impl CashFlowSchedule {
    /// Create a schedule.
    ///
    /// All vectors must share one length, payment times must be
    /// strictly increasing and every amount finite.
    pub fn new(
        t_pmt: Vec<Time>,
        pmt_total: Vec<Real>,
        pmt_interest: Option<Vec<Real>>,
        current_principal: Vec<Real>,
    ) -> Result<Self> {
        let n = t_pmt.len();
        ensure!(n > 0, "cash flow schedule must not be empty");
        ensure!(
            pmt_total.len() == n && current_principal.len() == n,
            "cash flow vectors must have equal length ({n} times, {} totals, {} principals)",
            pmt_total.len(),
            current_principal.len()
        );
        if let Some(interest) = &pmt_interest {
            ensure!(
                interest.len() == n,
                "interest vector has length {}, expected {n}",
                interest.len()
            );
            ensure!(
                interest.iter().all(|v| v.is_finite()),
                "interest amounts must be finite"
            );
        }
        ensure!(
            t_pmt.iter().all(|t| t.is_finite()),
            "payment times must be finite"
        );
        ensure!(
            t_pmt.windows(2).all(|w| w[1] > w[0]),
            "payment times must be strictly increasing"
        );
        ensure!(
            pmt_total.iter().chain(&current_principal).all(|v| v.is_finite()),
            "payment amounts must be finite"
        );
        Ok(Self {
            t_pmt,
            pmt_total,
            pmt_interest,
            current_principal,
        })
    }

    /// Fixed-rate bullet or linearly amortizing bond.
    ///
    /// Row 0 sits at `t_start` with no payment and the full notional
    /// outstanding. Coupons follow on [`regular_periods`]. With `amortizing`
    /// the notional is redeemed in equal parts on every coupon date,
    /// otherwise in full at maturity.
    pub fn fixed_rate_bond(
        t_start: Time,
        t_maturity: Time,
        period: Time,
        notional: Real,
        rate: Rate,
        amortizing: bool,
    ) -> Result<Self> {
        ensure!(notional.is_finite(), "notional must be finite");
        ensure!(rate.is_finite(), "coupon rate must be finite");
        let periods = regular_periods(t_start, t_maturity, period)?;
        let n = periods.len();

        let mut t_pmt = Vec::with_capacity(n + 1);
        let mut total = Vec::with_capacity(n + 1);
        let mut interest = Vec::with_capacity(n + 1);
        let mut principal = Vec::with_capacity(n + 1);
        t_pmt.push(t_start);
        total.push(0.0);
        interest.push(0.0);
        principal.push(notional);

        let mut outstanding = notional;
        for (k, (s, e)) in periods.into_iter().enumerate() {
            let coupon = outstanding * rate * (e - s);
            let redemption = if k + 1 == n {
                outstanding
            } else if amortizing {
                notional / n as Real
            } else {
                0.0
            };
            t_pmt.push(e);
            total.push(coupon + redemption);
            interest.push(coupon);
            principal.push(outstanding);
            outstanding -= redemption;
        }
        Self::new(t_pmt, total, Some(interest), principal)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Payment times.
    pub fn times(&self) -> &[Time] {
        &self.t_pmt
    }

    /// Total payment amounts.
    pub fn totals(&self) -> &[Real] {
        &self.pmt_total
    }

    /// Interest parts, if known.
    pub fn interest(&self) -> Option<&[Real]> {
        self.pmt_interest.as_deref()
    }

    /// Principal redeemed on exercise immediately before each payment.
    pub fn principal(&self) -> &[Real] {
        &self.current_principal
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.t_pmt.len()
    }

    /// Always false for a constructed schedule.
    pub fn is_empty(&self) -> bool {
        self.t_pmt.is_empty()
    }

    /// Index of the first payment strictly after `t`, or `len()` if none.
    pub fn first_after(&self, t: Time) -> usize {
        self.t_pmt.partition_point(|&tp| tp <= t)
    }

    /// Principal outstanding at `t`: the redemption amount of the next
    /// payment, or zero once the schedule has run off.
    pub fn balance(&self, t: Time) -> Real {
        self.current_principal
            .get(self.first_after(t))
            .copied()
            .unwrap_or(0.0)
    }

    /// Time of the last row with nonzero principal.
    pub fn last_principal_time(&self) -> Option<Time> {
        self.current_principal
            .iter()
            .rposition(|&p| p != 0.0)
            .map(|i| self.t_pmt[i])
    }

    // ── Valuation ─────────────────────────────────────────────────────────

    /// Present value of the payments after `settlement`.
    ///
    /// The zero rates of `disc` and the optional `spread` curve and the
    /// `residual` spread are summed and compounded annually.
    pub fn present_value(
        &self,
        disc: &dyn DiscountCurve,
        spread: Option<&dyn DiscountCurve>,
        residual: Rate,
        settlement: Time,
    ) -> Real {
        let start = self.first_after(settlement);
        self.t_pmt[start..]
            .iter()
            .zip(&self.pmt_total[start..])
            .map(|(&t, &amount)| amount * spreaded_discount(disc, spread, residual, t))
            .sum()
    }

    /// Annually compounded internal rate of return of the payments after
    /// `settlement`, given a price `payment_on_settlement` (negative for a
    /// purchase) paid at `settlement`.
    ///
    /// # Errors
    /// [`vl_core::Error::RootFinding`] if the secant search does not converge.
    pub fn irr(&self, settlement: Time, payment_on_settlement: Real) -> Result<Rate> {
        let start = self.first_after(settlement);
        let value = |x: Rate| {
            let future: Real = self.t_pmt[start..]
                .iter()
                .zip(&self.pmt_total[start..])
                .map(|(&t, &amount)| amount * (1.0 + x).powf(-t))
                .sum();
            future + payment_on_settlement * (1.0 + x).powf(-settlement)
        };
        find_root_secant(value, 0.0, 0.0001, 0, 0.0)
    }
}
