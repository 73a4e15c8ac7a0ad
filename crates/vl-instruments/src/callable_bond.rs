//! Fixed-rate bond callable by the issuer at par plus accrued interest.
//!
//! The issuer's call is an option on the bond's remaining cash flows, so
//! the bond is worth its straight value minus the call. The call is
//! valued in the LGM model. A bond on a constant notional is calibrated to
//! co-terminal receiver swaptions struck at the coupon net of the
//! opportunity spread and any margin excluded from valuation. An
//! amortizing bond is calibrated to the equivalent regular swaption at
//! each call unless simple calibration is requested.

use vl_cashflows::CashFlowSchedule;
use vl_core::{ensure, errors::Result, Rate, Real, Spread, Time, Volatility, EXPIRY_TOLERANCE};
use vl_models::CalibrationInstrument;

use crate::equivalent::equivalent_regular_swaption;
use crate::instrument::Instrument;
use crate::swaption::RegularSwaption;

/// Fixed period of the calibration swaptions, in years.
const BASKET_FIXED_PERIOD: Time = 1.0;

/// Floating period of the calibration swaptions, in years.
const BASKET_FLOAT_PERIOD: Time = 0.5;

/// Call times from `first_call` every `call_period` years, strictly before
/// `maturity`. Without a period the bond is callable once.
pub fn call_schedule(
    first_call: Time,
    maturity: Time,
    call_period: Option<Time>,
) -> Result<Vec<Time>> {
    ensure!(
        first_call.is_finite() && maturity.is_finite(),
        "call schedule bounds must be finite"
    );
    ensure!(
        first_call < maturity,
        "first call {first_call} must be before maturity {maturity}"
    );
    let Some(period) = call_period else {
        return Ok(vec![first_call]);
    };
    ensure!(period > 0.0, "call period must be positive, got {period}");

    let mut times = Vec::new();
    let mut k = 0.0;
    loop {
        let t = first_call + k * period;
        if t > maturity - EXPIRY_TOLERANCE {
            break;
        }
        times.push(t);
        k += 1.0;
    }
    Ok(times)
}

/// A callable fixed-rate bond.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableBond {
    cash_flows: CashFlowSchedule,
    coupon: Rate,
    call_times: Vec<Time>,
    mean_reversion: Real,
    hull_white_volatility: Option<Volatility>,
    opportunity_spread: Spread,
    excluded_margin: Spread,
    residual_spread: Spread,
    exclude_base: bool,
    simple_calibration: bool,
}

impl CallableBond {
    /// Callable bond on `cash_flows` paying `coupon`, callable at
    /// `call_times`.
    ///
    /// Row 0 of the schedule is the issue. Call times at or after the last
    /// row carrying principal are dropped, since nothing is left to call.
    pub fn new(cash_flows: CashFlowSchedule, coupon: Rate, call_times: Vec<Time>) -> Result<Self> {
        ensure!(coupon.is_finite(), "coupon must be finite");
        ensure!(!call_times.is_empty(), "at least one call time is required");
        ensure!(
            call_times.iter().all(|t| t.is_finite()) && call_times.windows(2).all(|w| w[1] > w[0]),
            "call times must be finite and strictly increasing"
        );
        let issue = cash_flows.times()[0];
        ensure!(
            call_times[0] > issue,
            "first call {} must be after issue {issue}",
            call_times[0]
        );

        let mut call_times = call_times;
        match cash_flows.last_principal_time() {
            Some(last) => call_times.retain(|&t| t < last),
            None => call_times.clear(),
        }

        Ok(Self {
            cash_flows,
            coupon,
            call_times,
            mean_reversion: 0.0,
            hull_white_volatility: None,
            opportunity_spread: 0.0,
            excluded_margin: 0.0,
            residual_spread: 0.0,
            exclude_base: false,
            simple_calibration: false,
        })
    }

    /// Regular fixed-rate bond from `t_issue` to `t_maturity`, callable
    /// from `first_call` every `call_period` years (once if `None`).
    #[allow(clippy::too_many_arguments)]
    pub fn fixed_rate(
        t_issue: Time,
        t_maturity: Time,
        coupon_period: Time,
        notional: Real,
        coupon: Rate,
        amortizing: bool,
        first_call: Time,
        call_period: Option<Time>,
    ) -> Result<Self> {
        let cash_flows = CashFlowSchedule::fixed_rate_bond(
            t_issue,
            t_maturity,
            coupon_period,
            notional,
            coupon,
            amortizing,
        )?;
        Self::new(
            cash_flows,
            coupon,
            call_schedule(first_call, t_maturity, call_period)?,
        )
    }

    // ── Model and valuation settings ─────────────────────────────────────

    /// LGM mean reversion (default 0).
    pub fn with_mean_reversion(mut self, mean_reversion: Real) -> Self {
        self.mean_reversion = mean_reversion;
        self
    }

    /// Use a constant Hull-White volatility instead of calibrating.
    pub fn with_hull_white_volatility(mut self, sigma: Volatility) -> Self {
        self.hull_white_volatility = Some(sigma);
        self
    }

    /// Spread the issuer forgoes on principal redeemed by calling.
    pub fn with_opportunity_spread(mut self, spread: Spread) -> Self {
        self.opportunity_spread = spread;
        self
    }

    /// Part of the coupon not reflected in the calibration strike.
    pub fn with_excluded_margin(mut self, margin: Spread) -> Self {
        self.excluded_margin = margin;
        self
    }

    /// Constant spread over the discount curve.
    pub fn with_residual_spread(mut self, spread: Spread) -> Self {
        self.residual_spread = spread;
        self
    }

    /// Report only the (negative) call value, without the straight bond.
    pub fn excluding_base(mut self) -> Self {
        self.exclude_base = true;
        self
    }

    /// Calibrate to co-terminal swaptions on the initial notional even when
    /// the bond amortizes.
    pub fn with_simple_calibration(mut self) -> Self {
        self.simple_calibration = true;
        self
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// Underlying cash flows.
    pub fn cash_flows(&self) -> &CashFlowSchedule {
        &self.cash_flows
    }

    /// Coupon rate.
    pub fn coupon(&self) -> Rate {
        self.coupon
    }

    /// Call times after truncation.
    pub fn call_times(&self) -> &[Time] {
        &self.call_times
    }

    /// Call times that have not yet passed.
    pub fn exercise_times(&self) -> Vec<Time> {
        self.call_times
            .iter()
            .copied()
            .filter(|&t| t > EXPIRY_TOLERANCE)
            .collect()
    }

    /// LGM mean reversion.
    pub fn mean_reversion(&self) -> Real {
        self.mean_reversion
    }

    /// Constant Hull-White volatility, if set.
    pub fn hull_white_volatility(&self) -> Option<Volatility> {
        self.hull_white_volatility
    }

    /// Opportunity spread.
    pub fn opportunity_spread(&self) -> Spread {
        self.opportunity_spread
    }

    /// Residual spread.
    pub fn residual_spread(&self) -> Spread {
        self.residual_spread
    }

    /// Whether the straight bond value is left out of the NPV.
    pub fn excludes_base(&self) -> bool {
        self.exclude_base
    }

    /// Strike of the calibration swaptions.
    pub fn basket_strike(&self) -> Rate {
        self.coupon - self.opportunity_spread - self.excluded_margin
    }

    /// Notional before any redemption: the first non-zero principal.
    pub fn face_notional(&self) -> Real {
        self.cash_flows
            .principal()
            .iter()
            .copied()
            .find(|&p| p != 0.0)
            .unwrap_or(0.0)
    }

    /// Whether every non-zero principal row carries the same amount.
    pub fn has_constant_notional(&self) -> bool {
        let face = self.face_notional();
        self.cash_flows
            .principal()
            .iter()
            .all(|&p| p == 0.0 || p == face)
    }

    /// Calibration swaptions, one per call time.
    ///
    /// With a constant notional, or with simple calibration, these are
    /// co-terminal receivers on the face notional struck at
    /// [`basket_strike`](Self::basket_strike); calls within a 512th of a
    /// year of maturity are skipped. Otherwise each is the
    /// [equivalent regular swaption](equivalent_regular_swaption) of the
    /// remaining cash flows, struck at their rate of return net of the
    /// opportunity spread.
    pub fn basket(&self) -> Result<Vec<RegularSwaption>> {
        if self.simple_calibration || self.has_constant_notional() {
            let maturity = self.maturity();
            return self
                .call_times
                .iter()
                .filter(|&&t| maturity - t >= EXPIRY_TOLERANCE)
                .map(|&t| {
                    RegularSwaption::new(
                        t,
                        maturity,
                        self.face_notional(),
                        self.basket_strike(),
                        BASKET_FIXED_PERIOD,
                        BASKET_FLOAT_PERIOD,
                        0.0,
                    )
                })
                .collect();
        }
        self.call_times
            .iter()
            .map(|&t| {
                let swaption = equivalent_regular_swaption(
                    &self.cash_flows,
                    t,
                    BASKET_FIXED_PERIOD,
                    BASKET_FLOAT_PERIOD,
                )?;
                let strike = swaption.fixed_rate() - self.opportunity_spread;
                Ok(swaption.with_fixed_rate(strike))
            })
            .collect()
    }
}

impl Instrument for CallableBond {
    fn maturity(&self) -> Time {
        let times = self.cash_flows.times();
        times[times.len() - 1]
    }
}
