//! Regular European swaption on a fixed-for-floating swap.
//!
//! Priced with the Bachelier model on the fair swap rate: a receiver
//! swaption is a put on the swap rate scaled by the fixed-leg annuity, a
//! payer (negative annuity, i.e. negative notional) a call.

use vl_cashflows::{FixedLeg, FloatLeg};
use vl_core::{ensure, errors::Result, Rate, Real, Spread, Time, Volatility, EXPIRY_TOLERANCE};
use vl_models::{BachelierModel, CalibrationInstrument};
use vl_termstructures::{DiscountCurve, SwaptionVolatility};

use crate::instrument::Instrument;

/// European option to enter a swap receiving `fixed_rate` at
/// `first_exercise`, running until `maturity`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSwaption {
    first_exercise: Time,
    maturity: Time,
    fixed_rate: Rate,
    fixed_leg: FixedLeg,
    float_leg: FloatLeg,
}

impl RegularSwaption {
    /// Swaption on a swap starting at expiry with regular fixed and floating
    /// periods on a constant notional.
    pub fn new(
        first_exercise: Time,
        maturity: Time,
        notional: Real,
        fixed_rate: Rate,
        fixed_period: Time,
        float_period: Time,
        float_spread: Spread,
    ) -> Result<Self> {
        ensure!(notional.is_finite(), "notional must be finite");
        let fixed_leg = FixedLeg::regular(first_exercise, maturity, fixed_period, notional)?;
        let float_leg =
            FloatLeg::regular(first_exercise, maturity, float_period, notional, float_spread)?;
        Self::from_legs(first_exercise, maturity, fixed_rate, fixed_leg, float_leg)
    }

    /// Swaption on explicitly given legs.
    pub fn from_legs(
        first_exercise: Time,
        maturity: Time,
        fixed_rate: Rate,
        fixed_leg: FixedLeg,
        float_leg: FloatLeg,
    ) -> Result<Self> {
        ensure!(
            first_exercise.is_finite() && maturity.is_finite(),
            "swaption times must be finite"
        );
        ensure!(
            maturity > first_exercise,
            "swaption maturity {maturity} must be after first exercise {first_exercise}"
        );
        ensure!(fixed_rate.is_finite(), "fixed rate must be finite");
        Ok(Self {
            first_exercise,
            maturity,
            fixed_rate,
            fixed_leg,
            float_leg,
        })
    }

    /// The same swaption struck at `fixed_rate`.
    pub fn with_fixed_rate(mut self, fixed_rate: Rate) -> Self {
        self.fixed_rate = fixed_rate;
        self
    }

    /// Exercise time.
    pub fn first_exercise(&self) -> Time {
        self.first_exercise
    }

    /// Notional of the first fixed period.
    pub fn notional(&self) -> Real {
        self.fixed_leg.payments().first().map_or(0.0, |p| p.notional)
    }

    /// Length of the underlying swap.
    pub fn term(&self) -> Time {
        self.maturity - self.first_exercise
    }

    /// Fixed-leg annuity.
    pub fn annuity(&self, disc: &dyn DiscountCurve) -> Real {
        self.fixed_leg.annuity(disc)
    }

    /// Fixed rate at which the swap is worth zero.
    pub fn fair_rate(&self, disc: &dyn DiscountCurve, fwd: &dyn DiscountCurve) -> Rate {
        let annuity = self.annuity(disc);
        if annuity == 0.0 {
            return 0.0;
        }
        self.float_leg.value_with_curves(disc, fwd) / annuity
    }

    /// Normal volatility quoted for this swaption.
    pub fn volatility(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Volatility {
        surface.volatility(
            self.first_exercise,
            self.term(),
            self.fair_rate(disc, fwd),
            self.fixed_rate,
        )
    }

    fn model(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<BachelierModel> {
        BachelierModel::new(self.first_exercise, self.volatility(disc, fwd, surface))
    }
}

impl CalibrationInstrument for RegularSwaption {
    fn first_exercise_time(&self) -> Time {
        self.first_exercise
    }

    fn fixed_rate(&self) -> Rate {
        self.fixed_rate
    }

    fn fixed_leg(&self) -> &FixedLeg {
        &self.fixed_leg
    }

    fn float_leg(&self) -> &FloatLeg {
        &self.float_leg
    }

    fn std_dev(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<Real> {
        Ok(self.model(disc, fwd, surface)?.std_dev())
    }

    fn value_with_curves(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<Real> {
        if self.term() < EXPIRY_TOLERANCE {
            return Ok(0.0);
        }
        let model = self.model(disc, fwd, surface)?;
        let fair_rate = self.fair_rate(disc, fwd);
        let annuity = self.annuity(disc);
        Ok(if annuity > 0.0 {
            annuity * model.put_price(fair_rate, self.fixed_rate)
        } else {
            -annuity * model.call_price(fair_rate, self.fixed_rate)
        })
    }
}

impl Instrument for RegularSwaption {
    fn maturity(&self) -> Time {
        self.maturity
    }

    fn is_expired(&self) -> bool {
        self.first_exercise < 0.0
    }
}
