//! Calibration of the variance grid to a basket of swaptions.
//!
//! Each non-expired basket element contributes one grid point. Its swap is
//! reduced to a single-curve fixed cash-flow stream, an initial variance is
//! taken from Hagan's approximation, and the variance is then solved so that
//! the closed-form European price matches the market price.

use log::{debug, warn};
use vl_cashflows::{CashFlowSchedule, FixedLeg, FloatLeg};
use vl_core::{ensure, errors::Result, Rate, Real, Time, EXPIRY_TOLERANCE};
use vl_math::find_root_ridders;
use vl_termstructures::{DiscountCurve, SwaptionVolatility};

use super::{DiscountFactors, Lgm, ValuationSpreads};

/// Maximum number of times the initial guess is doubled to bracket a root.
const MAX_GUESS_DOUBLINGS: u32 = 10;

/// Ridders iteration budget per basket element.
const CALIBRATION_ITERATIONS: u32 = 20;

/// A swaption the model can be calibrated to.
pub trait CalibrationInstrument {
    /// Time of the first (and only) exercise.
    fn first_exercise_time(&self) -> Time;

    /// Fixed rate of the underlying swap.
    fn fixed_rate(&self) -> Rate;

    /// Fixed leg of the underlying swap.
    fn fixed_leg(&self) -> &FixedLeg;

    /// Floating leg of the underlying swap.
    fn float_leg(&self) -> &FloatLeg;

    /// Fixed-leg annuity.
    fn annuity(&self, disc: &dyn DiscountCurve) -> Real {
        self.fixed_leg().annuity(disc)
    }

    /// Normal-model standard deviation of the swap rate at expiry.
    fn std_dev(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<Real>;

    /// Market price.
    fn value_with_curves(
        &self,
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<Real>;
}

/// The receiver swap of `instrument` as a fixed cash-flow stream valued on
/// `disc` alone.
///
/// The basis between `disc` and `fwd` is folded into the fixed rate:
/// `rate + (PV_float(disc, fwd) − PV_float(disc, disc)) / annuity`.
/// Row 0 pays the notional at the start of the first period; the last row
/// receives it back.
pub fn swaption_adjusted_cash_flows<I: CalibrationInstrument + ?Sized>(
    instrument: &I,
    disc: &dyn DiscountCurve,
    fwd: &dyn DiscountCurve,
) -> Result<CashFlowSchedule> {
    let fixed = instrument.fixed_leg();
    let float = instrument.float_leg();
    let payments = fixed.payments();
    ensure!(!payments.is_empty(), "swaption fixed leg has no payments");

    let mut rate = instrument.fixed_rate();
    let annuity = fixed.annuity(disc);
    if annuity != 0.0 {
        rate +=
            (float.value_with_curves(disc, fwd) - float.value_with_curves(disc, disc)) / annuity;
    }

    let n = payments.len() + 1;
    let mut t_pmt = Vec::with_capacity(n);
    let mut total = Vec::with_capacity(n);
    let mut interest = Vec::with_capacity(n);
    let mut principal = Vec::with_capacity(n);

    let first = payments[0];
    t_pmt.push(first.accrual_start);
    total.push(-first.notional);
    interest.push(0.0);
    principal.push(0.0);
    for p in payments {
        let coupon = p.notional * p.year_fraction * rate;
        t_pmt.push(p.payment_time);
        total.push(coupon);
        interest.push(coupon);
        principal.push(p.notional);
    }
    total[n - 1] += principal[n - 1];

    CashFlowSchedule::new(t_pmt, total, Some(interest), principal)
}

/// Pricing error of the closed-form European price at a given variance.
struct CalibrationTarget<'a> {
    model: &'a Lgm,
    cf: &'a CashFlowSchedule,
    t_ex: Time,
    disc: &'a dyn DiscountCurve,
    dfs: &'a DiscountFactors,
    target: Real,
}

impl CalibrationTarget<'_> {
    fn residual(&self, xi: Real) -> Real {
        let spreads = ValuationSpreads::default();
        self.model
            .european_call(self.cf, self.t_ex, self.disc, xi, &spreads, Some(self.dfs))
            - self.target
    }
}

impl Lgm {
    /// Fit the variance grid to `basket`.
    ///
    /// Elements expiring within a 512th of a year are skipped, so the grid
    /// has one point per remaining element. Quotes above the attainable
    /// maximum are clamped, failed root searches fall back to the better of
    /// the initial guess and zero, and the resulting variances are made
    /// non-decreasing.
    ///
    /// # Errors
    /// [`vl_core::Error::InvalidParameter`] if the remaining exercise times
    /// are not strictly increasing or a swaption cannot be reduced to a
    /// cash-flow stream. The current grid is kept on error.
    pub fn calibrate<I: CalibrationInstrument>(
        &mut self,
        basket: &[I],
        disc: &dyn DiscountCurve,
        fwd: &dyn DiscountCurve,
        surface: &dyn SwaptionVolatility,
    ) -> Result<()> {
        let mut t_grid: Vec<Time> = Vec::with_capacity(basket.len());
        let mut xi_grid: Vec<Real> = Vec::with_capacity(basket.len());
        let plain = ValuationSpreads::default();

        for (i, instrument) in basket.iter().enumerate() {
            let t_ex = instrument.first_exercise_time();
            if !(t_ex > EXPIRY_TOLERANCE) {
                debug!("basket element {i} expired (t = {t_ex}), skipped");
                continue;
            }
            if let Some(&previous) = t_grid.last() {
                ensure!(
                    t_ex > previous,
                    "basket exercise times must be strictly increasing, got {t_ex} after {previous}"
                );
            }

            let cf = swaption_adjusted_cash_flows(instrument, disc, fwd)?;
            let dfs = DiscountFactors::new(&cf, t_ex, disc, &plain);

            // Hagan's approximation for the variance
            let denominator: Real = cf
                .times()
                .iter()
                .zip(cf.totals())
                .enumerate()
                .map(|(k, (&t, &amount))| amount * dfs.at(k) * self.shape.h(t))
                .sum();
            let std_dev = instrument.std_dev(disc, fwd, surface)?;
            let mut target = instrument.value_with_curves(disc, fwd, surface)?;
            let mut guess = (std_dev * instrument.annuity(disc) / denominator).powi(2);
            if !guess.is_finite() {
                guess = 0.0;
            }

            // feasible prices lie between the intrinsic value and the value
            // without the final redemption
            let intrinsic = self.dcf_at(&cf, t_ex, &dfs, 0.0, 0.0, 0.0);
            let notional = instrument
                .fixed_leg()
                .payments()
                .first()
                .map_or(0.0, |p| p.notional);
            let max_value = intrinsic + notional * dfs.exercise();
            let min_value = intrinsic.max(0.0);
            let accuracy = 1.0e-7 * target + 1.0e-7;

            let mut xi = guess;
            if target <= min_value + accuracy || guess == 0.0 {
                xi = 0.0;
            } else {
                if target > max_value {
                    warn!(
                        "basket element {i}: price {target} above attainable maximum \
                         {max_value}, clamped"
                    );
                    target = max_value;
                }
                let objective = CalibrationTarget {
                    model: self,
                    cf: &cf,
                    t_ex,
                    disc,
                    dfs: &dfs,
                    target,
                };
                let mut residual = objective.residual(xi);
                let mut doublings = 0;
                while residual < 0.0 && doublings < MAX_GUESS_DOUBLINGS {
                    xi *= 2.0;
                    residual = objective.residual(xi);
                    doublings += 1;
                }
                match find_root_ridders(
                    |v| objective.residual(v),
                    0.0,
                    xi,
                    CALIBRATION_ITERATIONS,
                    accuracy,
                ) {
                    Ok(root) => xi = root,
                    Err(e) => {
                        if (target - min_value).abs() < residual.abs() {
                            xi = 0.0;
                        }
                        warn!("basket element {i}: {e}, falling back to xi = {xi}");
                    }
                }
            }

            if let Some(&previous) = xi_grid.last() {
                if previous > xi {
                    warn!(
                        "basket element {i}: xi = {xi} below previous {previous}, clamped"
                    );
                    xi = previous;
                }
            }
            debug!("basket element {i}: t = {t_ex}, guess = {guess}, xi = {xi}");
            t_grid.push(t_ex);
            xi_grid.push(xi);
        }

        self.t_ex = t_grid;
        self.xi = xi_grid;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use vl_termstructures::FlatCurve;

    /// A receiver swaption priced at a fixed market value.
    struct Quoted {
        t_ex: Time,
        rate: Rate,
        fixed: FixedLeg,
        float: FloatLeg,
        price: Real,
        vol: Real,
    }

    impl Quoted {
        fn new(t_ex: Time, maturity: Time, rate: Rate, price: Real) -> Self {
            Self {
                t_ex,
                rate,
                fixed: FixedLeg::regular(t_ex, maturity, 1.0, 1.0).unwrap(),
                float: FloatLeg::regular(t_ex, maturity, 0.5, 1.0, 0.0).unwrap(),
                price,
                vol: 0.01,
            }
        }

        /// Quote a volatility inconsistent with the price.
        fn with_vol(mut self, vol: Real) -> Self {
            self.vol = vol;
            self
        }
    }

    impl CalibrationInstrument for Quoted {
        fn first_exercise_time(&self) -> Time {
            self.t_ex
        }
        fn fixed_rate(&self) -> Rate {
            self.rate
        }
        fn fixed_leg(&self) -> &FixedLeg {
            &self.fixed
        }
        fn float_leg(&self) -> &FloatLeg {
            &self.float
        }
        fn std_dev(
            &self,
            _: &dyn DiscountCurve,
            _: &dyn DiscountCurve,
            _: &dyn SwaptionVolatility,
        ) -> Result<Real> {
            Ok(self.vol * self.t_ex.sqrt())
        }
        fn value_with_curves(
            &self,
            _: &dyn DiscountCurve,
            _: &dyn DiscountCurve,
            _: &dyn SwaptionVolatility,
        ) -> Result<Real> {
            Ok(self.price)
        }
    }

    fn surface() -> vl_termstructures::FlatSwaptionVolatility {
        vl_termstructures::FlatSwaptionVolatility::new(0.01).unwrap()
    }

    #[test]
    fn adjusted_cash_flows_single_curve() {
        let curve = FlatCurve::new(0.02).unwrap();
        let q = Quoted::new(2.0, 5.0, 0.03, 0.0);
        let cf = swaption_adjusted_cash_flows(&q, &curve, &curve).unwrap();
        assert_eq!(cf.times(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(cf.principal(), &[0.0, 1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(cf.totals()[0], -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(cf.totals()[1], 0.03, epsilon = 1e-15);
        assert_abs_diff_eq!(cf.totals()[3], 1.03, epsilon = 1e-15);
    }

    #[test]
    fn basis_moves_into_fixed_rate() {
        let disc = FlatCurve::new(0.02).unwrap();
        let fwd = FlatCurve::new(0.025).unwrap();
        let q = Quoted::new(1.0, 6.0, 0.03, 0.0);
        let cf = swaption_adjusted_cash_flows(&q, &disc, &fwd).unwrap();
        let spread = (q.float.value_with_curves(&disc, &fwd)
            - q.float.value_with_curves(&disc, &disc))
            / q.fixed.annuity(&disc);
        assert!(spread > 0.0);
        assert_abs_diff_eq!(cf.interest().unwrap()[1], 0.03 + spread, epsilon = 1e-14);
    }

    #[test]
    fn expired_elements_are_skipped() {
        let curve = FlatCurve::new(0.02).unwrap();
        let basket = vec![
            Quoted::new(0.001, 5.0, 0.02, 0.01),
            Quoted::new(1.0, 5.0, 0.02, 0.01),
        ];
        let mut lgm = Lgm::new(0.0).unwrap();
        lgm.calibrate(&basket, &curve, &curve, &surface()).unwrap();
        assert_eq!(lgm.t_ex(), &[1.0]);
        assert_eq!(lgm.xi().len(), 1);
        assert!(lgm.xi()[0] > 0.0);
    }

    #[test]
    fn price_at_floor_gives_zero_variance() {
        let curve = FlatCurve::new(0.02).unwrap();
        let basket = vec![Quoted::new(2.0, 7.0, 0.02, 0.0)];
        let mut lgm = Lgm::new(0.01).unwrap();
        lgm.calibrate(&basket, &curve, &curve, &surface()).unwrap();
        assert_eq!(lgm.xi(), &[0.0]);
    }

    #[test]
    fn decreasing_variance_is_clamped() {
        let curve = FlatCurve::new(0.02).unwrap();
        // the later swaption is quoted far too cheap
        let basket = vec![
            Quoted::new(1.0, 6.0, 0.02, 0.02),
            Quoted::new(2.0, 6.0, 0.02, 0.001),
        ];
        let mut lgm = Lgm::new(0.0).unwrap();
        lgm.calibrate(&basket, &curve, &curve, &surface()).unwrap();
        assert_eq!(lgm.xi().len(), 2);
        assert_eq!(lgm.xi()[1], lgm.xi()[0]);
    }

    #[test]
    fn unordered_basket_is_rejected() {
        let curve = FlatCurve::new(0.02).unwrap();
        let basket = vec![
            Quoted::new(3.0, 6.0, 0.02, 0.01),
            Quoted::new(2.0, 6.0, 0.02, 0.01),
        ];
        let mut lgm = Lgm::new(0.0).unwrap();
        lgm.set_times_and_constant_volatility(&[1.0], 0.01).unwrap();
        assert!(lgm.calibrate(&basket, &curve, &curve, &surface()).is_err());
        assert_eq!(lgm.t_ex(), &[1.0]);
    }

    #[test]
    fn unbracketed_target_keeps_last_guess() {
        let curve = FlatCurve::new(0.02).unwrap();
        let consistent = vec![Quoted::new(2.0, 7.0, 0.02, 0.02)];
        let mut reference = Lgm::new(0.0).unwrap();
        reference.calibrate(&consistent, &curve, &curve, &surface()).unwrap();

        // a tiny quoted volatility starts the search far below the root,
        // out of reach of the bracket doublings
        let basket = vec![Quoted::new(2.0, 7.0, 0.02, 0.02).with_vol(1e-6)];
        let mut lgm = Lgm::new(0.0).unwrap();
        lgm.calibrate(&basket, &curve, &curve, &surface()).unwrap();
        let xi = lgm.xi()[0];
        assert!(xi.is_finite() && xi > 0.0);
        assert!(xi < 1e-3 * reference.xi()[0], "{xi} vs {}", reference.xi()[0]);

        let cf = swaption_adjusted_cash_flows(&basket[0], &curve, &curve).unwrap();
        let plain = ValuationSpreads::default();
        let price = lgm.european_call(&cf, 2.0, &curve, xi, &plain, None);
        assert!(price < 0.02);
        let calibrated =
            reference.european_call(&cf, 2.0, &curve, reference.xi()[0], &plain, None);
        assert_abs_diff_eq!(calibrated, 0.02, epsilon = 1e-6);
    }
}
