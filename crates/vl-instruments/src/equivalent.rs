//! Regular swaption equivalent to an irregular cash-flow stream.
//!
//! An amortizing or step-rate bond has no co-terminal regular swaption that
//! matches its call. The equivalent swaption instead matches the remaining
//! flows in notional (the outstanding balance), in moneyness (the internal
//! rate of return) and in forward effective duration.

use log::debug;
use vl_cashflows::CashFlowSchedule;
use vl_core::{ensure, errors::Result, Rate, Real, Time, EXPIRY_TOLERANCE};
use vl_termstructures::{DiscountCurve, FlatCurve};

use crate::swaption::RegularSwaption;

/// Rate shift for the effective duration.
const BUMP: Rate = 1.0e-4;

/// Shortest swap term, one day.
const MIN_TERM: Time = 1.0 / 365.0;

/// Longest plausible swap term.
const MAX_TERM: Time = 100.0;

/// Maximum number of term refinements.
const MAX_REFINEMENTS: usize = 10;

/// Flat curves one basis point either side of a rate, for forward effective
/// durations as of `t_ex`.
struct DurationBump {
    t_ex: Time,
    up: FlatCurve,
    down: FlatCurve,
}

impl DurationBump {
    fn new(rate: Rate, t_ex: Time) -> Result<Self> {
        Ok(Self {
            t_ex,
            up: FlatCurve::new(rate + BUMP)?,
            down: FlatCurve::new(rate - BUMP)?,
        })
    }

    /// Forward effective duration of the payments of `cf` after `t_ex`.
    fn effective_duration(&self, cf: &CashFlowSchedule) -> Real {
        let up = cf.present_value(&self.up, None, 0.0, self.t_ex) / self.up.discount(self.t_ex);
        let down =
            cf.present_value(&self.down, None, 0.0, self.t_ex) / self.down.discount(self.t_ex);
        (down - up) / (down + up) / BUMP
    }
}

/// Whole days, as a year fraction.
fn round_to_days(t: Time) -> Time {
    (t * 365.0).round() / 365.0
}

/// Receiver swaption exercisable at `t_ex` that stands in for the payments
/// of `cf` after `t_ex`.
///
/// - The notional is the balance outstanding at `t_ex`.
/// - The strike is the annually compounded internal rate of return of the
///   remaining payments against that balance, converted to simple
///   compounding over `fixed_period`. A failed search gives zero.
/// - The swap term is the maturity of a bullet bond paying the strike whose
///   forward effective duration matches that of the remaining payments
///   (at least one day), found to within a 512th of a year.
///
/// # Errors
/// [`vl_core::Error::InvalidParameter`] if nothing is outstanding at `t_ex`
/// or the periods are invalid.
pub fn equivalent_regular_swaption(
    cf: &CashFlowSchedule,
    t_ex: Time,
    fixed_period: Time,
    float_period: Time,
) -> Result<RegularSwaption> {
    let balance = cf.balance(t_ex);
    ensure!(
        balance != 0.0,
        "no principal outstanding at {t_ex}, cannot build an equivalent swaption"
    );
    ensure!(fixed_period > 0.0, "fixed period must be positive, got {fixed_period}");

    let irr = cf.irr(t_ex, -balance).unwrap_or_else(|e| {
        debug!("equivalent swaption at {t_ex}: {e}, using a zero rate of return");
        0.0
    });
    let strike = ((1.0 + irr).powf(fixed_period) - 1.0) / fixed_period;

    let bump = DurationBump::new(strike, t_ex)?;
    let target = bump.effective_duration(cf).max(MIN_TERM);
    let bullet = |term: Time| {
        CashFlowSchedule::fixed_rate_bond(
            t_ex,
            t_ex + round_to_days(term),
            fixed_period,
            balance,
            strike,
            false,
        )
    };

    let mut term = target;
    let mut duration = bump.effective_duration(&bullet(term)?);
    for _ in 0..MAX_REFINEMENTS {
        if (duration - target).abs() <= EXPIRY_TOLERANCE {
            break;
        }
        term *= target / duration;
        if !term.is_finite() || !(MIN_TERM..=MAX_TERM).contains(&term) {
            term = target;
        }
        duration = bump.effective_duration(&bullet(term)?);
    }
    debug!(
        "equivalent swaption at {t_ex}: notional {balance}, strike {strike}, term {}",
        round_to_days(term)
    );

    RegularSwaption::new(
        t_ex,
        t_ex + round_to_days(term),
        balance,
        strike,
        fixed_period,
        float_period,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use vl_models::CalibrationInstrument;

    use crate::instrument::Instrument;

    #[test]
    fn bullet_maps_to_co_terminal_swaption() {
        let cf = CashFlowSchedule::fixed_rate_bond(0.0, 10.0, 1.0, 100.0, 0.05, false).unwrap();
        let s = equivalent_regular_swaption(&cf, 2.0, 1.0, 0.5).unwrap();
        assert_eq!(s.notional(), 100.0);
        assert_abs_diff_eq!(s.fixed_rate(), 0.05, epsilon = 1e-8);
        assert!((s.maturity() - 10.0).abs() < 0.02, "maturity {}", s.maturity());
    }

    #[test]
    fn semi_annual_strike_is_simple_compounded() {
        let cf = CashFlowSchedule::fixed_rate_bond(0.0, 6.0, 1.0, 100.0, 0.04, false).unwrap();
        let s = equivalent_regular_swaption(&cf, 1.0, 0.5, 0.5).unwrap();
        assert_abs_diff_eq!(s.fixed_rate(), 2.0 * (1.04f64.sqrt() - 1.0), epsilon = 1e-8);
    }

    #[test]
    fn amortizing_flows_give_shorter_swaps() {
        let cf = CashFlowSchedule::fixed_rate_bond(0.0, 10.0, 1.0, 100.0, 0.04, true).unwrap();
        let s = equivalent_regular_swaption(&cf, 2.0, 1.0, 0.5).unwrap();
        assert_abs_diff_eq!(s.notional(), 80.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.fixed_rate(), 0.04, epsilon = 1e-8);
        assert!(s.term() > 3.0 && s.term() < 6.0, "term {}", s.term());

        let last = equivalent_regular_swaption(&cf, 9.0, 1.0, 0.5).unwrap();
        assert!((last.term() - 1.0).abs() < 0.01, "term {}", last.term());
    }

    #[test]
    fn nothing_outstanding_is_rejected() {
        let cf = CashFlowSchedule::fixed_rate_bond(0.0, 5.0, 1.0, 100.0, 0.04, false).unwrap();
        assert!(equivalent_regular_swaption(&cf, 5.0, 1.0, 0.5).is_err());
    }
}
