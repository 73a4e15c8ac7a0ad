//! Bermudan option on a cash-flow stream by backward induction.
//!
//! At each exercise date, from last to first, the state is discretized on
//! an equally spaced grid. The option value on that grid is the larger of
//! the exercise value and the continuation value, where the continuation
//! value is the Gaussian expectation of the next date's values. A final
//! integration brings the earliest grid back to state zero today.

use log::trace;
use vl_cashflows::CashFlowSchedule;
use vl_core::{ensure, errors::Result, Real, Time, EXPIRY_TOLERANCE};
use vl_math::fast_cndf;
use vl_termstructures::DiscountCurve;

use super::{DiscountFactors, IntegrationGrid, Lgm, ValuationSpreads};

/// Variance increments below this carry values over unchanged.
const MIN_VARIANCE_STEP: Real = 1.0e-12;

/// State grid and option values at one exercise date.
#[derive(Debug, Clone)]
struct Slice {
    xi: Real,
    ds: Real,
    state: Vec<Real>,
    value: Vec<Real>,
}

impl Slice {
    fn new(points: usize) -> Self {
        Self {
            xi: 0.0,
            ds: 0.0,
            state: vec![0.0; points],
            value: vec![0.0; points],
        }
    }

    /// Lay the grid out for variance `xi`.
    fn reset(&mut self, xi: Real, grid: &IntegrationGrid) {
        let std_dev = xi.sqrt();
        self.xi = xi;
        self.ds = std_dev / grid.resolution() as Real;
        let lowest = -grid.range() * std_dev;
        for (i, s) in self.state.iter_mut().enumerate() {
            *s = lowest + i as Real * self.ds;
        }
    }

    /// `value = max(hold, payoff, 0)`, then soften the kink where exercise
    /// and continuation cross between two grid points.
    fn update_value(&mut self, payoff: &[Real], hold: &[Real]) {
        let mut kink = None;
        for i in 0..self.value.len() {
            self.value[i] = hold[i].max(payoff[i]).max(0.0);
            if kink.is_none()
                && i > 0
                && (payoff[i] - hold[i]) * (payoff[i - 1] - hold[i - 1]) < 0.0
            {
                kink = Some(i);
            }
        }

        if let Some(i) = kink {
            let max_0 = self.value[i - 1];
            let max_1 = self.value[i];
            let min_0 = payoff[i - 1].min(hold[i - 1]);
            let min_1 = payoff[i].min(hold[i]);
            let cross = (max_0 - min_0) / (max_1 - min_1 + max_0 - min_0);
            let err = 0.25 * (cross * (max_1 - min_1) + (1.0 - cross) * (max_0 - min_0));
            self.value[i] -= cross * err;
            self.value[i - 1] -= (1.0 - cross) * err;
        }
    }

    /// Expected value of this slice seen from state `s` at an earlier date
    /// with variance `xi`.
    ///
    /// Each grid value is weighted by the transition probability of its
    /// cell; cells beyond `±range` standard deviations of the transition
    /// are dropped. `j` is the index of `s` on the earlier grid and is used
    /// when the variance does not grow.
    fn expectation(&self, j: usize, s: Real, xi: Real, range: Real) -> Real {
        let dxi = self.xi - xi;
        if dxi < MIN_VARIANCE_STEP {
            return self.value[j];
        }
        let n = self.value.len();
        let scale = 1.0 / dxi.sqrt();
        let step = self.ds * scale;
        let mut x = (self.state[0] - s + 0.5 * self.ds) * scale;
        let mut i = 0;
        while x < -range && i < n {
            x += step;
            i += 1;
        }

        let mut sum = 0.0;
        let mut p_lo = 0.0;
        while x < range && i < n {
            let p_hi = fast_cndf(x);
            sum += self.value[i] * (p_hi - p_lo);
            p_lo = p_hi;
            x += step;
            i += 1;
        }
        sum
    }
}

impl Lgm {
    /// Value of the option to exercise into `cf` at any of the times
    /// `t_ex`, with accumulated variance `xi` at each.
    ///
    /// Exercise times before today are dropped from the grid before the
    /// induction, so their variances never enter the result. A last exercise
    /// time within a 512th of a year of today gives the intrinsic value.
    ///
    /// # Errors
    /// [`vl_core::Error::InvalidParameter`] if the vectors are empty or of
    /// different length, the times are not strictly increasing, or a
    /// variance is negative or not finite.
    pub fn bermudan_call(
        &self,
        cf: &CashFlowSchedule,
        t_ex: &[Time],
        disc: &dyn DiscountCurve,
        xi: &[Real],
        spreads: &ValuationSpreads<'_>,
    ) -> Result<Real> {
        ensure!(!t_ex.is_empty(), "at least one exercise time is required");
        ensure!(
            t_ex.len() == xi.len(),
            "{} exercise times but {} variances",
            t_ex.len(),
            xi.len()
        );
        ensure!(
            t_ex.iter().all(|t| t.is_finite()) && t_ex.windows(2).all(|w| w[1] > w[0]),
            "exercise times must be finite and strictly increasing"
        );
        ensure!(
            xi.iter().all(|v| v.is_finite() && *v >= 0.0),
            "variances must be finite and non-negative"
        );
        Ok(self.backward_induction(cf, t_ex, disc, xi, spreads))
    }

    /// Backward induction on validated, time-ordered inputs.
    pub(crate) fn backward_induction(
        &self,
        cf: &CashFlowSchedule,
        t_ex: &[Time],
        disc: &dyn DiscountCurve,
        xi: &[Real],
        spreads: &ValuationSpreads<'_>,
    ) -> Real {
        let last = t_ex.len() - 1;
        if t_ex[last] < 0.0 {
            return 0.0;
        }
        if t_ex[last] < EXPIRY_TOLERANCE {
            return self.european_call(cf, t_ex[last], disc, 0.0, spreads, None);
        }
        let start = t_ex.partition_point(|&t| t < 0.0);

        let grid = &self.grid;
        let range = grid.range();
        let n = grid.points();
        let mut later = Slice::new(n);
        let mut current = Slice::new(n);
        let mut payoff = vec![0.0; n];
        let mut hold = vec![0.0; n];

        for k in (start..=last).rev() {
            current.reset(xi[k], grid);
            let dfs = DiscountFactors::new(cf, t_ex[k], disc, spreads);
            self.dcf_into(
                cf,
                t_ex[k],
                &dfs,
                xi[k],
                &current.state,
                spreads.opportunity_spread,
                &mut payoff,
            );
            if k == last {
                hold.fill(0.0);
            } else {
                for (j, h) in hold.iter_mut().enumerate() {
                    *h = later.expectation(j, current.state[j], current.xi, range);
                }
            }
            current.update_value(&payoff, &hold);
            trace!(
                "exercise t = {}: xi = {}, centre value {}",
                t_ex[k],
                xi[k],
                current.value[n / 2]
            );
            std::mem::swap(&mut current, &mut later);
        }

        later.expectation(0, 0.0, 0.0, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use vl_termstructures::FlatCurve;

    fn bond(rate: Real) -> CashFlowSchedule {
        CashFlowSchedule::fixed_rate_bond(0.0, 10.0, 1.0, 100.0, rate, false).unwrap()
    }

    #[test]
    fn slice_grid_layout() {
        let grid = IntegrationGrid::default();
        let mut s = Slice::new(grid.points());
        s.reset(0.0004, &grid);
        assert_abs_diff_eq!(s.state[0], -0.12, epsilon = 1e-15);
        assert_abs_diff_eq!(s.state[72], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s.state[144], 0.12, epsilon = 1e-15);
    }

    #[test]
    fn expectation_of_constant_is_constant() {
        let grid = IntegrationGrid::default();
        let mut s = Slice::new(grid.points());
        s.reset(0.0004, &grid);
        s.value.fill(2.0);
        // tail mass and fast_cndf error stay below 1e-6
        assert_abs_diff_eq!(s.expectation(0, 0.0, 0.0, 6.0), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn kink_correction_lowers_value() {
        let mut s = Slice::new(4);
        let payoff = [3.0, 1.0, -1.0, -3.0];
        let hold = [0.0, 0.0, 0.0, 0.0];
        s.update_value(&payoff, &hold);
        // crossing halfway between points 1 and 2
        assert_eq!(s.value[0], 3.0);
        assert_abs_diff_eq!(s.value[1], 1.0 - 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(s.value[2], -0.125, epsilon = 1e-15);
        assert_eq!(s.value[3], 0.0);
    }

    #[test]
    fn expired_and_expiring() {
        let lgm = Lgm::new(0.0).unwrap();
        let disc = FlatCurve::new(0.01).unwrap();
        let cf = bond(0.05);
        let spreads = ValuationSpreads::default();
        assert_eq!(
            lgm.bermudan_call(&cf, &[-0.5, -0.1], &disc, &[0.0, 0.0], &spreads).unwrap(),
            0.0
        );
        let today = lgm.bermudan_call(&cf, &[0.001], &disc, &[0.0001], &spreads).unwrap();
        let intrinsic = lgm.european_call(&cf, 0.001, &disc, 0.0, &spreads, None);
        assert_eq!(today, intrinsic);
    }

    #[test]
    fn rejects_malformed_input() {
        let lgm = Lgm::new(0.0).unwrap();
        let disc = FlatCurve::new(0.01).unwrap();
        let cf = bond(0.05);
        let spreads = ValuationSpreads::default();
        assert!(lgm.bermudan_call(&cf, &[], &disc, &[], &spreads).is_err());
        assert!(lgm.bermudan_call(&cf, &[1.0, 2.0], &disc, &[0.0001], &spreads).is_err());
        assert!(lgm.bermudan_call(&cf, &[2.0, 1.0], &disc, &[0.0, 0.0], &spreads).is_err());
        assert!(lgm.bermudan_call(&cf, &[1.0], &disc, &[-0.1], &spreads).is_err());
    }

    #[test]
    fn single_date_matches_closed_form() {
        let lgm = Lgm::new(0.02).unwrap();
        let disc = FlatCurve::new(0.02).unwrap();
        let cf = bond(0.025);
        let spreads = ValuationSpreads::default();
        let xi = 0.0001 * 4.0;
        let closed = lgm.european_call(&cf, 4.0, &disc, xi, &spreads, None);
        let numeric = lgm.bermudan_call(&cf, &[4.0], &disc, &[xi], &spreads).unwrap();
        assert_relative_eq!(numeric, closed, max_relative = 1e-3);
    }

    #[test]
    fn more_exercise_dates_are_worth_more() {
        let lgm = Lgm::new(0.01).unwrap();
        let disc = FlatCurve::new(0.02).unwrap();
        let cf = bond(0.025);
        let spreads = ValuationSpreads::default();
        let times = [2.0, 3.0, 4.0, 5.0];
        let xi: Vec<Real> = times.iter().map(|t| 0.0001 * t).collect();
        let european = lgm.european_call(&cf, 2.0, &disc, xi[0], &spreads, None);
        let bermudan = lgm.bermudan_call(&cf, &times, &disc, &xi, &spreads).unwrap();
        assert!(bermudan > european);
    }

    #[test]
    fn past_exercise_times_are_dropped() {
        let lgm = Lgm::new(0.01).unwrap();
        let disc = FlatCurve::new(0.02).unwrap();
        let cf = bond(0.025);
        let spreads = ValuationSpreads::default();
        let live = lgm
            .bermudan_call(&cf, &[2.0, 3.0], &disc, &[0.0002, 0.0003], &spreads)
            .unwrap();
        let times = [-1.0, -0.5, 2.0, 3.0];
        let small = lgm.bermudan_call(&cf, &times, &disc, &[0.0, 0.0, 0.0002, 0.0003], &spreads);
        let large = lgm.bermudan_call(&cf, &times, &disc, &[9.0, 9.0, 0.0002, 0.0003], &spreads);
        assert_eq!(small.unwrap(), live);
        assert_eq!(large.unwrap(), live);
    }
}
