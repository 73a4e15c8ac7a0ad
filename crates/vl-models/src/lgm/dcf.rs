//! Reduction of a cash-flow stream to its exercise value per state.
//!
//! Exercising at `t_ex` pays the principal outstanding before the next
//! payment plus accrued interest (plus the opportunity-spread strike
//! adjustment) and receives every later payment. Each amount `C` paid at
//! `T` is reduced by `exp(−h(T)·x − h(T)²·xi/2)` for state `x`.

use vl_cashflows::CashFlowSchedule;
use vl_core::{Real, Spread, Time};

use super::{DiscountFactors, Lgm};

/// What exercising at a given time costs, and where the received payments
/// start.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExerciseStrike {
    /// First cash-flow row paid strictly after the exercise time.
    pub first: usize,
    /// Principal, accrued interest and strike adjustment.
    pub amount: Real,
}

impl ExerciseStrike {
    /// `None` when nothing is paid after `t_ex`.
    pub(crate) fn new(
        cf: &CashFlowSchedule,
        t_ex: Time,
        dfs: &DiscountFactors,
        opportunity_spread: Spread,
    ) -> Option<Self> {
        let times = cf.times();
        let first = cf.first_after(t_ex);
        if first >= times.len() {
            return None;
        }

        let accrued = match cf.interest() {
            Some(interest) if first > 0 => {
                interest[first] * (t_ex - times[first - 1]) / (times[first] - times[first - 1])
            }
            _ => 0.0,
        };
        let adjustment = strike_adjustment(cf, t_ex, dfs, first, opportunity_spread);
        Some(Self {
            first,
            amount: cf.principal()[first] + accrued + adjustment,
        })
    }
}

/// Value at the exercise date of earning `spread` on the principal after
/// `t_ex`, per unit of exercise discount factor.
fn strike_adjustment(
    cf: &CashFlowSchedule,
    t_ex: Time,
    dfs: &DiscountFactors,
    first: usize,
    spread: Spread,
) -> Real {
    if spread == 0.0 {
        return 0.0;
    }
    let times = cf.times();
    let principal = cf.principal();
    let sum: Real = (first..times.len())
        .map(|k| {
            let start = if k == 0 {
                t_ex
            } else {
                times[k - 1].max(t_ex)
            };
            principal[k] * dfs.at(k) * spread * (times[k] - start)
        })
        .sum();
    sum / dfs.exercise()
}

impl Lgm {
    /// Exercise value of `cf` at `t_ex` for each state in `states`, given
    /// the accumulated variance `xi`.
    ///
    /// Returns zeros when nothing is paid after `t_ex`.
    pub fn dcf(
        &self,
        cf: &CashFlowSchedule,
        t_ex: Time,
        dfs: &DiscountFactors,
        xi: Real,
        states: &[Real],
        opportunity_spread: Spread,
    ) -> Vec<Real> {
        let mut out = vec![0.0; states.len()];
        self.dcf_into(cf, t_ex, dfs, xi, states, opportunity_spread, &mut out);
        out
    }

    /// [`Lgm::dcf`] for a single state.
    pub(crate) fn dcf_at(
        &self,
        cf: &CashFlowSchedule,
        t_ex: Time,
        dfs: &DiscountFactors,
        xi: Real,
        state: Real,
        opportunity_spread: Spread,
    ) -> Real {
        let mut out = [0.0];
        self.dcf_into(cf, t_ex, dfs, xi, &[state], opportunity_spread, &mut out);
        out[0]
    }

    /// Writes the exercise values into `out`, which must be as long as
    /// `states`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn dcf_into(
        &self,
        cf: &CashFlowSchedule,
        t_ex: Time,
        dfs: &DiscountFactors,
        xi: Real,
        states: &[Real],
        opportunity_spread: Spread,
        out: &mut [Real],
    ) {
        debug_assert_eq!(states.len(), out.len());
        let Some(strike) = ExerciseStrike::new(cf, t_ex, dfs, opportunity_spread) else {
            out.fill(0.0);
            return;
        };

        let h = self.shape.h(t_ex);
        let amount = -strike.amount * dfs.exercise();
        let convexity = 0.5 * h * h * xi;
        for (v, &x) in out.iter_mut().zip(states) {
            *v = amount * (-h * x - convexity).exp();
        }

        let times = cf.times();
        let totals = cf.totals();
        for k in strike.first..times.len() {
            let amount = totals[k] * dfs.at(k);
            if amount == 0.0 {
                continue;
            }
            let h = self.shape.h(times[k]);
            let convexity = 0.5 * h * h * xi;
            for (v, &x) in out.iter_mut().zip(states) {
                *v += amount * (-h * x - convexity).exp();
            }
        }
    }
}
