//! Closed-form European option on a cash-flow stream.
//!
//! The exercise value is monotone in the state, so it changes sign at a
//! single break-even state `x*`. Integrating each reduced cash flow against
//! the Gaussian density above `x*` gives
//!
//! ```text
//! V = −K·P(t_ex)·N(x*/s + h(t_ex)·s) + Σ C_k·P(t_k)·N(x*/s + h(t_k)·s),   s = √xi
//! ```

use log::warn;
use vl_cashflows::CashFlowSchedule;
use vl_core::{Real, Time, EXPIRY_TOLERANCE};
use vl_math::{cndf, find_root_ridders};
use vl_termstructures::DiscountCurve;

use super::dcf::ExerciseStrike;
use super::{DiscountFactors, Lgm, ValuationSpreads, MIN_VARIANCE};

/// Beyond `dh·s = 20` both tails of the formula saturate in double precision.
const MAX_SPREAD_OF_QUANTILES: Real = 20.0;

/// Ridders iteration budget for the break-even search.
const BREAK_EVEN_ITERATIONS: u32 = 20;

impl Lgm {
    /// Value of the option to exercise into `cf` at `t_ex`, with
    /// accumulated variance `xi`.
    ///
    /// Pass `dfs` when the discount factors for `(cf, t_ex)` are already at
    /// hand; they must have been built with the same curve and spreads.
    ///
    /// Never fails: an expired option is worth zero, a degenerate variance
    /// gives the intrinsic value, and a failed break-even search falls back
    /// to numeric integration.
    pub fn european_call(
        &self,
        cf: &CashFlowSchedule,
        t_ex: Time,
        disc: &dyn DiscountCurve,
        xi: Real,
        spreads: &ValuationSpreads<'_>,
        dfs: Option<&DiscountFactors>,
    ) -> Real {
        if t_ex < 0.0 {
            return 0.0;
        }
        let owned;
        let dfs = match dfs {
            Some(dfs) => dfs,
            None => {
                owned = DiscountFactors::new(cf, t_ex, disc, spreads);
                &owned
            }
        };
        let opportunity_spread = spreads.opportunity_spread;
        let intrinsic = || self.dcf_at(cf, t_ex, dfs, 0.0, 0.0, opportunity_spread);

        if t_ex < EXPIRY_TOLERANCE || xi.is_nan() || xi < MIN_VARIANCE {
            return intrinsic().max(0.0);
        }

        let payoff = |x: Real| self.dcf_at(cf, t_ex, dfs, xi, x, opportunity_spread);
        let mut std_dev = xi.sqrt();
        let dh = self.shape.h(t_ex + 1.0 / 365.0) - self.shape.h(t_ex);

        let break_even = if std_dev > MAX_SPREAD_OF_QUANTILES / dh {
            std_dev = MAX_SPREAD_OF_QUANTILES / dh;
            -10.0 * std_dev
        } else {
            let range = self.grid.range() * std_dev;
            let (lower, upper) = if payoff(0.0) >= 0.0 {
                if payoff(range) > 0.0 {
                    // exercise pays in every state
                    return intrinsic();
                }
                (0.0, range)
            } else {
                if payoff(-range) < 0.0 {
                    return 0.0;
                }
                (-range, 0.0)
            };
            match find_root_ridders(payoff, upper, lower, BREAK_EVEN_ITERATIONS, 0.0) {
                Ok(x) => x,
                Err(e) => {
                    warn!("break-even search at t = {t_ex} failed ({e}), integrating numerically");
                    return self.backward_induction(cf, &[t_ex], disc, &[xi], spreads);
                }
            }
        };

        let Some(strike) = ExerciseStrike::new(cf, t_ex, dfs, opportunity_spread) else {
            return 0.0;
        };
        let quantile = |t: Time| break_even / std_dev + self.shape.h(t) * std_dev;

        let times = cf.times();
        let totals = cf.totals();
        let received: Real = (strike.first..times.len())
            .map(|k| totals[k] * dfs.at(k) * cndf(quantile(times[k])))
            .sum();
        received - strike.amount * dfs.exercise() * cndf(quantile(t_ex))
    }
}
