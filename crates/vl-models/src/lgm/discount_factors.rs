//! Discount factors aligned with a cash-flow schedule.

use vl_cashflows::CashFlowSchedule;
use vl_core::{DiscountFactor, Time};
use vl_termstructures::{spreaded_discount, DiscountCurve};

use super::ValuationSpreads;

/// One discount factor per cash-flow row, plus a trailing entry for the
/// exercise time.
///
/// Without spreads the factors come straight from the curve. Otherwise the
/// discount zero rate, the spread-curve zero rate and the residual spread
/// are summed and compounded annually. Rows paid at or before today carry a
/// zero factor.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountFactors {
    values: Vec<DiscountFactor>,
}

impl DiscountFactors {
    /// Discount factors for `cf` and the exercise time `t_ex`.
    pub fn new(
        cf: &CashFlowSchedule,
        t_ex: Time,
        disc: &dyn DiscountCurve,
        spreads: &ValuationSpreads<'_>,
    ) -> Self {
        let df = |t: Time| {
            spreaded_discount(disc, spreads.spread_curve, spreads.residual_spread, t)
        };

        let mut values: Vec<DiscountFactor> = cf
            .times()
            .iter()
            .map(|&t| if t > 0.0 { df(t) } else { 0.0 })
            .collect();
        values.push(df(t_ex));
        Self { values }
    }

    /// Discount factor of cash-flow row `i`.
    #[inline]
    pub fn at(&self, i: usize) -> DiscountFactor {
        self.values[i]
    }

    /// Discount factor of the exercise time.
    #[inline]
    pub fn exercise(&self) -> DiscountFactor {
        self.values[self.values.len() - 1]
    }

    /// All factors, the exercise factor last.
    pub fn as_slice(&self) -> &[DiscountFactor] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use vl_termstructures::FlatCurve;

    fn schedule() -> CashFlowSchedule {
        CashFlowSchedule::new(
            vec![-1.0, 1.0, 2.0],
            vec![5.0, 5.0, 105.0],
            None,
            vec![100.0, 100.0, 100.0],
        )
        .unwrap()
    }

    #[test]
    fn plain_curve_factors() {
        let disc = FlatCurve::new(0.02).unwrap();
        let dfs = DiscountFactors::new(&schedule(), 0.5, &disc, &ValuationSpreads::default());
        assert_eq!(dfs.as_slice().len(), 4);
        assert_eq!(dfs.at(0), 0.0);
        assert_abs_diff_eq!(dfs.at(2), 1.02f64.powi(-2), epsilon = 1e-15);
        assert_abs_diff_eq!(dfs.exercise(), 1.02f64.powf(-0.5), epsilon = 1e-15);
    }

    #[test]
    fn spreads_add_to_zero_rate() {
        let disc = FlatCurve::new(0.02).unwrap();
        let spread = FlatCurve::new(0.01).unwrap();
        let spreads = ValuationSpreads {
            spread_curve: Some(&spread),
            residual_spread: 0.005,
            opportunity_spread: 0.0,
        };
        let dfs = DiscountFactors::new(&schedule(), 0.5, &disc, &spreads);
        assert_abs_diff_eq!(dfs.at(2), 1.035f64.powi(-2), epsilon = 1e-15);
        assert_abs_diff_eq!(dfs.exercise(), 1.035f64.powf(-0.5), epsilon = 1e-15);
    }
}
