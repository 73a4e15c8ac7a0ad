//! Linear Gauss-Markov (LGM) model, equivalent to one-factor Hull-White.
//!
//! Reference: Hagan, P. (2019), *Evaluating and hedging exotic swap
//! instruments via LGM*.
//!
//! The model state is a Gaussian variable `x` with variance `xi(t)`. A cash
//! flow `C` paid at `T` and seen from state `x` at time `t` is worth
//!
//! ```text
//! C · P(T) · exp(−h(T)·x − h(T)²·xi(t)/2)
//! ```
//!
//! in units of the numeraire, so an option on a fixed cash-flow stream
//! reduces to an integral of that sum against the state density.
//!
//! The model holds an exercise-time grid `t_ex` and the accumulated variance
//! `xi` at each grid point. The grid is set either from a constant
//! Hull-White volatility or by [`Lgm::calibrate`].

mod bermudan;
mod calibration;
mod config;
mod dcf;
mod discount_factors;
mod european;
mod shape;

pub use calibration::{swaption_adjusted_cash_flows, CalibrationInstrument};
pub use config::IntegrationGrid;
pub use discount_factors::DiscountFactors;
pub use shape::Shape;

use vl_core::{ensure, errors::Result, Real, Spread, Time, Volatility};
use vl_termstructures::DiscountCurve;

/// Variances below this are treated as zero by the European formula.
pub(crate) const MIN_VARIANCE: Real = 1.0e-10;

/// Spreads applied on top of the discount curve when valuing an option.
///
/// The spread curve and the residual spread are added to the discount
/// curve's zero rate. The opportunity spread raises the strike by the value
/// of that spread on the principal freed by exercise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationSpreads<'a> {
    /// Zero-rate spread curve added to the discount curve.
    pub spread_curve: Option<&'a dyn DiscountCurve>,
    /// Constant zero-rate spread.
    pub residual_spread: Spread,
    /// Reinvestment spread forgone on principal redeemed at exercise.
    pub opportunity_spread: Spread,
}

/// The LGM model.
#[derive(Debug, Clone, PartialEq)]
pub struct Lgm {
    shape: Shape,
    grid: IntegrationGrid,
    t_ex: Vec<Time>,
    xi: Vec<Real>,
}

impl Lgm {
    /// Create an unparameterized model with mean reversion `m ≥ 0`.
    pub fn new(mean_reversion: Real) -> Result<Self> {
        Ok(Self {
            shape: Shape::new(mean_reversion)?,
            grid: IntegrationGrid::default(),
            t_ex: Vec::new(),
            xi: Vec::new(),
        })
    }

    /// Replace the state grid used by the Bermudan integrator and the
    /// European bracket search.
    pub fn with_integration_grid(mut self, grid: IntegrationGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Set the exercise grid to `t_ex` with `xi = σ²·H2(t)` for a constant
    /// Hull-White volatility `sigma`.
    ///
    /// `t_ex` must be positive and strictly increasing. The grid is left
    /// untouched on error.
    pub fn set_times_and_constant_volatility(
        &mut self,
        t_ex: &[Time],
        sigma: Volatility,
    ) -> Result<()> {
        ensure!(
            sigma.is_finite(),
            "Hull-White volatility must be a finite number, got {sigma}"
        );
        ensure!(
            sigma >= 0.0,
            "Hull-White volatility must not be negative, got {sigma}"
        );
        let mut last = 0.0;
        for &t in t_ex {
            ensure!(
                t.is_finite() && t > last,
                "exercise times must be positive and strictly increasing, got {t} after {last}"
            );
            last = t;
        }
        self.xi = t_ex
            .iter()
            .map(|&t| sigma * sigma * self.shape.h2(t))
            .collect();
        self.t_ex = t_ex.to_vec();
        Ok(())
    }

    /// The constant Hull-White volatility on each grid interval consistent
    /// with the incremental variance:
    /// `σ_i = √((xi_i − xi_{i−1}) / (H2(t_i) − H2(t_{i−1})))`.
    pub fn implied_volatility(&self) -> Vec<Volatility> {
        let mut xi_last = 0.0;
        let mut h2_last = 0.0;
        self.t_ex
            .iter()
            .zip(&self.xi)
            .map(|(&t, &xi)| {
                let h2 = self.shape.h2(t);
                let sigma = ((xi - xi_last) / (h2 - h2_last)).sqrt();
                xi_last = xi;
                h2_last = h2;
                sigma
            })
            .collect()
    }

    /// Exercise times of the current grid.
    pub fn t_ex(&self) -> &[Time] {
        &self.t_ex
    }

    /// Accumulated variance at each exercise time.
    pub fn xi(&self) -> &[Real] {
        &self.xi
    }

    /// Mean reversion.
    pub fn mean_reversion(&self) -> Real {
        self.shape.mean_reversion()
    }

    /// Shape functions.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// State-grid configuration.
    pub fn integration_grid(&self) -> &IntegrationGrid {
        &self.grid
    }
}
