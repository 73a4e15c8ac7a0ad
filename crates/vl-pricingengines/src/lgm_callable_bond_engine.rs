//! LGM engine for callable fixed-rate bonds.
//!
//! The bond is worth its discounted cash flows minus the issuer's call.
//! The call is an option on the remaining cash flows with strike par plus
//! accrued interest, valued in the LGM model: in closed form when one call
//! date remains and by backward induction on the state grid otherwise.
//!
//! The model variance comes either from a constant Hull-White volatility
//! set on the bond, or from calibration to the bond's co-terminal swaption
//! basket on the engine's volatility surface.

use std::sync::Arc;

use log::debug;
use vl_core::errors::{Error, Result};
use vl_core::Real;
use vl_instruments::{CallableBond, PricingEngine, PricingResults};
use vl_models::{IntegrationGrid, Lgm, ValuationSpreads};
use vl_termstructures::{DiscountCurve, SwaptionVolatility};

/// LGM engine for [`CallableBond`].
///
/// Besides the NPV the results carry `"call_value"` (the value of the
/// issuer's call, positive) and `"base_value"` (the straight bond).
#[derive(Debug, Clone)]
pub struct LgmCallableBondEngine {
    discount_curve: Arc<dyn DiscountCurve>,
    forward_curve: Arc<dyn DiscountCurve>,
    spread_curve: Option<Arc<dyn DiscountCurve>>,
    surface: Option<Arc<dyn SwaptionVolatility>>,
    grid: IntegrationGrid,
}

impl LgmCallableBondEngine {
    /// Create an engine discounting on `discount_curve` and projecting the
    /// calibration swaptions' floating legs on `forward_curve`.
    pub fn new(
        discount_curve: Arc<dyn DiscountCurve>,
        forward_curve: Arc<dyn DiscountCurve>,
    ) -> Self {
        Self {
            discount_curve,
            forward_curve,
            spread_curve: None,
            surface: None,
            grid: IntegrationGrid::default(),
        }
    }

    /// Add a credit spread curve on top of the discount curve.
    pub fn with_spread_curve(mut self, spread_curve: Arc<dyn DiscountCurve>) -> Self {
        self.spread_curve = Some(spread_curve);
        self
    }

    /// Volatility surface for calibration; needed for bonds without a
    /// constant Hull-White volatility.
    pub fn with_surface(mut self, surface: Arc<dyn SwaptionVolatility>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Override the numeric integration grid.
    pub fn with_integration_grid(mut self, grid: IntegrationGrid) -> Self {
        self.grid = grid;
        self
    }

    /// The LGM model for `bond`, either from its constant volatility or
    /// calibrated to its swaption basket.
    pub fn model(&self, bond: &CallableBond) -> Result<Lgm> {
        let mut lgm = Lgm::new(bond.mean_reversion())?.with_integration_grid(self.grid);
        match bond.hull_white_volatility() {
            Some(sigma) => lgm.set_times_and_constant_volatility(&bond.exercise_times(), sigma)?,
            None => {
                let surface = self.surface.as_deref().ok_or_else(|| {
                    Error::InvalidParameter(
                        "a volatility surface is required to calibrate the call".into(),
                    )
                })?;
                lgm.calibrate(
                    &bond.basket()?,
                    self.discount_curve.as_ref(),
                    self.forward_curve.as_ref(),
                    surface,
                )?;
            }
        }
        Ok(lgm)
    }

    /// Value of the issuer's call.
    fn call_value(&self, bond: &CallableBond, lgm: &Lgm) -> Result<Real> {
        let disc = self.discount_curve.as_ref();
        let spreads = ValuationSpreads {
            spread_curve: self.spread_curve.as_deref(),
            residual_spread: bond.residual_spread(),
            opportunity_spread: bond.opportunity_spread(),
        };
        let cf = bond.cash_flows();
        match (lgm.t_ex(), lgm.xi()) {
            ([], _) => Ok(0.0),
            ([t_ex], [xi]) => Ok(lgm.european_call(cf, *t_ex, disc, *xi, &spreads, None)),
            (t_ex, xi) => lgm.bermudan_call(cf, t_ex, disc, xi, &spreads),
        }
    }
}

impl PricingEngine<CallableBond> for LgmCallableBondEngine {
    fn calculate(&self, bond: &CallableBond) -> Result<PricingResults> {
        let lgm = self.model(bond)?;
        let call = self.call_value(bond, &lgm)?;
        let base = bond.cash_flows().present_value(
            self.discount_curve.as_ref(),
            self.spread_curve.as_deref(),
            bond.residual_spread(),
            0.0,
        );
        debug!(
            "callable bond: {} call dates, base {base}, call {call}",
            lgm.t_ex().len()
        );

        let npv = if bond.excludes_base() { -call } else { base - call };
        Ok(PricingResults::from_npv(npv)
            .with_result("call_value", call)
            .with_result("base_value", base))
    }
}
