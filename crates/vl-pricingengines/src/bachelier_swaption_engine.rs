//! Bachelier (normal model) swaption engine.
//!
//! Prices a receiver swaption as `annuity × put(fair rate, strike)` under
//! a normal distribution of the swap rate, with the volatility read from a
//! swaption surface at (expiry, term).

use std::sync::Arc;

use vl_core::errors::Result;
use vl_instruments::{PricingEngine, PricingResults, RegularSwaption};
use vl_models::CalibrationInstrument;
use vl_termstructures::{DiscountCurve, SwaptionVolatility};

/// Bachelier engine for [`RegularSwaption`].
///
/// Besides the NPV the results carry `"fair_rate"`, `"annuity"` and
/// `"volatility"`.
#[derive(Debug, Clone)]
pub struct BachelierSwaptionEngine {
    discount_curve: Arc<dyn DiscountCurve>,
    forward_curve: Arc<dyn DiscountCurve>,
    surface: Arc<dyn SwaptionVolatility>,
}

impl BachelierSwaptionEngine {
    /// Create an engine discounting on `discount_curve`, projecting on
    /// `forward_curve` and reading normal volatilities from `surface`.
    pub fn new(
        discount_curve: Arc<dyn DiscountCurve>,
        forward_curve: Arc<dyn DiscountCurve>,
        surface: Arc<dyn SwaptionVolatility>,
    ) -> Self {
        Self {
            discount_curve,
            forward_curve,
            surface,
        }
    }
}

impl PricingEngine<RegularSwaption> for BachelierSwaptionEngine {
    fn calculate(&self, swaption: &RegularSwaption) -> Result<PricingResults> {
        let disc = self.discount_curve.as_ref();
        let fwd = self.forward_curve.as_ref();
        let surface = self.surface.as_ref();
        let npv = swaption.value_with_curves(disc, fwd, surface)?;
        Ok(PricingResults::from_npv(npv)
            .with_result("fair_rate", swaption.fair_rate(disc, fwd))
            .with_result("annuity", swaption.annuity(disc))
            .with_result("volatility", swaption.volatility(disc, fwd, surface)))
    }
}
