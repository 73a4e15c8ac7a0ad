//! `Instrument` and `PricingEngine` traits.
//!
//! Instruments hold their terms only. Engines own the market data (curves,
//! surfaces, model settings) and compute [`PricingResults`] on demand.

use std::collections::HashMap;
use vl_core::{errors::Result, Real, Time};

/// Results of pricing an instrument.
///
/// The NPV plus named by-products such as the option value or the
/// calibrated variances.
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// A named result, if present.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for instruments of type `I`.
pub trait PricingEngine<I>: std::fmt::Debug + Send + Sync {
    /// Price `instrument`.
    fn calculate(&self, instrument: &I) -> Result<PricingResults>;
}

/// A priceable financial product.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// Time of the last cash flow.
    fn maturity(&self) -> Time;

    /// Whether every cash flow lies in the past.
    fn is_expired(&self) -> bool {
        self.maturity() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_results_builder() {
        let r = PricingResults::from_npv(42.0)
            .with_result("call_value", 1.5)
            .with_result("base_value", 43.5);
        assert!((r.npv - 42.0).abs() < 1e-15);
        assert_eq!(r.result("call_value"), Some(1.5));
        assert_eq!(r.result("missing"), None);
    }
}
