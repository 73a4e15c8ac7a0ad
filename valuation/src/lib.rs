//! # valuation
//!
//! Calibration and valuation in the linear Gauss-Markov (LGM) model, the
//! Hull-White model in its Hagan formulation, with the curves, swaptions
//! and callable bonds it is applied to.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `vl-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use valuation::instruments::{CallableBond, PricingEngine};
//! use valuation::pricingengines::LgmCallableBondEngine;
//! use valuation::termstructures::FlatCurve;
//!
//! let curve = Arc::new(FlatCurve::new(0.03).unwrap());
//! let bond = CallableBond::fixed_rate(0.0, 10.0, 1.0, 100.0, 0.03, false, 2.0, Some(1.0))
//!     .unwrap()
//!     .with_hull_white_volatility(0.01);
//! let results = LgmCallableBondEngine::new(curve.clone(), curve)
//!     .calculate(&bond)
//!     .unwrap();
//! assert!(results.npv < results.result("base_value").unwrap());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use vl_core as core;

/// Normal distribution kernels, root finders, interpolation.
pub use vl_math as math;

/// Discount curves and swaption volatility surfaces.
pub use vl_termstructures as termstructures;

/// Cash-flow schedules and swap legs.
pub use vl_cashflows as cashflows;

/// Bachelier and LGM models.
pub use vl_models as models;

/// Swaptions and callable bonds.
pub use vl_instruments as instruments;

/// Pricing engines.
pub use vl_pricingengines as pricingengines;
