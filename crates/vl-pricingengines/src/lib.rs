//! # vl-pricingengines
//!
//! Pricing engines for the instruments in `vl-instruments`.
//!
//! ## Engines
//!
//! - [`BachelierSwaptionEngine`] — normal-model closed form for regular swaptions
//! - [`LgmCallableBondEngine`] — LGM valuation of the issuer's call on a fixed-rate bond

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bachelier_swaption_engine;
pub mod lgm_callable_bond_engine;

pub use bachelier_swaption_engine::BachelierSwaptionEngine;
pub use lgm_callable_bond_engine::LgmCallableBondEngine;
