//! # vl-models
//!
//! Interest-rate option models.
//!
//! ```text
//! BachelierModel   normal model for market swaption quotes
//! Lgm              one-factor Linear Gauss-Markov (Hull-White) model
//! ├── calibrate            fit xi to a basket of CalibrationInstrument
//! ├── european_call        closed form, single exercise
//! └── bermudan_call        backward induction on a state grid
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Models ───────────────────────────────────────────────────────────────
pub mod bachelier;
pub mod lgm;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use bachelier::BachelierModel;
pub use lgm::{
    swaption_adjusted_cash_flows, CalibrationInstrument, DiscountFactors, IntegrationGrid, Lgm,
    Shape, ValuationSpreads,
};
