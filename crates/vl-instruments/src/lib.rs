//! # vl-instruments
//!
//! Instruments priced by the valuation workspace: regular (receiver)
//! swaptions, which double as LGM calibration instruments, the regular
//! swaption equivalent to an irregular cash-flow stream, and callable
//! fixed-rate bonds.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod callable_bond;
pub mod equivalent;
pub mod instrument;
pub mod swaption;

pub use callable_bond::{call_schedule, CallableBond};
pub use equivalent::equivalent_regular_swaption;
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use swaption::RegularSwaption;
