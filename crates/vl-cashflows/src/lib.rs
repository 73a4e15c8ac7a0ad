//! # vl-cashflows
//!
//! The cash-flow schedule consumed by option valuation, and the fixed and
//! floating swap legs used to build calibration instruments.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cashflow_schedule;
pub mod legs;

pub use cashflow_schedule::CashFlowSchedule;
pub use legs::{regular_periods, FixedLeg, FixedPayment, FloatLeg, FloatPayment};
