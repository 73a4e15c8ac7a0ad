//! # vl-core
//!
//! Core types and error definitions shared by every crate in the valuation
//! workspace: primitive type aliases, the error enum and the `ensure!`
//! macro.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A spread over a reference rate.
pub type Spread = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years from the valuation date.
pub type Time = Real;

/// Times at or below this threshold count as "today" (one 512th of a year).
pub const EXPIRY_TOLERANCE: Time = 1.0 / 512.0;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
