//! # vl-termstructures
//!
//! Discount curves (annually compounded, act/365 zero rates) and normal
//! swaption volatility surfaces.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `DiscountCurve` — the curve contract consumed by valuation code.
pub mod discount_curve;

/// `FlatCurve` — constant zero-rate curve.
pub mod flat_curve;

/// `ZeroCurve` — zero-rate curve interpolated between quoted times.
pub mod zero_curve;

/// `SwaptionVolatility` — normal volatility by expiry, term, forward and strike.
pub mod swaption_volatility;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use discount_curve::{spreaded_discount, DiscountCurve};
pub use flat_curve::FlatCurve;
pub use swaption_volatility::{
    FlatSwaptionVolatility, GridSwaptionVolatility, SwaptionVolatility,
};
pub use zero_curve::{CurveInterpolation, ZeroCurve};
