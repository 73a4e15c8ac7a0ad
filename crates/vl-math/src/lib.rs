//! # vl-math
//!
//! Numerical kernels: cumulative normal approximations, scalar root
//! finders and linear interpolation on 1D and 2D grids.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Normal distribution kernels.
pub mod distributions;

/// Linear interpolation with flat extrapolation.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{cndf, fast_cndf, ndf};
pub use interpolations::{BilinearInterpolation, LinearInterpolation};
pub use solvers1d::{find_root_ridders, find_root_secant};
