//! Error types for the valuation workspace.
//!
//! Two failure classes exist. `InvalidParameter` reports malformed model or
//! instrument configuration and is always surfaced to the caller.
//! `RootFinding` reports a failed numerical search; the model layer recovers
//! from it with algorithmic fallbacks wherever one exists.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Bad constructor or setter argument (non-finite, negative,
    /// non-increasing, mismatched lengths).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A root search did not bracket a root, ran out of iterations or
    /// produced a non-finite result.
    #[error("root finding failed: {0}")]
    RootFinding(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use vl_core::{ensure, errors::Error};
/// fn positive(x: f64) -> vl_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidParameter(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}
