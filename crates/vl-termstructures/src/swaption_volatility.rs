//! `SwaptionVolatility` — normal (Bachelier) swaption volatilities.

use vl_core::{ensure, errors::Result, Rate, Time, Volatility};
use vl_math::BilinearInterpolation;

/// A normal swaption volatility surface.
///
/// `expiry` is the time to the first exercise, `term` the tenor of the
/// underlying swap, both in years. `forward` and `strike` are passed for
/// smile-aware surfaces and may be ignored.
pub trait SwaptionVolatility: std::fmt::Debug + Send + Sync {
    /// Normal volatility for the given swaption coordinates.
    fn volatility(&self, expiry: Time, term: Time, forward: Rate, strike: Rate) -> Volatility;
}

/// The same normal volatility for every swaption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSwaptionVolatility {
    vol: Volatility,
}

impl FlatSwaptionVolatility {
    /// Create a flat surface; the volatility must be finite and non-negative.
    pub fn new(vol: Volatility) -> Result<Self> {
        ensure!(
            vol.is_finite() && vol >= 0.0,
            "swaption volatility must be finite and non-negative, got {vol}"
        );
        Ok(Self { vol })
    }
}

impl SwaptionVolatility for FlatSwaptionVolatility {
    fn volatility(&self, _expiry: Time, _term: Time, _forward: Rate, _strike: Rate) -> Volatility {
        self.vol
    }
}

/// Expiry × term grid of normal volatilities, bilinear inside the grid and
/// flat outside.
#[derive(Debug, Clone)]
pub struct GridSwaptionVolatility {
    grid: BilinearInterpolation,
}

impl GridSwaptionVolatility {
    /// Build the surface.
    ///
    /// `vols` is row-major by term: `vols[j * expiries.len() + i]` is the
    /// volatility for `expiries[i]` and `terms[j]`.
    pub fn new(expiries: &[Time], terms: &[Time], vols: &[Volatility]) -> Result<Self> {
        ensure!(
            vols.iter().all(|v| v.is_finite() && *v >= 0.0),
            "swaption volatilities must be finite and non-negative"
        );
        Ok(Self {
            grid: BilinearInterpolation::new(expiries, terms, vols)?,
        })
    }
}

impl SwaptionVolatility for GridSwaptionVolatility {
    fn volatility(&self, expiry: Time, term: Time, _forward: Rate, _strike: Rate) -> Volatility {
        self.grid.value(expiry, term)
    }
}
