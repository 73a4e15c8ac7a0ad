//! Linear interpolation on 1D and 2D grids.
//!
//! Both schemes extrapolate flat beyond the first and last node and accept a
//! single node per axis (constant function), which is what curve and surface
//! inputs with one quote require.

pub mod bilinear;

pub use bilinear::BilinearInterpolation;

use vl_core::{errors::Result, Real};

/// Locate `v` on the strictly increasing grid `vs`.
///
/// Returns `(lo, hi, w)` with `f(v) ≈ (1 - w)·f(vs[lo]) + w·f(vs[hi])`,
/// clamped to the end nodes outside the grid.
pub(crate) fn bracket(vs: &[Real], v: Real) -> (usize, usize, Real) {
    let n = vs.len();
    if n == 1 || v <= vs[0] {
        return (0, 0, 0.0);
    }
    if v >= vs[n - 1] {
        return (n - 1, n - 1, 0.0);
    }
    // vs[0] < v < vs[n-1], so the partition point lies in 1..n
    let hi = vs.partition_point(|&x| x <= v);
    let lo = hi - 1;
    let w = (v - vs[lo]) / (vs[hi] - vs[lo]);
    (lo, hi, w)
}

pub(crate) fn check_grid(name: &str, vs: &[Real]) -> Result<()> {
    vl_core::ensure!(!vs.is_empty(), "{name} grid must not be empty");
    vl_core::ensure!(
        vs.iter().all(|v| v.is_finite()),
        "{name} grid must contain finite values"
    );
    vl_core::ensure!(
        vs.windows(2).all(|w| w[1] > w[0]),
        "{name} grid must be strictly increasing"
    );
    Ok(())
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation with flat extrapolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from strictly increasing `xs` and
    /// corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices are empty, differ in length, or `xs`
    /// is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_grid("x", xs)?;
        vl_core::ensure!(
            xs.len() == ys.len(),
            "xs and ys must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Real {
        let (lo, hi, w) = bracket(&self.xs, x);
        (1.0 - w) * self.ys[lo] + w * self.ys[hi]
    }

    /// The interpolation nodes.
    pub fn xs(&self) -> &[Real] {
        &self.xs
    }

    /// The interpolated values at the nodes.
    pub fn ys(&self) -> &[Real] {
        &self.ys
    }
}
