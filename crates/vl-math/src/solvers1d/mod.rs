//! 1D root-finding solvers.
//!
//! Both solvers take an iteration budget and an absolute threshold on
//! `|f(x)|`; passing `0` for either selects the default.

use vl_core::{
    errors::{Error, Result},
    Real,
};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// Default threshold on `|f(x)|` (and on the step size for the secant method).
pub const DEFAULT_THRESHOLD: Real = 1.0e-8;

/// Bracket width below which Ridders' method returns the midpoint.
const MIN_BRACKET_WIDTH: Real = 1.0e-15;

fn resolve(max_iter: u32, threshold: Real) -> (u32, Real) {
    let iter = if max_iter > 0 {
        max_iter
    } else {
        DEFAULT_MAX_ITERATIONS
    };
    let t = if threshold > 0.0 {
        threshold
    } else {
        DEFAULT_THRESHOLD
    };
    (iter, t)
}

// ── Secant ────────────────────────────────────────────────────────────────────

/// Secant method started from `x0` and `x1`.
///
/// The start points are swapped when `x0` is already the better guess, so the
/// iteration always extrapolates from the point with the smaller residual.
/// Stops once `|f(x)|` or the step falls below `threshold`.
///
/// # Errors
/// [`Error::RootFinding`] if the iteration budget is exhausted or the
/// iterate becomes non-finite.
pub fn find_root_secant<F>(f: F, x0: Real, x1: Real, max_iter: u32, threshold: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let (mut iter, t) = resolve(max_iter, threshold);
    let mut x = x0;
    let mut x_next = x1;
    let mut fx = f(x);
    let mut fx_next = f(x_next);
    if fx_next.abs() > fx.abs() {
        std::mem::swap(&mut x, &mut x_next);
        std::mem::swap(&mut fx, &mut fx_next);
    }

    while fx_next.abs() > t && (x - x_next).abs() > t {
        if iter == 0 {
            return Err(Error::RootFinding("secant: too many iterations".into()));
        }
        let step = (x - x_next) * fx_next / (fx_next - fx);
        x = x_next;
        fx = fx_next;
        x_next = x + step;
        fx_next = f(x_next);
        iter -= 1;
        if !x_next.is_finite() {
            return Err(Error::RootFinding(format!(
                "secant: non-finite iterate {x_next}"
            )));
        }
    }
    Ok(x_next)
}

// ── Ridders ───────────────────────────────────────────────────────────────────

/// Ridders' method on the bracket `[x0, x1]` (either order).
///
/// # Errors
/// [`Error::RootFinding`] if `f(x0)` and `f(x1)` have the same sign, either
/// end point evaluates to a non-finite value, or the iteration budget is
/// exhausted.
pub fn find_root_ridders<F>(
    f: F,
    x0: Real,
    x1: Real,
    max_iter: u32,
    threshold: Real,
) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let (iter, t) = resolve(max_iter, threshold);
    let mut x = x0;
    let mut y = x1;
    let mut fx = f(x);
    let mut fy = f(y);

    if !fx.is_finite() || !fy.is_finite() {
        return Err(Error::RootFinding(format!(
            "ridders: non-finite value at bracket end (f({x}) = {fx}, f({y}) = {fy})"
        )));
    }
    if fx * fy > 0.0 {
        return Err(Error::RootFinding(format!(
            "ridders: f({x}) and f({y}) do not bracket a root"
        )));
    }
    if fx.abs() < t {
        return Ok(x);
    }
    if fy.abs() < t {
        return Ok(y);
    }

    for _ in 0..iter {
        let z = 0.5 * (x + y);
        if (x - y).abs() < MIN_BRACKET_WIDTH {
            return Ok(z);
        }
        let fz = f(z);
        if fz.abs() < t {
            return Ok(z);
        }
        let r = (fz * fz - fy * fx).sqrt();
        if r == 0.0 {
            return Ok(z);
        }
        let mut w = (z - x) * signum(fx - fy) * fz / r + z;
        if w.is_nan() {
            w = z;
        }
        let fw = f(w);
        if fw.abs() < t {
            return Ok(w);
        }

        if fz * fw < 0.0 {
            x = w;
            fx = fw;
            y = z;
            fy = fz;
        } else if fx * fw < 0.0 {
            y = w;
            fy = fw;
        } else if fy * fw < 0.0 {
            x = w;
            fx = fw;
        }
    }

    Err(Error::RootFinding("ridders: too many iterations".into()))
}

fn signum(x: Real) -> Real {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
