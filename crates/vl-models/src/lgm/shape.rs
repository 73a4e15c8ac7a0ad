//! Mean-reversion shape functions.
//!
//! ```text
//! m = 0:  h(t) = t,                    H2(t) = t
//! m > 0:  h(t) = (1 − e^{−mt}) / m,    H2(t) = (e^{2mt} − 1) / (2m)
//! ```
//!
//! `H2` is the integral of `h'(t)^-2`; a constant Hull-White volatility
//! `σ` accumulates the LGM variance `xi(t) = σ²·H2(t)`.

use vl_core::{ensure, errors::Result, Real, Time};

/// The `(h, H2)` pair for one mean reversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    mean_reversion: Real,
}

impl Shape {
    /// Shape for mean reversion `m ≥ 0`.
    pub fn new(mean_reversion: Real) -> Result<Self> {
        ensure!(
            mean_reversion.is_finite(),
            "mean reversion must be a finite number, got {mean_reversion}"
        );
        ensure!(
            mean_reversion >= 0.0,
            "mean reversion must not be negative, got {mean_reversion}"
        );
        Ok(Self { mean_reversion })
    }

    /// The mean reversion.
    pub fn mean_reversion(&self) -> Real {
        self.mean_reversion
    }

    /// `h(t)`.
    #[inline]
    pub fn h(&self, t: Time) -> Real {
        let m = self.mean_reversion;
        if m == 0.0 {
            t
        } else {
            -(-m * t).exp_m1() / m
        }
    }

    /// `H2(t)`.
    #[inline]
    pub fn h2(&self, t: Time) -> Real {
        let m = self.mean_reversion;
        if m == 0.0 {
            t
        } else {
            (2.0 * m * t).exp_m1() / (2.0 * m)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn normal_model_is_identity() {
        let s = Shape::new(0.0).unwrap();
        assert_eq!(s.h(3.5), 3.5);
        assert_eq!(s.h2(3.5), 3.5);
    }

    #[test]
    fn closed_forms() {
        let s = Shape::new(0.05).unwrap();
        assert_abs_diff_eq!(s.h(10.0), (1.0 - (-0.5f64).exp()) / 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(s.h2(10.0), (1.0f64.exp() - 1.0) / 0.1, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_mean_reversion() {
        assert!(Shape::new(-0.01).is_err());
        assert!(Shape::new(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn h_increasing_from_zero(m in 0.0f64..0.5, t in 0.01f64..20.0) {
            let s = Shape::new(m).unwrap();
            prop_assert_eq!(s.h(0.0), 0.0);
            prop_assert_eq!(s.h2(0.0), 0.0);
            prop_assert!(s.h(t + 0.01) > s.h(t));
            prop_assert!(s.h2(t + 0.01) > s.h2(t));
        }

        #[test]
        fn small_mean_reversion_tends_to_identity(t in 0.0f64..30.0) {
            let s = Shape::new(1e-10).unwrap();
            prop_assert!((s.h(t) - t).abs() < 1e-6);
            prop_assert!((s.h2(t) - t).abs() < 1e-6);
        }
    }
}
