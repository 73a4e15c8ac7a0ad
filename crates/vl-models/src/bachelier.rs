//! Bachelier (normal) model for options on a forward rate.
//!
//! ```text
//! V = φ(F − K)·N(φd) + σ√t·n(d),   d = (F − K)/(σ√t)
//! ```
//!
//! with `φ = +1` for calls and `−1` for puts.

use vl_core::{ensure, errors::Result, Real, Time, Volatility, EXPIRY_TOLERANCE};
use vl_math::{cndf, ndf};

/// Standard deviations below this are treated as zero volatility.
const MIN_STD_DEV: Real = 1.0e-6;

/// Normal model for a single expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BachelierModel {
    time: Time,
    std_dev: Real,
}

impl BachelierModel {
    /// Create a model for options expiring at `time` with normal
    /// volatility `volatility`.
    pub fn new(time: Time, volatility: Volatility) -> Result<Self> {
        ensure!(time.is_finite(), "expiry time must be finite, got {time}");
        ensure!(
            volatility.is_finite(),
            "volatility must be finite, got {volatility}"
        );
        let std_dev = if time > 0.0 {
            volatility * time.sqrt()
        } else {
            0.0
        };
        Ok(Self { time, std_dev })
    }

    /// `σ·√t`.
    pub fn std_dev(&self) -> Real {
        self.std_dev
    }

    /// Undiscounted call price.
    pub fn call_price(&self, forward: Real, strike: Real) -> Real {
        self.price(1.0, forward, strike)
    }

    /// Undiscounted put price.
    pub fn put_price(&self, forward: Real, strike: Real) -> Real {
        self.price(-1.0, forward, strike)
    }

    fn price(&self, phi: Real, forward: Real, strike: Real) -> Real {
        if self.time < 0.0 {
            return 0.0;
        }
        if self.time < EXPIRY_TOLERANCE || self.std_dev < MIN_STD_DEV {
            return (phi * (forward - strike)).max(0.0);
        }
        let d = (forward - strike) / self.std_dev;
        phi * (forward - strike) * cndf(phi * d) + self.std_dev * ndf(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn atm_price() {
        let m = BachelierModel::new(4.0, 0.01).unwrap();
        let expected = 0.02 / (2.0 * std::f64::consts::PI).sqrt();
        assert_abs_diff_eq!(m.call_price(0.03, 0.03), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(m.put_price(0.03, 0.03), expected, epsilon = 1e-15);
    }

    #[test]
    fn put_call_parity() {
        let m = BachelierModel::new(2.5, 0.008).unwrap();
        for k in [0.0, 0.01, 0.02, 0.05] {
            let parity = m.call_price(0.02, k) - m.put_price(0.02, k);
            assert_abs_diff_eq!(parity, 0.02 - k, epsilon = 1e-14);
        }
    }

    #[test]
    fn expired_and_expiring() {
        let expired = BachelierModel::new(-0.1, 0.01).unwrap();
        assert_eq!(expired.call_price(0.05, 0.01), 0.0);

        let expiring = BachelierModel::new(1.0 / 1024.0, 0.01).unwrap();
        assert_abs_diff_eq!(expiring.call_price(0.05, 0.01), 0.04, epsilon = 1e-15);
        assert_eq!(expiring.put_price(0.05, 0.01), 0.0);

        let flat = BachelierModel::new(1.0, 0.0).unwrap();
        assert_abs_diff_eq!(flat.put_price(0.01, 0.03), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn rejects_nan() {
        assert!(BachelierModel::new(f64::NAN, 0.01).is_err());
        assert!(BachelierModel::new(1.0, f64::INFINITY).is_err());
    }
}
