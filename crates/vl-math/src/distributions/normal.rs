//! Standard normal density and cumulative distribution kernels.

use vl_core::Real;

/// `√(2π)`.
const SQRT_2PI: Real = 2.506_628_274_631_000_2;

/// Boundary between the rational and the continued-fraction branch of [`cndf`].
const SPLIT: Real = 7.071_067_811_865_47;

/// Beyond this magnitude the tail mass is below the smallest double.
const TAIL_CUTOFF: Real = 37.0;

const N: [Real; 7] = [
    220.206_867_912_376,
    221.213_596_169_931,
    112.079_291_497_871,
    33.912_866_078_383,
    6.373_962_203_531_65,
    0.700_383_064_443_688,
    3.526_249_659_989_11e-2,
];

const M: [Real; 8] = [
    440.413_735_824_752,
    793.826_512_519_948,
    637.333_633_378_831,
    296.564_248_779_674,
    86.780_732_202_946_1,
    16.064_177_579_207,
    1.755_667_163_182_64,
    8.838_834_764_831_84e-2,
];

const D: [Real; 6] = [
    0.049_867_347,
    0.021_141_006_1,
    0.003_277_626_3,
    0.000_038_003_6,
    0.000_048_890_6,
    0.000_005_383,
];

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn ndf(x: Real) -> Real {
    (-0.5 * x * x).exp() / SQRT_2PI
}

/// The standard normal cumulative distribution function Φ(x) in double
/// precision.
///
/// Rational minimax approximation for `|x| < 7.07`, continued-fraction tail
/// beyond, and exact 0/1 for `|x| > 37` (G. West, *Better approximations to
/// cumulative normal functions*, 2004). Symmetric by construction:
/// `cndf(x) = 1 - cndf(-x)`. A NaN argument yields NaN.
pub fn cndf(x: Real) -> Real {
    if x.is_nan() {
        return Real::NAN;
    }
    let z = x.abs();
    let tail = if z > TAIL_CUTOFF {
        0.0
    } else {
        let e = (-0.5 * z * z).exp();
        if z < SPLIT {
            let n = N.iter().rev().fold(0.0, |acc, &c| acc * z + c);
            let d = M.iter().rev().fold(0.0, |acc, &c| acc * z + c);
            e * n / d
        } else {
            let f = z + 1.0 / (z + 2.0 / (z + 3.0 / (z + 4.0 / (z + 13.0 / 20.0))));
            e / (SQRT_2PI * f)
        }
    };
    if x <= 0.0 {
        tail
    } else {
        1.0 - tail
    }
}

/// Fast cumulative normal (Abramowitz & Stegun 26.2.19), accurate to about
/// `1.5e-7`.
///
/// Only used where raw throughput matters more than the trailing digits,
/// i.e. the O(grid²) Bermudan integration loop.
#[inline]
pub fn fast_cndf(x: Real) -> Real {
    let z = x.abs();
    let mut f = 1.0 + z * (D[0] + z * (D[1] + z * (D[2] + z * (D[3] + z * (D[4] + z * D[5])))));
    // f^-16
    f *= f;
    f *= f;
    f *= f;
    f *= f;
    let tail = 0.5 / f;
    if x >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}
