//! Normal distribution kernels.
//!
//! [`cndf`] is the double-precision cumulative normal used by closed-form
//! valuation; [`fast_cndf`] trades the last digits for throughput and is
//! meant for inner integration loops only.

pub mod normal;

pub use normal::{cndf, fast_cndf, ndf};
