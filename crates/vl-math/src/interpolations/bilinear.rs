//! Bilinear 2D interpolation on a rectangular grid with flat extrapolation.

use super::{bracket, check_grid};
use vl_core::{errors::Result, Real};

/// Bilinear interpolation on a rectangular grid.
///
/// `z` is row-major: `z[j * nx + i]` = f(xs\[i\], ys\[j\]).
#[derive(Debug, Clone)]
pub struct BilinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    z: Vec<Real>,
    nx: usize,
}

impl BilinearInterpolation {
    /// Build a bilinear interpolation on the grid `(xs × ys → z)`.
    ///
    /// Both `xs` and `ys` must be strictly increasing; one node per axis is
    /// allowed.
    pub fn new(xs: &[Real], ys: &[Real], z: &[Real]) -> Result<Self> {
        check_grid("x", xs)?;
        check_grid("y", ys)?;
        let nx = xs.len();
        let ny = ys.len();
        vl_core::ensure!(
            z.len() == nx * ny,
            "z length ({}) must equal nx*ny ({}*{}={})",
            z.len(),
            nx,
            ny,
            nx * ny
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            z: z.to_vec(),
            nx,
        })
    }

    fn z_at(&self, i: usize, j: usize) -> Real {
        self.z[j * self.nx + i]
    }

    /// Evaluate the surface at `(x, y)`.
    pub fn value(&self, x: Real, y: Real) -> Real {
        let (i0, i1, t) = bracket(&self.xs, x);
        let (j0, j1, u) = bracket(&self.ys, y);

        (1.0 - t) * (1.0 - u) * self.z_at(i0, j0)
            + t * (1.0 - u) * self.z_at(i1, j0)
            + (1.0 - t) * u * self.z_at(i0, j1)
            + t * u * self.z_at(i1, j1)
    }
}
