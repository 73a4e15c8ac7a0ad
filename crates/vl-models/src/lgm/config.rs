//! State-grid configuration for the LGM integrator.

use vl_core::{ensure, errors::Result, Real, Size};

/// Extent and density of the discretized Gaussian state.
///
/// The grid spans `±std_dev_range` standard deviations with `resolution`
/// points per standard deviation. The European break-even search brackets
/// over the same range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationGrid {
    std_dev_range: Size,
    resolution: Size,
}

impl Default for IntegrationGrid {
    fn default() -> Self {
        Self {
            std_dev_range: 6,
            resolution: 12,
        }
    }
}

impl IntegrationGrid {
    /// Create a grid; both parameters must be at least one.
    pub fn new(std_dev_range: Size, resolution: Size) -> Result<Self> {
        ensure!(
            std_dev_range >= 1,
            "integration range must span at least one standard deviation"
        );
        ensure!(
            resolution >= 1,
            "integration resolution must be at least one point per standard deviation"
        );
        Ok(Self {
            std_dev_range,
            resolution,
        })
    }

    /// Standard deviations covered on each side of zero.
    pub fn std_dev_range(&self) -> Size {
        self.std_dev_range
    }

    /// Points per standard deviation.
    pub fn resolution(&self) -> Size {
        self.resolution
    }

    /// `std_dev_range` as a real.
    pub(crate) fn range(&self) -> Real {
        self.std_dev_range as Real
    }

    /// Number of grid points, `2·range·resolution + 1`.
    pub fn points(&self) -> Size {
        2 * self.std_dev_range * self.resolution + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_145_points() {
        assert_eq!(IntegrationGrid::default().points(), 145);
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(IntegrationGrid::new(0, 12).is_err());
        assert!(IntegrationGrid::new(6, 0).is_err());
        assert_eq!(IntegrationGrid::new(4, 8).unwrap().points(), 65);
    }
}
