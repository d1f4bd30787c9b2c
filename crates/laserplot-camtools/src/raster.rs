//! Boustrophedon raster scanning
//!
//! Each pixel is an independent power decision, so the laser power is set
//! after every move rather than once per stroke. Rows alternate direction
//! so the end of one row sits next to the start of the next.

use crate::error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
use crate::interface::CommandInterface;
use laserplot_core::types::BoxedIterator;
use laserplot_core::PowerCurve;

/// Pixel value that marks (burns)
pub const MARK: u8 = 0;
/// Pixel value that leaves the paper alone
pub const SKIP: u8 = 255;

/// Row-major grid of pixel brightness values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Wrap a row-major buffer of `width * height` values
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> ParameterResult<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(ParameterError::InvalidDimensions(format!(
                "{}x{} grid needs {} pixels, got {}",
                width,
                height,
                width.saturating_mul(height),
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid from equally sized rows
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> ParameterResult<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(ParameterError::InvalidDimensions(
                "rows have different lengths".to_string(),
            ));
        }
        let pixels = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(width, rows.len(), pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = (y * self.width).min(self.pixels.len());
        let end = (start + self.width).min(self.pixels.len());
        &self.pixels[start..end]
    }

    /// Number of marking pixels
    pub fn mark_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v == MARK).count()
    }
}

/// Raster job settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParameters {
    /// Machine units per pixel
    pub resolution: f64,
    /// Power for skipped pixels, in [0, 1]
    pub min_power: f64,
    /// Power for marked pixels, in [0, 1]
    pub max_power: f64,
    pub power_curve: PowerCurve,
}

impl Default for RasterParameters {
    fn default() -> Self {
        Self {
            resolution: 0.5,
            min_power: 0.0,
            max_power: 1.0,
            power_curve: PowerCurve::Binary,
        }
    }
}

impl RasterParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "resolution".to_string(),
                reason: format!("must be positive, got {}", self.resolution),
            }
            .into());
        }
        if self.min_power > self.max_power {
            return Err(CamToolError::InvalidParameters(format!(
                "min power {} exceeds max power {}",
                self.min_power, self.max_power
            )));
        }
        Ok(())
    }

    /// Power level for one pixel value
    pub fn pixel_power(&self, value: u8) -> f64 {
        match self.power_curve {
            PowerCurve::Binary => {
                if value == MARK {
                    self.max_power
                } else {
                    self.min_power
                }
            }
            PowerCurve::Linear => {
                let darkness = 1.0 - f64::from(value) / 255.0;
                self.min_power + (self.max_power - self.min_power) * darkness
            }
        }
    }
}

/// Column visiting order for a row: ascending on even rows, descending on
/// odd rows.
pub fn column_order(width: usize, row: usize) -> BoxedIterator<usize> {
    if row % 2 == 0 {
        Box::new(0..width)
    } else {
        Box::new((0..width).rev())
    }
}

/// Emits a zigzag scan of a [`PixelGrid`]
#[derive(Debug, Clone, Default)]
pub struct RasterScanEmitter {
    params: RasterParameters,
}

impl RasterScanEmitter {
    pub fn new(params: RasterParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RasterParameters {
        &self.params
    }

    /// Emit the scan of `grid` into `body`, ending with laser off and a
    /// homing cycle.
    ///
    /// Both power limits are validated up front so a bad configuration
    /// fails before the first row is written.
    pub fn emit(
        &self,
        iface: &mut CommandInterface,
        grid: &PixelGrid,
        body: &mut Vec<String>,
    ) -> CamToolResult<()> {
        self.params.validate()?;
        iface.native_power(self.params.min_power)?;
        iface.native_power(self.params.max_power)?;

        let res = self.params.resolution;
        for y in 0..grid.height() {
            body.push(iface.comment(&format!("Row {}", y + 1)));

            let row = grid.row(y);
            for x in column_order(grid.width(), y) {
                body.push(iface.cutting_move(Some(x as f64 * res), Some(y as f64 * res)));
                body.push(iface.set_laser_power(self.params.pixel_power(row[x]))?);
            }

            body.push(iface.laser_off());
        }

        body.push(iface.laser_off());
        body.push(iface.home_axes());

        tracing::debug!(
            "Raster scan of {}x{} grid emitted ({} marking pixels)",
            grid.width(),
            grid.height(),
            grid.mark_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_construction() {
        let grid = PixelGrid::from_rows(&[[0u8, 255], [255, 0]]).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.get(1, 0), Some(255));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.row(1), &[255, 0]);
        assert_eq!(grid.mark_count(), 2);

        assert!(PixelGrid::new(3, 2, vec![0; 5]).is_err());
        assert!(PixelGrid::from_rows(&[vec![0u8, 1], vec![0]]).is_err());
    }

    #[test]
    fn test_column_order_zigzag() {
        assert_eq!(column_order(3, 0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(column_order(3, 1).collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(column_order(0, 1).count(), 0);
    }

    #[test]
    fn test_pixel_power() {
        let binary = RasterParameters {
            min_power: 0.1,
            max_power: 0.9,
            ..Default::default()
        };
        assert_eq!(binary.pixel_power(0), 0.9);
        assert_eq!(binary.pixel_power(1), 0.1);
        assert_eq!(binary.pixel_power(255), 0.1);

        let linear = RasterParameters {
            power_curve: PowerCurve::Linear,
            ..Default::default()
        };
        assert_eq!(linear.pixel_power(0), 1.0);
        assert_eq!(linear.pixel_power(255), 0.0);
    }

    #[test]
    fn test_invalid_power_limits_fail_before_output() {
        let mut iface = CommandInterface::default();
        let mut body = Vec::new();
        let grid = PixelGrid::from_rows(&[[0u8]]).unwrap();
        let emitter = RasterScanEmitter::new(RasterParameters {
            max_power: 2.0,
            ..Default::default()
        });
        assert!(emitter.emit(&mut iface, &grid, &mut body).is_err());
        assert!(body.is_empty());

        let emitter = RasterScanEmitter::new(RasterParameters {
            min_power: 0.8,
            max_power: 0.2,
            ..Default::default()
        });
        assert!(emitter.emit(&mut iface, &grid, &mut body).is_err());
    }
}
