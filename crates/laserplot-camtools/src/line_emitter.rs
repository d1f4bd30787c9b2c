//! Line segment chain emission
//!
//! Walks one connected chain and emits a cut with as little setup as
//! possible. When the tool already sits at the chain start (within the
//! interface tolerance) the laser-off/travel/power sequence is skipped, so
//! consecutive contiguous chains cut as one continuous stroke.

use crate::error::{CamToolError, CamToolResult};
use crate::geometry::LineSegmentChain;
use crate::interface::CommandInterface;

/// Speeds, power and dwell used for a vector cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutParameters {
    /// Travel speed for repositioning
    pub movement_speed: f64,
    /// Speed while cutting
    pub cutting_speed: f64,
    /// Laser power in [0, 1]
    pub laser_power: f64,
    /// Pause before the first cut of a chain, in milliseconds
    pub dwell_time: u64,
}

impl Default for CutParameters {
    fn default() -> Self {
        Self {
            movement_speed: 90.0,
            cutting_speed: 90.0,
            laser_power: 1.0,
            dwell_time: 0,
        }
    }
}

impl CutParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        if !(self.movement_speed > 0.0 && self.cutting_speed > 0.0) {
            return Err(CamToolError::InvalidParameters(format!(
                "speeds must be positive (movement {}, cutting {})",
                self.movement_speed, self.cutting_speed
            )));
        }
        Ok(())
    }
}

/// Emits segment chains through a [`CommandInterface`]
#[derive(Debug, Clone, Default)]
pub struct LineSegmentEmitter {
    params: CutParameters,
}

impl LineSegmentEmitter {
    pub fn new(params: CutParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CutParameters {
        &self.params
    }

    /// Emit `chain` into `body`.
    ///
    /// An empty chain is logged and emits nothing. The cut power is checked
    /// before anything is written, so a rejected power leaves `body` and the
    /// tracked state untouched.
    ///
    /// The setup sequence is skipped only when the tool already sits at the
    /// chain start with the laser at the cut power.
    pub fn emit(
        &self,
        iface: &mut CommandInterface,
        chain: &LineSegmentChain,
        body: &mut Vec<String>,
    ) -> CamToolResult<()> {
        let Some(start) = chain.start() else {
            tracing::warn!("Empty segment chain; nothing emitted");
            return Ok(());
        };

        let native = iface.native_power(self.params.laser_power)?;

        let at_start = iface
            .position()
            .is_some_and(|p| p.is_near(&start, iface.tolerance()));
        let cutting = iface.laser_power() == Some(native);

        if at_start && cutting {
            tracing::debug!("Chain continues from {}; setup skipped", start);
        } else {
            if self.params.dwell_time > 0 {
                body.push(iface.dwell(self.params.dwell_time));
            }
            body.push(iface.laser_off());
            body.push(iface.set_movement_speed(self.params.movement_speed));
            body.push(iface.travel_to(start));
            body.push(iface.set_movement_speed(self.params.cutting_speed));
            body.push(iface.set_laser_power(self.params.laser_power)?);
        }

        for segment in chain {
            body.push(iface.cut_to(segment.end));
        }

        Ok(())
    }
}
