//! Command interface
//!
//! Translates one motion, power, or setup intent into one line of device
//! command text. The interface owns the only state that has to survive
//! between calls: the last commanded tool position, the last written laser
//! power and the pending/current travel speed.
//!
//! Every operation returns exactly one line. A line may be empty when the
//! operation is a no-op (speed select while speed commands are suppressed,
//! an unrecognized unit, a move with no axes); the compiler drops empty
//! lines when it assembles the final program.

use crate::dialect::{self, CommandDialect, MotionType};
use crate::error::{CamToolResult, ParameterError};
use laserplot_core::units::{parse_unit_token, precision_for_tolerance};
use laserplot_core::{DialectKind, Position, Units};

/// Default positional tolerance in machine units
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Options fixed at construction time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceOptions {
    /// Distance below which two points are the same place; also sets the
    /// number of decimals written for each axis
    pub tolerance: f64,
    /// Carry a pending speed change as an `F` word on the next move.
    ///
    /// Off by default: the MakeBlock firmware derives its speed from laser
    /// timing and has no separate speed command.
    pub emit_speed_commands: bool,
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            emit_speed_commands: false,
        }
    }
}

/// Tracked machine state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MachineState {
    /// Last position actually emitted; `None` until the first resolved move
    pub position: Option<Position>,
    /// Speed requested by the last `set_movement_speed`
    pub pending_speed: Option<f64>,
    /// Speed last written to the device
    pub current_speed: Option<f64>,
    /// Native power last written; `None` until the first power command
    pub power: Option<f64>,
}

/// Stateful translator from primitives to device command lines.
///
/// One instance serves one program assembly at a time.
#[derive(Debug)]
pub struct CommandInterface {
    dialect: Box<dyn CommandDialect>,
    options: InterfaceOptions,
    precision: usize,
    state: MachineState,
}

impl Default for CommandInterface {
    fn default() -> Self {
        Self::for_kind(DialectKind::default(), InterfaceOptions::default())
    }
}

impl CommandInterface {
    /// Create an interface around an explicit dialect
    pub fn new(dialect: Box<dyn CommandDialect>, options: InterfaceOptions) -> Self {
        Self {
            dialect,
            precision: precision_for_tolerance(options.tolerance),
            options,
            state: MachineState::default(),
        }
    }

    /// Create an interface for one of the built-in dialects
    pub fn for_kind(kind: DialectKind, options: InterfaceOptions) -> Self {
        Self::new(dialect::for_kind(kind), options)
    }

    pub fn dialect(&self) -> &dyn CommandDialect {
        self.dialect.as_ref()
    }

    pub fn options(&self) -> &InterfaceOptions {
        &self.options
    }

    pub fn tolerance(&self) -> f64 {
        self.options.tolerance
    }

    /// Decimal places written for each axis
    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Last emitted position, if any
    pub fn position(&self) -> Option<Position> {
        self.state.position
    }

    /// Last written power on the dialect's native scale, if any
    pub fn laser_power(&self) -> Option<f64> {
        self.state.power
    }

    /// Whether the last written power burns
    pub fn is_laser_on(&self) -> bool {
        let (min, _) = self.dialect.power_range();
        self.state.power.is_some_and(|p| p > min)
    }

    /// Forget all tracked state, as for a fresh job
    pub fn reset(&mut self) {
        self.state = MachineState::default();
    }

    /// Select units from a token such as `"mm"` or `"inch"`.
    ///
    /// An unrecognized token is logged and yields an empty line.
    pub fn set_unit(&self, token: &str) -> String {
        match parse_unit_token(token) {
            Ok(units) => self.set_units(units),
            Err(e) => {
                tracing::warn!("{}; unit select skipped", e);
                String::new()
            }
        }
    }

    /// Select units from an already parsed [`Units`]
    pub fn set_units(&self, units: Units) -> String {
        self.dialect.unit(units)
    }

    pub fn set_absolute_coordinates(&self) -> String {
        self.dialect.absolute_coordinates()
    }

    pub fn set_relative_coordinates(&self) -> String {
        self.dialect.relative_coordinates()
    }

    /// Record `speed` as pending. Always returns an empty line; when speed
    /// emission is enabled the speed rides on the next move as a feed word.
    pub fn set_movement_speed(&mut self, speed: f64) -> String {
        self.state.pending_speed = Some(speed);
        String::new()
    }

    /// Move with the tool engaged
    pub fn cutting_move(&mut self, x: Option<f64>, y: Option<f64>) -> String {
        self.linear_move(MotionType::Linear, x, y)
    }

    /// Travel move with the tool disengaged
    pub fn non_cutting_move(&mut self, x: Option<f64>, y: Option<f64>) -> String {
        self.linear_move(MotionType::Rapid, x, y)
    }

    /// Cutting move to a fully specified position
    pub fn cut_to(&mut self, target: Position) -> String {
        self.cutting_move(Some(target.x), Some(target.y))
    }

    /// Travel move to a fully specified position
    pub fn travel_to(&mut self, target: Position) -> String {
        self.non_cutting_move(Some(target.x), Some(target.y))
    }

    fn linear_move(&mut self, motion: MotionType, x: Option<f64>, y: Option<f64>) -> String {
        let x = finite_axis("X", x);
        let y = finite_axis("Y", y);

        if x.is_none() && y.is_none() {
            tracing::warn!("{:?} move issued without any axis; nothing emitted", motion);
            return String::new();
        }

        let resolved = match (x, y, self.state.position) {
            (Some(x), Some(y), _) => Some(Position::new(x, y)),
            (Some(x), None, Some(last)) => Some(Position::new(x, last.y)),
            (None, Some(y), Some(last)) => Some(Position::new(last.x, y)),
            _ => None,
        };

        let (out_x, out_y) = match resolved {
            Some(p) => (Some(p.x), Some(p.y)),
            None => (x, y),
        };

        let feed = self.take_feed();
        let command = self
            .dialect
            .linear_move(motion, out_x, out_y, feed, self.precision);

        if let Some(p) = resolved {
            self.state.position = Some(p);
        }

        command
    }

    fn take_feed(&mut self) -> Option<f64> {
        if !self.options.emit_speed_commands {
            return None;
        }
        match self.state.pending_speed {
            Some(speed) if self.state.current_speed != Some(speed) => {
                self.state.current_speed = Some(speed);
                Some(speed)
            }
            _ => None,
        }
    }

    /// Map a power level in [0, 1] onto the dialect's native scale.
    ///
    /// Values outside the range (NaN included) are rejected, never clamped.
    pub fn native_power(&self, power: f64) -> CamToolResult<f64> {
        if !(0.0..=1.0).contains(&power) {
            return Err(ParameterError::OutOfRange {
                name: "laser_power".to_string(),
                value: power,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let (min, max) = self.dialect.power_range();
        Ok(min + (max - min) * power)
    }

    /// Set laser power; fails for power outside [0, 1]
    pub fn set_laser_power(&mut self, power: f64) -> CamToolResult<String> {
        let native = self.native_power(power)?;
        Ok(self.write_power(native))
    }

    /// Laser power 0
    pub fn laser_off(&mut self) -> String {
        let (min, _) = self.dialect.power_range();
        self.write_power(min)
    }

    fn write_power(&mut self, native: f64) -> String {
        self.state.power = Some(native);
        self.dialect.power(native)
    }

    pub fn dwell(&self, milliseconds: u64) -> String {
        self.dialect.dwell(milliseconds)
    }

    /// Declare the current location to be (0, 0).
    ///
    /// Re-zeroes the tracked position as well; any previously tracked
    /// coordinate is discarded.
    pub fn set_origin_at_position(&mut self) -> String {
        self.state.position = Some(Position::origin());
        self.dialect.origin_at_position()
    }

    /// Run the homing cycle. The tracked position is left untouched since
    /// the home location is device-defined.
    pub fn home_axes(&self) -> String {
        self.dialect.home_axes()
    }

    pub fn comment(&self, text: &str) -> String {
        self.dialect.comment(text)
    }
}

fn finite_axis(axis: &str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            tracing::warn!("Ignoring non-finite {} axis value {}", axis, v);
            None
        }
        other => other,
    }
}
