//! Device command dialects
//!
//! Every supported firmware spells the same motion/power primitives
//! differently. A [`CommandDialect`] owns those spellings so the emitters
//! never hardcode a command code.
//!
//! Supported dialects:
//! - MakeBlock XY plotter firmware
//! - GRBL in laser mode

mod grbl;
mod makeblock;

pub use grbl::GrblDialect;
pub use makeblock::MakeBlockDialect;

use laserplot_core::units::format_length;
use laserplot_core::{DialectKind, Units};
use std::fmt;

/// Motion types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    /// Rapid/travel movement, tool disengaged
    Rapid,
    /// Linear interpolated movement, tool engaged
    Linear,
}

/// Formatting strings for one firmware's command vocabulary.
///
/// Implementations are stateless; tracked machine state lives in
/// [`crate::interface::CommandInterface`].
pub trait CommandDialect: fmt::Debug + Send + Sync {
    /// Human-readable dialect name
    fn name(&self) -> &'static str;

    /// Unit select; `Units::Unknown` yields an empty line
    fn unit(&self, units: Units) -> String {
        match units {
            Units::MM => "G21".to_string(),
            Units::INCH => "G20".to_string(),
            Units::Unknown => String::new(),
        }
    }

    /// Absolute coordinate mode
    fn absolute_coordinates(&self) -> String {
        "G90".to_string()
    }

    /// Relative coordinate mode
    fn relative_coordinates(&self) -> String {
        "G91".to_string()
    }

    /// Command word for a motion type
    fn motion_code(&self, motion: MotionType) -> &'static str {
        match motion {
            MotionType::Rapid => "G0",
            MotionType::Linear => "G1",
        }
    }

    /// Linear move with optional axes and an optional feed word.
    ///
    /// Axes are written with `precision` decimals; absent axes are omitted.
    fn linear_move(
        &self,
        motion: MotionType,
        x: Option<f64>,
        y: Option<f64>,
        feed: Option<f64>,
        precision: usize,
    ) -> String {
        let mut command = self.motion_code(motion).to_string();
        if let Some(x) = x {
            command.push_str(&format!(" X{}", format_length(x, precision)));
        }
        if let Some(y) = y {
            command.push_str(&format!(" Y{}", format_length(y, precision)));
        }
        if let Some(feed) = feed {
            command.push_str(&format!(" F{}", feed));
        }
        command
    }

    /// Native power scale as (min, max); power 0.0 maps to min, 1.0 to max
    fn power_range(&self) -> (f64, f64);

    /// Power set, given a value already mapped onto [`Self::power_range`]
    fn power(&self, native: f64) -> String;

    /// Dwell for the given number of milliseconds
    fn dwell(&self, milliseconds: u64) -> String;

    /// Declare the current position to be the origin
    fn origin_at_position(&self) -> String;

    /// Run the homing cycle
    fn home_axes(&self) -> String;

    /// Comment line
    fn comment(&self, text: &str) -> String {
        format!("; {}", text)
    }
}

/// Build the dialect selected by `kind`
pub fn for_kind(kind: DialectKind) -> Box<dyn CommandDialect> {
    match kind {
        DialectKind::MakeBlock => Box::new(MakeBlockDialect),
        DialectKind::Grbl => Box::new(GrblDialect),
    }
}

/// Round to `decimals` places, used when printing native power values
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
