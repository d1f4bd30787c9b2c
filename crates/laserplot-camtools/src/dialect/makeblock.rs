//! MakeBlock XY plotter dialect
//!
//! The plotter firmware drives the laser through `M4 <0-100>` and derives
//! travel speed from its own timing; there is no feed command of its own.

use super::{round_to, CommandDialect};

/// Native power scale of the MakeBlock laser command
const MAKEBLOCK_POWER_MAX: f64 = 100.0;

/// MakeBlock XY plotter command vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeBlockDialect;

impl CommandDialect for MakeBlockDialect {
    fn name(&self) -> &'static str {
        "MakeBlock"
    }

    fn power_range(&self) -> (f64, f64) {
        (0.0, MAKEBLOCK_POWER_MAX)
    }

    fn power(&self, native: f64) -> String {
        format!("M4 {:?}", round_to(native, 2))
    }

    fn dwell(&self, milliseconds: u64) -> String {
        format!("G4 P{}", milliseconds)
    }

    fn origin_at_position(&self) -> String {
        "G92 X0 Y0 Z0".to_string()
    }

    fn home_axes(&self) -> String {
        "G28".to_string()
    }
}
