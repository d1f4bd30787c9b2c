//! GRBL laser-mode dialect
//!
//! GRBL with `$32=1` scales laser output by `S` on a 0-1000 spindle range,
//! takes dwell in seconds, and homes with `$H`.

use super::CommandDialect;

/// Default `$30` maximum spindle value
const GRBL_S_MAX: f64 = 1000.0;

/// GRBL laser command vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct GrblDialect;

impl CommandDialect for GrblDialect {
    fn name(&self) -> &'static str {
        "GRBL"
    }

    fn power_range(&self) -> (f64, f64) {
        (0.0, GRBL_S_MAX)
    }

    fn power(&self, native: f64) -> String {
        format!("M4 S{:.0}", native)
    }

    fn dwell(&self, milliseconds: u64) -> String {
        format!("G4 P{:.3}", milliseconds as f64 / 1000.0)
    }

    fn origin_at_position(&self) -> String {
        "G92 X0 Y0".to_string()
    }

    fn home_axes(&self) -> String {
        "$H".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::MotionType;

    #[test]
    fn test_grbl_commands() {
        let d = GrblDialect;
        assert_eq!(d.power(1000.0), "M4 S1000");
        assert_eq!(d.power(0.0), "M4 S0");
        assert_eq!(d.dwell(250), "G4 P0.250");
        assert_eq!(d.origin_at_position(), "G92 X0 Y0");
        assert_eq!(d.home_axes(), "$H");
        assert_eq!(
            d.linear_move(MotionType::Linear, Some(5.0), Some(5.0), Some(1200.0), 3),
            "G1 X5.000 Y5.000 F1200"
        );
    }
}
