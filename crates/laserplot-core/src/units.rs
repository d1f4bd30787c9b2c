//! Unit conversion utilities
//!
//! Handles conversion between metric (mm) and imperial (inch) lengths,
//! unit token parsing, and the precision implied by a positional tolerance.

use crate::data::Units;
use crate::error::GcodeError;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Parse a unit token as written in configuration or by a caller.
///
/// Accepts `mm`/`millimeter(s)` and `in`/`inch(es)`, case-insensitively.
pub fn parse_unit_token(token: &str) -> Result<Units, GcodeError> {
    match token.trim().to_lowercase().as_str() {
        "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Ok(Units::MM),
        "in" | "inch" | "inches" => Ok(Units::INCH),
        _ => Err(GcodeError::UnknownUnit {
            token: token.to_string(),
        }),
    }
}

/// Convert inches to millimeters, rounded to two decimals.
pub fn inches_to_mm(inches: f64) -> f64 {
    (inches * MM_PER_INCH * 100.0).round() / 100.0
}

/// Number of decimal places implied by a positional tolerance.
///
/// A tolerance of `0.01` yields 2, `0.001` yields 3. Tolerances at or above
/// one unit yield 0.
pub fn precision_for_tolerance(tolerance: f64) -> usize {
    if !(tolerance.is_finite() && tolerance > 0.0) || tolerance >= 1.0 {
        return 0;
    }
    tolerance.log10().round().abs() as usize
}

/// Format a length with the given number of decimals
///
/// * `value` - Value in the target unit
/// * `precision` - Decimal places
pub fn format_length(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Get the unit label for the given units ("mm" or "in")
pub fn get_unit_label(units: Units) -> &'static str {
    match units {
        Units::MM => "mm",
        Units::INCH => "in",
        Units::Unknown => "",
    }
}
