//! Machine-side data model
//!
//! Positions, units, paper sizes, and the enumerations used to select a
//! device dialect and a raster treatment at assembly construction time.

use crate::units::{inches_to_mm, parse_unit_token};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length units understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Units {
    /// Millimeters (metric)
    #[default]
    MM,
    /// Inches (imperial)
    INCH,
    /// Unknown or uninitialized
    Unknown,
}

impl Units {
    /// Convert a value from one unit to another
    ///
    /// Returns the original value if units are the same or unknown.
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        if from == to {
            return value;
        }

        match (from, to) {
            (Units::MM, Units::INCH) => value / crate::units::MM_PER_INCH,
            (Units::INCH, Units::MM) => value * crate::units::MM_PER_INCH,
            _ => value,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
            Units::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Units {
    type Err = crate::error::GcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit_token(s)
    }
}

/// A tool position in the XY plane.
///
/// Coordinates are kept exactly as commanded; rounding happens only when a
/// command line is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite(),
            "Position axes must be finite: x={x}, y={y}"
        );
        Self { x, y }
    }

    /// The machine origin
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `other` lies within `tolerance` of this position
    pub fn is_near(&self, other: &Position, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Common paper sizes, defined in inches.
///
/// The vector sampler works in millimeters; use [`PaperSize::size_mm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    Letter,
    Legal,
    A3,
    A4,
    A5,
    Tabloid,
}

impl PaperSize {
    /// All known paper sizes
    pub const ALL: [PaperSize; 6] = [
        PaperSize::Letter,
        PaperSize::Legal,
        PaperSize::A3,
        PaperSize::A4,
        PaperSize::A5,
        PaperSize::Tabloid,
    ];

    /// (width, height) in inches
    pub fn size_in(&self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
            PaperSize::A3 => (11.69, 16.54),
            PaperSize::A4 => (8.27, 11.69),
            PaperSize::A5 => (5.83, 8.27),
            PaperSize::Tabloid => (11.0, 17.0),
        }
    }

    /// (width, height) in millimeters, rounded to two decimals
    pub fn size_mm(&self) -> (f64, f64) {
        let (w, h) = self.size_in();
        (inches_to_mm(w), inches_to_mm(h))
    }

    /// Height in millimeters; the vertical flip reference for sampled paths
    pub fn height_mm(&self) -> f64 {
        self.size_mm().1
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperSize::Letter => write!(f, "Letter"),
            PaperSize::Legal => write!(f, "Legal"),
            PaperSize::A3 => write!(f, "A3"),
            PaperSize::A4 => write!(f, "A4"),
            PaperSize::A5 => write!(f, "A5"),
            PaperSize::Tabloid => write!(f, "Tabloid"),
        }
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaperSize::ALL
            .iter()
            .copied()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown paper size: {}", s))
    }
}

/// Supported device command dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// MakeBlock XY plotter firmware (M4 power 0-100, G28 homing)
    #[default]
    MakeBlock,
    /// GRBL in laser mode (M4 S0-1000, $H homing)
    Grbl,
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MakeBlock => write!(f, "MakeBlock"),
            Self::Grbl => write!(f, "GRBL"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "makeblock" | "mbot" | "xy-plotter" => Ok(Self::MakeBlock),
            "grbl" => Ok(Self::Grbl),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}

/// Binarization applied to raster input before scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DitherMethod {
    /// Fixed threshold
    Threshold,
    /// Error diffusion (Floyd-Steinberg)
    #[default]
    FloydSteinberg,
    /// Keep grayscale; only meaningful with [`PowerCurve::Linear`]
    None,
}

/// Mapping from pixel brightness to laser power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PowerCurve {
    /// 0 burns at maximum power, anything else at minimum power
    #[default]
    Binary,
    /// Darker pixels burn proportionally harder
    Linear,
}
