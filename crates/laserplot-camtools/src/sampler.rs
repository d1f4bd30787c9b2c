//! Curve sampling
//!
//! [`PathSampler`] turns one analytic curve into an ordered point sequence.
//! The number of points follows the curve's arc length, but the samples
//! themselves are spaced evenly in curve parameter, not in arc length. On a
//! curve whose parameterization is far from arc-length proportional the
//! physical spacing of points is uneven; that is accepted here.
//!
//! Source graphics have their origin top-left, the machine bottom-left, so
//! every sampled point is flipped against the page height.

use crate::error::{ParameterError, ParameterResult};
use crate::geometry::LineSegmentChain;
use laserplot_core::{PaperSize, Position};
use lyon::geom::{CubicBezierSegment, LineSegment, Point, QuadraticBezierSegment};

/// Tolerance used when approximating Bézier arc lengths
const LENGTH_TOLERANCE: f64 = 1e-4;

/// Most intervals a single curve may be sampled into
pub const MAX_INTERVALS: usize = 1_000_000;

/// A curve parameterized over [0, 1]
pub trait Curve {
    /// Arc length
    fn length(&self) -> f64;

    /// Point at normalized parameter `t`
    fn point_at(&self, t: f64) -> Position;
}

fn to_point(p: Position) -> Point<f64> {
    Point::new(p.x, p.y)
}

fn to_position(p: Point<f64>) -> Position {
    Position::new(p.x, p.y)
}

/// One primitive piece of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Line(LineSegment<f64>),
    Quadratic(QuadraticBezierSegment<f64>),
    Cubic(CubicBezierSegment<f64>),
}

impl CurveSegment {
    pub fn line(from: Position, to: Position) -> Self {
        Self::Line(LineSegment {
            from: to_point(from),
            to: to_point(to),
        })
    }

    pub fn quadratic(from: Position, ctrl: Position, to: Position) -> Self {
        Self::Quadratic(QuadraticBezierSegment {
            from: to_point(from),
            ctrl: to_point(ctrl),
            to: to_point(to),
        })
    }

    pub fn cubic(from: Position, ctrl1: Position, ctrl2: Position, to: Position) -> Self {
        Self::Cubic(CubicBezierSegment {
            from: to_point(from),
            ctrl1: to_point(ctrl1),
            ctrl2: to_point(ctrl2),
            to: to_point(to),
        })
    }

    pub fn start(&self) -> Position {
        match self {
            Self::Line(s) => to_position(s.from),
            Self::Quadratic(s) => to_position(s.from),
            Self::Cubic(s) => to_position(s.from),
        }
    }

    pub fn end(&self) -> Position {
        match self {
            Self::Line(s) => to_position(s.to),
            Self::Quadratic(s) => to_position(s.to),
            Self::Cubic(s) => to_position(s.to),
        }
    }
}

impl Curve for CurveSegment {
    fn length(&self) -> f64 {
        match self {
            Self::Line(s) => s.length(),
            Self::Quadratic(s) => s.to_cubic().approximate_length(LENGTH_TOLERANCE),
            Self::Cubic(s) => s.approximate_length(LENGTH_TOLERANCE),
        }
    }

    fn point_at(&self, t: f64) -> Position {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Line(s) => to_position(s.sample(t)),
            Self::Quadratic(s) => to_position(s.sample(t)),
            Self::Cubic(s) => to_position(s.sample(t)),
        }
    }
}

/// A continuous sequence of segments.
///
/// The path parameter is distributed over the segments by their share of
/// the total arc length, so `t = 0.5` lands halfway along the path.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePath {
    segments: Vec<CurveSegment>,
    lengths: Vec<f64>,
    total: f64,
}

impl CurvePath {
    /// Build a path from at least one segment
    pub fn from_segments(segments: Vec<CurveSegment>) -> ParameterResult<Self> {
        if segments.is_empty() {
            return Err(ParameterError::InvalidValue {
                name: "segments".to_string(),
                reason: "a curve path needs at least one segment".to_string(),
            });
        }
        let lengths: Vec<f64> = segments.iter().map(Curve::length).collect();
        let total = lengths.iter().sum();
        Ok(Self {
            segments,
            lengths,
            total,
        })
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn start(&self) -> Position {
        self.segments
            .first()
            .map_or_else(Position::origin, CurveSegment::start)
    }

    pub fn end(&self) -> Position {
        self.segments
            .last()
            .map_or_else(Position::origin, CurveSegment::end)
    }
}

impl Curve for CurvePath {
    fn length(&self) -> f64 {
        self.total
    }

    fn point_at(&self, t: f64) -> Position {
        let mut remaining = t.clamp(0.0, 1.0) * self.total;
        for (segment, &len) in self.segments.iter().zip(&self.lengths) {
            if len > 0.0 && remaining <= len {
                return segment.point_at(remaining / len);
            }
            remaining -= len;
        }
        // t = 1 after rounding drift, or a path of zero length
        if self.total > 0.0 {
            self.end()
        } else {
            self.start()
        }
    }
}

/// An ordered point sequence with the power and repeat count to cut it at
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    pub points: Vec<Position>,
    /// Laser power in [0, 1]
    pub power: f64,
    /// Times the point sequence is cut
    pub passes: u32,
}

impl SampledPath {
    pub fn new(points: Vec<Position>, power: f64, passes: u32) -> Self {
        Self {
            points,
            power,
            passes,
        }
    }

    /// Connected chain through the sampled points
    pub fn to_chain(&self) -> LineSegmentChain {
        LineSegmentChain::from_points(&self.points)
    }
}

/// Samples curves at a fixed density into the machine frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSampler {
    points_per_unit: f64,
    page_height: f64,
}

impl PathSampler {
    pub fn new(points_per_unit: f64, page_height: f64) -> ParameterResult<Self> {
        if !(points_per_unit.is_finite() && points_per_unit > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "points_per_unit".to_string(),
                reason: format!("must be positive, got {}", points_per_unit),
            });
        }
        Ok(Self {
            points_per_unit,
            page_height,
        })
    }

    /// Sampler flipping against the height of a paper size, in mm
    pub fn for_paper(points_per_unit: f64, paper: PaperSize) -> ParameterResult<Self> {
        Self::new(points_per_unit, paper.height_mm())
    }

    pub fn points_per_unit(&self) -> f64 {
        self.points_per_unit
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Number of intervals for a curve of the given length; the sample
    /// count is one more than this.
    ///
    /// Fails for a non-finite length or more than [`MAX_INTERVALS`].
    pub fn interval_count(&self, length: f64) -> ParameterResult<usize> {
        if !length.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: "curve_length".to_string(),
                reason: format!("must be finite, got {}", length),
            });
        }
        let n = (length * self.points_per_unit).round();
        if n > MAX_INTERVALS as f64 {
            return Err(ParameterError::OutOfRange {
                name: "sample_intervals".to_string(),
                value: n,
                min: 0.0,
                max: MAX_INTERVALS as f64,
            });
        }
        Ok(if n > 0.0 { n as usize } else { 0 })
    }

    /// Sample `curve` into the machine frame.
    ///
    /// A zero-length curve yields exactly one point.
    pub fn sample<C: Curve + ?Sized>(&self, curve: &C) -> ParameterResult<Vec<Position>> {
        let n = self.interval_count(curve.length())?;
        if n == 0 {
            return Ok(vec![self.flip(curve.point_at(0.0))]);
        }
        Ok((0..=n)
            .map(|i| self.flip(curve.point_at(i as f64 / n as f64)))
            .collect())
    }

    /// Sample a curve and attach power and pass count
    pub fn sample_path<C: Curve + ?Sized>(
        &self,
        curve: &C,
        power: f64,
        passes: u32,
    ) -> ParameterResult<SampledPath> {
        Ok(SampledPath::new(self.sample(curve)?, power, passes))
    }

    fn flip(&self, p: Position) -> Position {
        Position::new(p.x, self.page_height - p.y)
    }
}
