//! Line segments and connected segment chains

use crate::error::{ParameterError, ParameterResult};
use laserplot_core::Position;

/// Gap allowed between the end of one segment and the start of the next
const CHAIN_CONTINUITY_EPSILON: f64 = 1e-9;

/// A straight segment between two exact positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Position,
    pub end: Position,
}

impl LineSegment {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// An ordered, connected polyline: each segment starts where the previous
/// one ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSegmentChain {
    segments: Vec<LineSegment>,
}

impl LineSegmentChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain through consecutive points.
    ///
    /// Fewer than two points yield an empty chain.
    pub fn from_points(points: &[Position]) -> Self {
        let segments = points
            .windows(2)
            .map(|pair| LineSegment::new(pair[0], pair[1]))
            .collect();
        Self { segments }
    }

    /// Append a segment, rejecting one that does not start at the chain end
    pub fn append(&mut self, segment: LineSegment) -> ParameterResult<()> {
        if let Some(end) = self.end() {
            if !end.is_near(&segment.start, CHAIN_CONTINUITY_EPSILON) {
                return Err(ParameterError::InvalidValue {
                    name: "segment".to_string(),
                    reason: format!(
                        "segment starts at {} but the chain ends at {}",
                        segment.start, end
                    ),
                });
            }
        }
        self.segments.push(segment);
        Ok(())
    }

    /// Extend the chain with a straight segment from its end to `point`
    pub fn line_to(&mut self, point: Position) -> ParameterResult<()> {
        match self.end() {
            Some(end) => self.append(LineSegment::new(end, point)),
            None => Err(ParameterError::InvalidValue {
                name: "segment".to_string(),
                reason: "line_to on an empty chain has no start point".to_string(),
            }),
        }
    }

    pub fn start(&self) -> Option<Position> {
        self.segments.first().map(|s| s.start)
    }

    pub fn end(&self) -> Option<Position> {
        self.segments.last().map(|s| s.end)
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total length of all segments
    pub fn length(&self) -> f64 {
        self.segments.iter().map(LineSegment::length).sum()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl<'a> IntoIterator for &'a LineSegmentChain {
    type Item = &'a LineSegment;
    type IntoIter = std::slice::Iter<'a, LineSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_from_points() {
        let chain = LineSegmentChain::from_points(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0)]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.start(), Some(p(0.0, 0.0)));
        assert_eq!(chain.end(), Some(p(3.0, 4.0)));
        assert_eq!(chain.length(), 7.0);

        assert!(LineSegmentChain::from_points(&[p(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_append_requires_continuity() {
        let mut chain = LineSegmentChain::new();
        chain.append(LineSegment::new(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        chain.line_to(p(1.0, 1.0)).unwrap();
        assert!(chain
            .append(LineSegment::new(p(5.0, 5.0), p(6.0, 6.0)))
            .is_err());
        assert_eq!(chain.len(), 2);

        chain.clear();
        assert!(chain.is_empty());
        assert!(chain.line_to(p(1.0, 1.0)).is_err());
    }
}
