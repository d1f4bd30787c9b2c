//! SVG path ingestion
//!
//! Pulls `<path>` elements out of an SVG document and turns their `d` data
//! into [`CurvePath`]s. Two non-standard attributes are honoured per path:
//! `power` (laser power in [0, 1], default 1) and `passes` (default 1).
//!
//! Each `M`/`m` starts a new subpath, so a path never cuts across the jump
//! between its subpaths. Coordinates stay in the SVG frame; the
//! [`PathSampler`] flips them into the machine frame.

use crate::error::{CamToolError, CamToolResult, FileFormatError, FileFormatResult};
use crate::sampler::{Curve, CurvePath, CurveSegment, PathSampler, SampledPath};
use laserplot_core::Position;
use lyon::geom::{Angle, Arc, ArcFlags, Point, SvgArc, Vector};
use regex::Regex;
use std::path::Path;
use std::time::Duration;

/// One `<path>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    pub subpaths: Vec<CurvePath>,
    /// Laser power in [0, 1]; checked when the path is emitted
    pub power: f64,
    pub passes: u32,
}

impl SvgPath {
    /// Parse path data with the given attributes
    pub fn parse(data: &str, power: f64, passes: u32) -> FileFormatResult<Self> {
        Ok(Self {
            subpaths: parse_path_data(data)?,
            power,
            passes,
        })
    }

    pub fn length(&self) -> f64 {
        self.subpaths.iter().map(Curve::length).sum()
    }
}

/// All paths found in one SVG document, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgDocument {
    paths: Vec<SvgPath>,
}

impl SvgDocument {
    /// Load and parse an SVG file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CamToolResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CamToolError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Err(FileFormatError::EmptyFile(path.display().to_string()).into());
        }
        let document = Self::parse(&content)?;
        tracing::debug!(
            "Loaded {} paths from {}",
            document.paths.len(),
            path.display()
        );
        Ok(document)
    }

    /// Parse SVG markup
    pub fn parse(content: &str) -> CamToolResult<Self> {
        let re_path = build_regex(r"<path\b([^>]*)>")?;
        let re_d = build_regex(r#"(?:^|\s)d\s*=\s*["']([^"']*)["']"#)?;
        let re_power = build_regex(r#"(?:^|\s)power\s*=\s*["']([^"']*)["']"#)?;
        let re_passes = build_regex(r#"(?:^|\s)passes\s*=\s*["']([^"']*)["']"#)?;

        let mut paths = Vec::new();
        for cap in re_path.captures_iter(content) {
            let attrs = &cap[1];
            let Some(d_cap) = re_d.captures(attrs) else {
                continue;
            };
            let data = d_cap[1].trim();
            if data.is_empty() {
                continue;
            }

            let power = match re_power.captures(attrs) {
                Some(c) => parse_attribute::<f64>("power", &c[1])?,
                None => 1.0,
            };
            let passes = match re_passes.captures(attrs) {
                Some(c) => parse_attribute::<u32>("passes", &c[1])?,
                None => 1,
            };

            paths.push(SvgPath::parse(data, power, passes)?);
        }

        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[SvgPath] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Every subpath of every path, in document order
    pub fn curves(&self) -> impl Iterator<Item = &CurvePath> {
        self.paths.iter().flat_map(|p| p.subpaths.iter())
    }

    /// Summed arc length of all paths, in document units
    pub fn total_length(&self) -> f64 {
        self.paths.iter().map(SvgPath::length).sum()
    }

    /// Time to trace every path once at `units_per_second`
    pub fn estimated_time(&self, units_per_second: f64) -> CamToolResult<Duration> {
        if !(units_per_second.is_finite() && units_per_second > 0.0) {
            return Err(CamToolError::InvalidParameters(format!(
                "speed must be positive, got {}",
                units_per_second
            )));
        }
        Duration::try_from_secs_f64(self.total_length() / units_per_second)
            .map_err(|e| CamToolError::GenerationFailed(format!("time estimate: {}", e)))
    }

    /// Sample every subpath, carrying its path's power and passes
    pub fn sampled_paths(&self, sampler: &PathSampler) -> CamToolResult<Vec<SampledPath>> {
        let paths = self
            .paths
            .iter()
            .flat_map(|path| {
                path.subpaths
                    .iter()
                    .map(move |curve| sampler.sample_path(curve, path.power, path.passes))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }
}

/// Human-readable duration: `"1h 2m 3s"`, or `"2m 3s"` under an hour
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

fn build_regex(pattern: &str) -> FileFormatResult<Regex> {
    Regex::new(pattern).map_err(|e| FileFormatError::SvgParseError(e.to_string()))
}

fn parse_attribute<T: std::str::FromStr>(name: &str, value: &str) -> FileFormatResult<T> {
    value.trim().parse().map_err(|_| {
        FileFormatError::SvgParseError(format!("invalid {} attribute: {:?}", name, value))
    })
}

/// Largest coordinate magnitude accepted in path data
const MAX_COORDINATE: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// Split path data into commands and numbers.
///
/// Handles the compact forms `10-5` and `.5.5` as well as exponents.
fn tokenize_path_data(data: &str) -> FileFormatResult<Vec<Token>> {
    fn flush(current: &mut String, tokens: &mut Vec<Token>) -> FileFormatResult<()> {
        if !current.is_empty() {
            let value = current.parse::<f64>().map_err(|_| {
                FileFormatError::SvgParseError(format!("invalid number {:?}", current))
            })?;
            if !value.is_finite() || value.abs() > MAX_COORDINATE {
                return Err(FileFormatError::SvgParseError(format!(
                    "number {:?} out of range (limit {:e})",
                    current, MAX_COORDINATE
                )));
            }
            tokens.push(Token::Number(value));
            current.clear();
        }
        Ok(())
    }

    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in data.chars() {
        match ch {
            'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q' | 'q'
            | 'T' | 't' | 'A' | 'a' | 'Z' | 'z' => {
                flush(&mut current, &mut tokens)?;
                tokens.push(Token::Command(ch));
            }
            ' ' | ',' | '\n' | '\r' | '\t' => flush(&mut current, &mut tokens)?,
            '-' | '+' => {
                if !current.ends_with(['e', 'E']) {
                    flush(&mut current, &mut tokens)?;
                }
                current.push(ch);
            }
            '.' => {
                if current.contains(['.', 'e', 'E']) {
                    flush(&mut current, &mut tokens)?;
                }
                current.push(ch);
            }
            '0'..='9' | 'e' | 'E' => current.push(ch),
            other => {
                return Err(FileFormatError::SvgParseError(format!(
                    "unexpected character {:?} in path data",
                    other
                )))
            }
        }
    }
    flush(&mut current, &mut tokens)?;
    Ok(tokens)
}

fn argument_count(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

/// Incremental subpath construction
#[derive(Debug, Default)]
struct PathBuilder {
    current: Position,
    subpath_start: Position,
    segments: Vec<CurveSegment>,
    finished: Vec<CurvePath>,
    last_cubic_ctrl: Option<Position>,
    last_quad_ctrl: Option<Position>,
}

impl PathBuilder {
    fn finish_subpath(&mut self) -> FileFormatResult<()> {
        if !self.segments.is_empty() {
            let segments = std::mem::take(&mut self.segments);
            let path = CurvePath::from_segments(segments)
                .map_err(|e| FileFormatError::SvgParseError(e.to_string()))?;
            self.finished.push(path);
        }
        Ok(())
    }

    fn resolve(&self, relative: bool, x: f64, y: f64) -> Position {
        if relative {
            Position::new(self.current.x + x, self.current.y + y)
        } else {
            Position::new(x, y)
        }
    }

    fn push(&mut self, segment: CurveSegment) {
        self.current = segment.end();
        self.segments.push(segment);
    }

    fn line_to(&mut self, to: Position) {
        self.push(CurveSegment::line(self.current, to));
    }

    fn apply(&mut self, command: char, args: &[f64]) -> FileFormatResult<()> {
        let relative = command.is_ascii_lowercase();
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match command.to_ascii_uppercase() {
            'M' => {
                self.finish_subpath()?;
                self.current = self.resolve(relative, args[0], args[1]);
                self.subpath_start = self.current;
            }
            'L' => {
                let to = self.resolve(relative, args[0], args[1]);
                self.line_to(to);
            }
            'H' => {
                let x = if relative { self.current.x + args[0] } else { args[0] };
                self.line_to(Position::new(x, self.current.y));
            }
            'V' => {
                let y = if relative { self.current.y + args[0] } else { args[0] };
                self.line_to(Position::new(self.current.x, y));
            }
            'C' => {
                let c1 = self.resolve(relative, args[0], args[1]);
                let c2 = self.resolve(relative, args[2], args[3]);
                let to = self.resolve(relative, args[4], args[5]);
                self.push(CurveSegment::cubic(self.current, c1, c2, to));
                cubic_ctrl = Some(c2);
            }
            'S' => {
                let c1 = reflect(self.last_cubic_ctrl, self.current);
                let c2 = self.resolve(relative, args[0], args[1]);
                let to = self.resolve(relative, args[2], args[3]);
                self.push(CurveSegment::cubic(self.current, c1, c2, to));
                cubic_ctrl = Some(c2);
            }
            'Q' => {
                let ctrl = self.resolve(relative, args[0], args[1]);
                let to = self.resolve(relative, args[2], args[3]);
                self.push(CurveSegment::quadratic(self.current, ctrl, to));
                quad_ctrl = Some(ctrl);
            }
            'T' => {
                let ctrl = reflect(self.last_quad_ctrl, self.current);
                let to = self.resolve(relative, args[0], args[1]);
                self.push(CurveSegment::quadratic(self.current, ctrl, to));
                quad_ctrl = Some(ctrl);
            }
            'A' => {
                let to = self.resolve(relative, args[5], args[6]);
                self.arc_to(args[0], args[1], args[2], args[3] != 0.0, args[4] != 0.0, to);
            }
            'Z' => {
                if self.current != self.subpath_start {
                    self.line_to(self.subpath_start);
                }
                self.current = self.subpath_start;
            }
            other => {
                return Err(FileFormatError::SvgParseError(format!(
                    "unsupported path command {:?}",
                    other
                )))
            }
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
        Ok(())
    }

    fn arc_to(&mut self, rx: f64, ry: f64, rotation: f64, large_arc: bool, sweep: bool, to: Position) {
        let svg_arc = SvgArc {
            from: Point::new(self.current.x, self.current.y),
            to: Point::new(to.x, to.y),
            radii: Vector::new(rx.abs(), ry.abs()),
            x_rotation: Angle::degrees(rotation),
            flags: ArcFlags { large_arc, sweep },
        };

        if svg_arc.is_straight_line() {
            self.line_to(to);
            return;
        }

        let mut cubics = Vec::new();
        Arc::from_svg_arc(&svg_arc).for_each_cubic_bezier(&mut |segment| {
            cubics.push(*segment);
        });
        for segment in cubics {
            self.segments.push(CurveSegment::Cubic(segment));
        }
        // Land exactly on the requested end point
        self.current = to;
    }

    fn finish(mut self) -> FileFormatResult<Vec<CurvePath>> {
        self.finish_subpath()?;
        Ok(self.finished)
    }
}

fn reflect(ctrl: Option<Position>, about: Position) -> Position {
    match ctrl {
        Some(c) => Position::new(2.0 * about.x - c.x, 2.0 * about.y - c.y),
        None => about,
    }
}

/// Parse the `d` attribute of a path into one [`CurvePath`] per subpath
pub fn parse_path_data(data: &str) -> FileFormatResult<Vec<CurvePath>> {
    let tokens = tokenize_path_data(data)?;
    let mut builder = PathBuilder::default();
    let mut command: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let current = match tokens[i] {
            Token::Command(c) => {
                i += 1;
                c
            }
            Token::Number(_) => command.ok_or_else(|| {
                FileFormatError::SvgParseError("path data must start with a command".to_string())
            })?,
        };

        let count = argument_count(current);
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            match tokens.get(i) {
                Some(Token::Number(v)) => args.push(*v),
                _ => {
                    return Err(FileFormatError::SvgParseError(format!(
                        "command {:?} expects {} arguments",
                        current, count
                    )))
                }
            }
            i += 1;
        }

        builder.apply(current, &args)?;

        // Extra coordinate pairs after a moveto are implicit linetos
        command = match current {
            'M' => Some('L'),
            'm' => Some('l'),
            'Z' | 'z' => None,
            other => Some(other),
        };
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn close(a: Position, b: Position) -> bool {
        a.distance_to(&b) < 1e-6
    }

    #[test]
    fn test_tokenize_compact_numbers() {
        let tokens = tokenize_path_data("M10-5L.5.5 1e-1,2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(-5.0),
                Token::Command('L'),
                Token::Number(0.5),
                Token::Number(0.5),
                Token::Number(0.1),
                Token::Number(2.0),
            ]
        );
        assert!(tokenize_path_data("M 1 1 # 2").is_err());
    }

    #[test]
    fn test_lines_and_implicit_lineto() {
        let paths = parse_path_data("M 0 0 10 0 l 0 10 H 0 z").unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.segments().len(), 4);
        assert!((path.length() - 40.0).abs() < 1e-9);
        assert!(close(path.end(), p(0.0, 0.0)));
    }

    #[test]
    fn test_subpaths_split_on_moveto() {
        let paths = parse_path_data("M0 0 L5 0 M10 10 l0 5").unwrap();
        assert_eq!(paths.len(), 2);
        assert!(close(paths[1].start(), p(10.0, 10.0)));
        assert!(close(paths[1].end(), p(10.0, 15.0)));
    }

    #[test]
    fn test_smooth_curves_reflect_control_points() {
        let paths = parse_path_data("M0 0 C0 1 1 1 1 0 S2 -1 2 0").unwrap();
        match paths[0].segments()[1] {
            CurveSegment::Cubic(c) => {
                assert!((c.ctrl1.x - 1.0).abs() < 1e-9);
                assert!((c.ctrl1.y + 1.0).abs() < 1e-9);
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_becomes_cubics() {
        let paths = parse_path_data("M0 0 A5 5 0 0 1 10 0").unwrap();
        let path = &paths[0];
        assert!(path
            .segments()
            .iter()
            .all(|s| matches!(s, CurveSegment::Cubic(_))));
        // Half circle of radius 5
        assert!((path.length() - 5.0 * std::f64::consts::PI).abs() < 0.05);
    }

    #[test]
    fn test_degenerate_arc_is_line() {
        let paths = parse_path_data("M0 0 A0 0 0 0 1 3 4").unwrap();
        assert!(matches!(paths[0].segments()[0], CurveSegment::Line(_)));
        assert!((paths[0].length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_path_data() {
        assert!(parse_path_data("10 10").is_err());
        assert!(parse_path_data("M 10").is_err());
    }

    #[test]
    fn test_out_of_range_numbers_rejected() {
        assert!(matches!(
            parse_path_data("M0 0 L1e999 0"),
            Err(FileFormatError::SvgParseError(_))
        ));
        assert!(parse_path_data("M0 0 L-1e999 0").is_err());
        assert!(parse_path_data("M1e308 0 l1e308 0").is_err());
        assert!(parse_path_data("M0 0 L1e9 0").is_ok());
        assert!(SvgDocument::parse(r#"<path d="M0 0 L1e999 0"/>"#).is_err());
    }

    #[test]
    fn test_oversized_path_fails_to_sample() {
        let doc = SvgDocument::parse(r#"<path d="M0 0 L1e9 0"/>"#).unwrap();
        let sampler = PathSampler::new(5.0, 0.0).unwrap();
        assert!(doc.sampled_paths(&sampler).is_err());
    }

    #[test]
    fn test_document_attributes() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <path id="a" d="M0 0 L10 0" power="0.5" passes="3"/>
            <path d="M0 0 L0 20"></path>
            <rect width="5" height="5"/>
        </svg>"#;
        let doc = SvgDocument::parse(svg).unwrap();
        assert_eq!(doc.paths().len(), 2);
        assert_eq!(doc.paths()[0].power, 0.5);
        assert_eq!(doc.paths()[0].passes, 3);
        assert_eq!(doc.paths()[1].power, 1.0);
        assert_eq!(doc.paths()[1].passes, 1);
        assert!((doc.total_length() - 30.0).abs() < 1e-9);

        let bad = r#"<path d="M0 0 L1 1" passes="many"/>"#;
        assert!(SvgDocument::parse(bad).is_err());
    }

    #[test]
    fn test_estimated_time() {
        let doc = SvgDocument::parse(r#"<path d="M0 0 H 3723"/>"#).unwrap();
        let time = doc.estimated_time(1.0).unwrap();
        assert_eq!(format_duration(time), "1h 2m 3s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert!(doc.estimated_time(0.0).is_err());
    }

    #[test]
    fn test_sampled_paths_carry_attributes() {
        let doc = SvgDocument::parse(r#"<path d="M0 0 L2 0 M5 5 L5 6" power="0.25" passes="2"/>"#)
            .unwrap();
        let sampler = PathSampler::new(1.0, 10.0).unwrap();
        let sampled = doc.sampled_paths(&sampler).unwrap();
        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled[0].points.len(), 3);
        assert_eq!(sampled[0].points[0], p(0.0, 10.0));
        assert_eq!(sampled[1].points.len(), 2);
        assert!(sampled.iter().all(|s| s.power == 0.25 && s.passes == 2));
    }
}
