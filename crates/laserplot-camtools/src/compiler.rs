//! Program assembly
//!
//! The [`Compiler`] owns the body of a job and the boilerplate around it.
//! Header, footer, and between-item lines are pre-formatted once at
//! construction; every `append_*` call adds to the body; [`Compiler::compile`]
//! lays out `header, body × passes, footer` into a finished [`Program`].
//!
//! The compiler performs no I/O. Writing the program to a file or a device
//! is left to the caller.

use crate::error::{CamToolError, CamToolResult};
use crate::geometry::LineSegmentChain;
use crate::interface::CommandInterface;
use crate::line_emitter::{CutParameters, LineSegmentEmitter};
use crate::raster::{PixelGrid, RasterParameters, RasterScanEmitter};
use crate::sampler::{Curve, PathSampler, SampledPath};
use std::fmt;

/// Assembly configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerParameters {
    pub cut: CutParameters,
    /// Depth removed per pass; advisory only
    pub pass_depth: f64,
    /// Unit token for the header, e.g. `"mm"`; `None` leaves units unset
    pub unit: Option<String>,
    /// Lines after the standard header; `None` means a single laser off
    pub custom_header: Option<Vec<String>>,
    /// Footer lines; `None` means a single laser off
    pub custom_footer: Option<Vec<String>>,
    /// Lines inserted before every appended item
    pub between_items: Vec<String>,
    pub raster: RasterParameters,
}

impl Default for CompilerParameters {
    fn default() -> Self {
        Self {
            cut: CutParameters::default(),
            pass_depth: 5.0,
            unit: None,
            custom_header: None,
            custom_footer: None,
            between_items: Vec::new(),
            raster: RasterParameters::default(),
        }
    }
}

/// A finished command stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<String>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append one line; empty lines are dropped
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if !line.is_empty() {
            self.lines.push(line);
        }
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push(line);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Program {
    /// One command per line, each terminated by a newline
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Sequences emitter output into a finished program
#[derive(Debug)]
pub struct Compiler {
    interface: CommandInterface,
    params: CompilerParameters,
    header: Vec<String>,
    footer: Vec<String>,
    body: Vec<String>,
}

impl Compiler {
    /// Build a compiler, formatting header and footer through `interface`
    pub fn new(mut interface: CommandInterface, params: CompilerParameters) -> CamToolResult<Self> {
        params.cut.validate()?;

        let mut header = Vec::new();
        if let Some(unit) = params.unit.as_deref() {
            header.push(interface.set_unit(unit));
        }
        header.push(interface.set_absolute_coordinates());
        header.push(interface.set_movement_speed(params.cut.movement_speed));
        match &params.custom_header {
            Some(lines) => header.extend(lines.iter().cloned()),
            None => header.push(interface.laser_off()),
        }

        let footer = match &params.custom_footer {
            Some(lines) => lines.clone(),
            None => vec![interface.laser_off()],
        };

        Ok(Self {
            interface,
            params,
            header,
            footer,
            body: Vec::new(),
        })
    }

    pub fn interface(&self) -> &CommandInterface {
        &self.interface
    }

    /// Mutable access for callers that format their own lines
    pub fn interface_mut(&mut self) -> &mut CommandInterface {
        &mut self.interface
    }

    pub fn params(&self) -> &CompilerParameters {
        &self.params
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn footer(&self) -> &[String] {
        &self.footer
    }

    /// Accumulated body lines, including empty no-op lines
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Empty the body and forget tracked machine state; header and footer
    /// are kept
    pub fn clear(&mut self) {
        self.body.clear();
        self.interface.reset();
    }

    fn push_between_items(&mut self) {
        self.body.extend(self.params.between_items.iter().cloned());
    }

    /// Append a segment chain
    pub fn append_chain(&mut self, chain: &LineSegmentChain) -> CamToolResult<()> {
        let mut lines = self.params.between_items.clone();
        LineSegmentEmitter::new(self.params.cut).emit(&mut self.interface, chain, &mut lines)?;
        self.body.extend(lines);
        Ok(())
    }

    /// Append several segment chains in order
    pub fn append_chains<'a, I>(&mut self, chains: I) -> CamToolResult<()>
    where
        I: IntoIterator<Item = &'a LineSegmentChain>,
    {
        for chain in chains {
            self.append_chain(chain)?;
        }
        Ok(())
    }

    /// Sample a curve and append it as a segment chain
    pub fn append_curve<C: Curve + ?Sized>(
        &mut self,
        curve: &C,
        sampler: &PathSampler,
    ) -> CamToolResult<()> {
        let points = sampler.sample(curve)?;
        self.append_chain(&LineSegmentChain::from_points(&points))
    }

    /// Append a full raster scan
    pub fn append_raster(&mut self, grid: &PixelGrid) -> CamToolResult<()> {
        let mut lines = self.params.between_items.clone();
        RasterScanEmitter::new(self.params.raster).emit(&mut self.interface, grid, &mut lines)?;
        self.body.extend(lines);
        Ok(())
    }

    /// Append a sampled path: travel to its first point with the laser off,
    /// set its power, cut through the points `passes` times, then switch the
    /// laser off.
    pub fn append_sampled_path(&mut self, path: &SampledPath) -> CamToolResult<()> {
        self.interface.native_power(path.power)?;

        self.push_between_items();
        let Some(&first) = path.points.first() else {
            tracing::warn!("Sampled path has no points; nothing emitted");
            return Ok(());
        };

        if self.interface.is_laser_on() {
            self.body.push(self.interface.laser_off());
        }
        self.body.push(self.interface.travel_to(first));
        self.body.push(self.interface.set_laser_power(path.power)?);
        for _ in 0..path.passes {
            for &point in &path.points {
                self.body.push(self.interface.cut_to(point));
            }
        }
        self.body.push(self.interface.laser_off());
        Ok(())
    }

    /// Assemble `header, body × passes, footer`, dropping empty lines
    pub fn compile(&self, passes: u32) -> CamToolResult<Program> {
        if passes == 0 {
            return Err(CamToolError::InvalidParameters(
                "passes must be at least 1".to_string(),
            ));
        }
        if passes > 1 {
            tracing::debug!(
                "Compiling {} passes ({} per pass, {} total)",
                passes,
                self.params.pass_depth,
                self.params.pass_depth * f64::from(passes)
            );
        }

        let mut program = Program::new();
        program.extend(self.header.iter().map(String::as_str));
        for _ in 0..passes {
            program.extend(self.body.iter().map(String::as_str));
        }
        program.extend(self.footer.iter().map(String::as_str));
        Ok(program)
    }
}
