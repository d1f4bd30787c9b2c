//! Job assembly from configuration
//!
//! Maps a [`Config`] onto the camtools building blocks and runs whole jobs:
//! an SVG document or a prepared bitmap in, a finished [`Program`] out.

use laserplot_camtools::{
    BitmapOptions, CamToolError, CamToolResult, CommandInterface, Compiler, CompilerParameters,
    CutParameters, InterfaceOptions, PathSampler, PixelGrid, Program, RasterParameters,
    SvgDocument,
};
use laserplot_settings::Config;
use std::path::{Path, PathBuf};

/// Extension of written programs
pub const OUTPUT_EXTENSION: &str = "gcode";

/// How vector paths are turned into moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorMode {
    /// Sampled curves emitted as continuous segment chains with the job power
    #[default]
    Chains,
    /// One sampled sequence per subpath, honouring `power`/`passes` attributes
    Sampled,
}

impl VectorMode {
    pub fn from_config(config: &Config) -> Self {
        if config.vector.sampled {
            Self::Sampled
        } else {
            Self::Chains
        }
    }
}

pub fn interface_options(config: &Config) -> InterfaceOptions {
    InterfaceOptions {
        tolerance: config.machine.tolerance,
        emit_speed_commands: config.machine.emit_speed_commands,
    }
}

pub fn compiler_parameters(config: &Config) -> CompilerParameters {
    let job = &config.job;
    let raster = &config.raster;
    CompilerParameters {
        cut: CutParameters {
            movement_speed: job.movement_speed,
            cutting_speed: job.cutting_speed,
            laser_power: job.laser_power,
            dwell_time: job.dwell_time_ms,
        },
        pass_depth: job.pass_depth,
        unit: Some(job.unit.clone()),
        custom_header: job.custom_header.clone(),
        custom_footer: job.custom_footer.clone(),
        between_items: job.between_items.clone(),
        raster: RasterParameters {
            resolution: raster.resolution,
            min_power: raster.min_power,
            max_power: raster.max_power,
            power_curve: raster.power_curve,
        },
    }
}

/// Compiler for the configured dialect, with its header and footer rendered
pub fn build_compiler(config: &Config) -> CamToolResult<Compiler> {
    let interface = CommandInterface::for_kind(config.machine.dialect, interface_options(config));
    Compiler::new(interface, compiler_parameters(config))
}

pub fn path_sampler(config: &Config) -> CamToolResult<PathSampler> {
    Ok(PathSampler::for_paper(
        config.vector.points_per_unit,
        config.vector.paper_size,
    )?)
}

pub fn bitmap_options(config: &Config) -> BitmapOptions {
    BitmapOptions {
        max_width: config.raster.max_width,
        max_height: config.raster.max_height,
        dither: config.raster.dither,
        threshold: config.raster.threshold,
    }
}

/// Runs documents through one compiler, one program per document
pub struct JobRunner {
    compiler: Compiler,
    sampler: PathSampler,
    passes: u32,
}

impl JobRunner {
    pub fn new(config: &Config) -> CamToolResult<Self> {
        Ok(Self {
            compiler: build_compiler(config)?,
            sampler: path_sampler(config)?,
            passes: config.job.passes,
        })
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Compile an SVG document.
    ///
    /// The body is cleared first, so a runner can be reused across files.
    pub fn compile_svg(&mut self, doc: &SvgDocument, mode: VectorMode) -> CamToolResult<Program> {
        self.compiler.clear();
        if doc.is_empty() {
            tracing::warn!("SVG document has no paths; the program holds only boilerplate");
        }

        match mode {
            VectorMode::Chains => {
                for curve in doc.curves() {
                    self.compiler.append_curve(curve, &self.sampler)?;
                }
            }
            VectorMode::Sampled => {
                for path in doc.sampled_paths(&self.sampler)? {
                    self.compiler.append_sampled_path(&path)?;
                }
            }
        }

        tracing::debug!(
            "{} paths, {} body lines",
            doc.paths().len(),
            self.compiler.body().len()
        );
        self.compiler.compile(self.passes)
    }

    /// Compile a prepared pixel grid
    pub fn compile_raster(&mut self, grid: &PixelGrid) -> CamToolResult<Program> {
        self.compiler.clear();
        self.compiler.append_raster(grid)?;
        tracing::debug!(
            "{}x{} grid, {} marked pixels",
            grid.width(),
            grid.height(),
            grid.mark_count()
        );
        self.compiler.compile(self.passes)
    }
}

/// `<dir>/<stem>.gcode`, or next to the input when no directory is given
pub fn output_path(dir: Option<&Path>, input: &Path) -> CamToolResult<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        CamToolError::InvalidParameters(format!("{} has no file name", input.display()))
    })?;
    let mut name = PathBuf::from(stem);
    name.set_extension(OUTPUT_EXTENSION);

    Ok(match dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    })
}
