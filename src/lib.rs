//! # laserplot
//!
//! G-code synthesis for XY laser and pen plotters. Vector artwork (SVG
//! paths) and bitmaps are turned into a line-oriented command stream for a
//! MakeBlock XY plotter or a GRBL laser.
//!
//! ## Architecture
//!
//! laserplot is organized as a workspace with multiple crates:
//!
//! 1. **laserplot-core** - Positions, units, paper sizes, shared errors
//! 2. **laserplot-camtools** - Command dialects, emitters, sampler, compiler,
//!    SVG and bitmap ingestion
//! 3. **laserplot-settings** - Configuration file handling and validation
//! 4. **laserplot** - CLI binary that ties configuration to the compiler

pub mod job;

pub use laserplot_core::{DialectKind, DitherMethod, PaperSize, Position, PowerCurve, Units};

pub use laserplot_camtools::{
    CamToolError, CamToolResult, CommandInterface, Compiler, CompilerParameters, CutParameters,
    InterfaceOptions, LineSegmentChain, PathSampler, PixelGrid, Program, RasterParameters,
    SvgDocument,
};

pub use laserplot_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Log lines go to stderr so a program written to stdout stays clean.
/// `RUST_LOG` is honoured; otherwise the level is INFO, raised to DEBUG by
/// one `-v` and TRACE by two or more.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .with_level(true)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(())
}
