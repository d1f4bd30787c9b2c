//! # laserplot CAM Tools
//!
//! Command-stream synthesis for XY laser/pen plotters: turns motion and
//! power intents into device command text while tracking machine state.
//!
//! ## Core
//!
//! - **Dialects**: per-firmware command spellings behind [`CommandDialect`]
//! - **Command interface**: one line per primitive, tracked position and speed
//! - **Line segment emitter**: connected polylines with continuity optimization
//! - **Raster scan emitter**: zigzag pixel scans with per-pixel power
//! - **Path sampler**: analytic curves to point sequences in the machine frame
//! - **Compiler**: header/body/footer assembly with multi-pass repetition
//!
//! ## Ingestion
//!
//! - **SVG import**: `<path>` data with `power`/`passes` attributes
//! - **Bitmap**: image loading, downscaling and dithering into a pixel grid

pub mod bitmap;
pub mod compiler;
pub mod dialect;
pub mod error;
pub mod geometry;
pub mod interface;
pub mod line_emitter;
pub mod raster;
pub mod sampler;
pub mod svg_import;

pub use bitmap::{load_pixel_grid, pixel_grid_from_image, BitmapOptions};
pub use compiler::{Compiler, CompilerParameters, Program};
pub use dialect::{CommandDialect, GrblDialect, MakeBlockDialect, MotionType};
pub use error::{CamToolError, CamToolResult, FileFormatError, ParameterError};
pub use geometry::{LineSegment, LineSegmentChain};
pub use interface::{CommandInterface, InterfaceOptions, MachineState};
pub use line_emitter::{CutParameters, LineSegmentEmitter};
pub use raster::{column_order, PixelGrid, RasterParameters, RasterScanEmitter};
pub use sampler::{Curve, CurvePath, CurveSegment, PathSampler, SampledPath};
pub use svg_import::{format_duration, SvgDocument, SvgPath};
