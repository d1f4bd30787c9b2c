//! # laserplot Core
//!
//! Core types, units, and errors shared by the laserplot crates.
//! Provides the machine-side data model (positions, units, paper sizes)
//! and the selectors used to pick a device dialect or raster treatment.

pub mod data;
pub mod error;
pub mod types;
pub mod units;

pub use data::{DialectKind, DitherMethod, PaperSize, Position, PowerCurve, Units};

pub use error::GcodeError;

pub use types::BoxedIterator;
