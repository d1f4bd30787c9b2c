//! laserplot Settings Crate
//!
//! Handles job configuration: defaults, validation, and JSON/TOML
//! persistence in the platform configuration directory.

pub mod config;
pub mod error;

pub use config::{Config, JobSettings, MachineSettings, RasterSettings, VectorSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
