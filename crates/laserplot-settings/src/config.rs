//! Configuration management for laserplot
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Machine settings (dialect, tolerance, speed command emission)
//! - Job settings (speeds, power, dwell, units, passes, boilerplate lines)
//! - Vector settings (sampling density, paper size)
//! - Raster settings (resolution, power limits, image preparation)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use laserplot_core::units::parse_unit_token;
use laserplot_core::{DialectKind, DitherMethod, PaperSize, PowerCurve};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
const APP_DIR: &str = "laserplot";

/// Default config file name
const CONFIG_FILE: &str = "config.toml";

/// Device settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Command dialect of the target firmware
    pub dialect: DialectKind,
    /// Carry speed changes as feed words; the MakeBlock firmware ignores them
    pub emit_speed_commands: bool,
    /// Positional tolerance; also fixes the decimals written per axis
    pub tolerance: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            dialect: DialectKind::MakeBlock,
            emit_speed_commands: false,
            tolerance: 0.01,
        }
    }
}

/// Settings shared by every job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Travel speed
    pub movement_speed: f64,
    /// Cutting speed
    pub cutting_speed: f64,
    /// Depth per pass (advisory)
    pub pass_depth: f64,
    /// Default laser power in [0, 1]
    pub laser_power: f64,
    /// Dwell before each cut, in milliseconds
    pub dwell_time_ms: u64,
    /// Unit token written in the header ("mm" or "in")
    pub unit: String,
    /// Times the whole body is repeated
    pub passes: u32,
    /// Raw lines after the standard header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_header: Option<Vec<String>>,
    /// Raw footer lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_footer: Option<Vec<String>>,
    /// Raw lines before every appended item
    pub between_items: Vec<String>,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            movement_speed: 90.0,
            cutting_speed: 90.0,
            pass_depth: 5.0,
            laser_power: 1.0,
            dwell_time_ms: 0,
            unit: "mm".to_string(),
            passes: 1,
            custom_header: None,
            custom_footer: None,
            between_items: Vec::new(),
        }
    }
}

/// Vector (SVG) job settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    /// Sampling density in points per unit length
    pub points_per_unit: f64,
    /// Paper whose height is the vertical flip reference
    pub paper_size: PaperSize,
    /// Emit per-path sampled sequences (honours `power`/`passes` attributes)
    /// instead of continuous segment chains
    pub sampled: bool,
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            points_per_unit: 5.0,
            paper_size: PaperSize::Letter,
            sampled: false,
        }
    }
}

/// Raster (bitmap) job settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Machine units per pixel
    pub resolution: f64,
    /// Power for unmarked pixels
    pub min_power: f64,
    /// Power for marked pixels
    pub max_power: f64,
    /// Largest image width in pixels
    pub max_width: u32,
    /// Largest image height in pixels
    pub max_height: u32,
    pub dither: DitherMethod,
    /// Threshold for `dither = "threshold"`
    pub threshold: u8,
    pub power_curve: PowerCurve,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            resolution: 0.5,
            min_power: 0.0,
            max_power: 1.0,
            max_width: 75,
            max_height: 75,
            dither: DitherMethod::FloydSteinberg,
            threshold: 128,
            power_curve: PowerCurve::Binary,
        }
    }
}

/// Complete configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub machine: MachineSettings,
    pub job: JobSettings,
    pub vector: VectorSettings,
    pub raster: RasterSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))
            .into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/laserplot/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(
                    "no configuration directory on this platform".to_string(),
                )
                .into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::SaveError(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let tolerance = self.machine.tolerance;
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(SettingsError::invalid(
                "machine.tolerance",
                format!("must be between 0 and 1 exclusive, got {}", tolerance),
            ));
        }

        // Validate job settings
        check_positive("job.movement_speed", self.job.movement_speed)?;
        check_positive("job.cutting_speed", self.job.cutting_speed)?;
        if self.job.pass_depth < 0.0 {
            return Err(SettingsError::invalid("job.pass_depth", "must be >= 0"));
        }
        check_power("job.laser_power", self.job.laser_power)?;
        if self.job.passes == 0 {
            return Err(SettingsError::invalid("job.passes", "must be at least 1"));
        }
        if let Err(e) = parse_unit_token(&self.job.unit) {
            tracing::warn!("{}; the header will carry no unit select", e);
        }

        // Validate vector settings
        check_positive("vector.points_per_unit", self.vector.points_per_unit)?;

        // Validate raster settings
        check_positive("raster.resolution", self.raster.resolution)?;
        check_power("raster.min_power", self.raster.min_power)?;
        check_power("raster.max_power", self.raster.max_power)?;
        if self.raster.min_power > self.raster.max_power {
            return Err(SettingsError::invalid(
                "raster.min_power",
                "must not exceed raster.max_power",
            ));
        }
        if self.raster.max_width == 0 || self.raster.max_height == 0 {
            return Err(SettingsError::invalid(
                "raster.max_width",
                "image size limits must be > 0",
            ));
        }

        Ok(())
    }
}

fn check_positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

fn check_power(key: &str, value: f64) -> SettingsResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::invalid(
            key,
            format!("must be within 0..=1, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.machine.dialect, DialectKind::MakeBlock);
        assert_eq!(config.job.movement_speed, 90.0);
        assert_eq!(config.job.unit, "mm");
        assert_eq!(config.vector.paper_size, PaperSize::Letter);
        assert_eq!(config.raster.max_width, 75);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::new();
        config.job.laser_power = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.job.passes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.machine.tolerance = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.raster.min_power = 0.8;
        config.raster.max_power = 0.2;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.vector.points_per_unit = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_unit_is_not_fatal() {
        let mut config = Config::new();
        config.job.unit = "cubit".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            dialect = "grbl"

            [job]
            passes = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.machine.dialect, DialectKind::Grbl);
        assert_eq!(config.machine.tolerance, 0.01);
        assert_eq!(config.job.passes, 3);
        assert_eq!(config.job.cutting_speed, 90.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::new().save_to_file(Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, SettingsError::Config(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_default_path_shape() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("laserplot/config.toml"));
        }
    }
}
