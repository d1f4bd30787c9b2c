//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for command emission,
//! parameter validation, and input format processing.

use thiserror::Error;

/// Errors that can occur during command-stream synthesis.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Invalid parameters were provided to an emitter or the compiler.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Input file could not be loaded.
    #[error("Failed to load file: {0}")]
    LoadError(String),

    /// Program assembly failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// Image processing failed.
    #[error("Image processing error: {0}")]
    ImageError(String),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A file format error occurred.
    #[error("File format error: {0}")]
    FileFormat(#[from] FileFormatError),
}

impl CamToolError {
    /// Whether this error is the laser-power safety rejection.
    pub fn is_power_out_of_range(&self) -> bool {
        matches!(
            self,
            CamToolError::Parameter(ParameterError::OutOfRange { name, .. }) if name == "laser_power"
        )
    }
}

/// Errors related to parameter validation.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Dimensions are invalid (zero, negative, or inconsistent).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Errors related to input file parsing.
#[derive(Error, Debug)]
pub enum FileFormatError {
    /// The SVG file could not be parsed.
    #[error("SVG parse error: {0}")]
    SvgParseError(String),

    /// The file is empty or contains no usable data.
    #[error("Empty file: {0}")]
    EmptyFile(String),

}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

/// Result type alias for file format operations.
pub type FileFormatResult<T> = Result<T, FileFormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::InvalidParameters("passes must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameters: passes must be at least 1"
        );

        let err = CamToolError::GenerationFailed("empty program".to_string());
        assert_eq!(err.to_string(), "G-code generation failed: empty program");
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "laser_power".to_string(),
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'laser_power' out of range: 1.5 (valid: 0..1)"
        );
    }

    #[test]
    fn test_power_error_detection() {
        let err: CamToolError = ParameterError::OutOfRange {
            name: "laser_power".to_string(),
            value: -0.1,
            min: 0.0,
            max: 1.0,
        }
        .into();
        assert!(err.is_power_out_of_range());

        let err: CamToolError = ParameterError::InvalidDimensions("0x0".to_string()).into();
        assert!(!err.is_power_out_of_range());
    }

    #[test]
    fn test_file_format_error_conversion() {
        let fmt_err: CamToolError = FileFormatError::EmptyFile("a.svg".to_string()).into();
        assert!(matches!(fmt_err, CamToolError::FileFormat(_)));
    }
}
