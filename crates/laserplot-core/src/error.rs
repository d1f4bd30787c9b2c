//! Error types for laserplot core
//!
//! Failures raised by the shared data model. Crates further up keep their
//! own `thiserror` enums.

use thiserror::Error;

/// G-Code error type
///
/// Raised while interpreting values that end up in device commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GcodeError {
    /// Unknown unit token
    #[error("Unknown unit: {token}")]
    UnknownUnit {
        /// The token that could not be recognized.
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcode_error_display() {
        let err = GcodeError::UnknownUnit {
            token: "furlong".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown unit: furlong");
    }
}
