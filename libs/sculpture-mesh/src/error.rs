//! # Sculpture Errors
//!
//! Error types for the sculpture pipeline.
//!
//! [`SculptureError`] is fatal: the export aborts with no partial output.
//! [`TextError`] is stage-local: the pipeline logs it and continues without
//! a text plaque.

use thiserror::Error;

/// Fatal errors raised while generating or exporting a sculpture.
#[derive(Debug, Error)]
pub enum SculptureError {
    /// Unusable input data (e.g. fewer than 2 route points)
    #[error("Input error: {message}")]
    Input { message: String },

    /// Invalid configuration values
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Geometry generation failed
    #[error("Compute error: {message}")]
    Compute { message: String },

    /// Serialization failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SculptureError {
    /// Creates an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Creates a compute error.
    pub fn compute(message: impl Into<String>) -> Self {
        Self::Compute {
            message: message.into(),
        }
    }

    /// Returns true when the caller should fix its input route rather than
    /// report an internal failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input { .. })
    }
}

/// Invalid numeric ranges or names in a [`crate::SculptureConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Value must be strictly positive
    #[error("{field} must be positive: {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// Value must be non-negative
    #[error("{field} must be non-negative: {value}")]
    Negative { field: &'static str, value: f64 },

    /// Value lies outside its accepted range
    #[error("{field} must be in [{min}, {max}]: {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Unknown quality preset name
    #[error("Unknown quality preset: {0:?}")]
    UnknownQuality(String),
}

/// Non-fatal text engraving failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// No rasterization context (no font) is available
    #[error("No text rasterizer available")]
    Unavailable,

    /// Text is disabled or both title and subtitle are blank
    #[error("No text to engrave")]
    EmptyText,

    /// Font data could not be parsed
    #[error("Invalid font data")]
    InvalidFont,

    /// Plaque or canvas dimensions collapsed to zero
    #[error("Degenerate text plaque: {0}")]
    Degenerate(String),
}

/// Result alias for fatal pipeline errors.
pub type SculptureResult<T> = Result<T, SculptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_is_distinguished() {
        assert!(SculptureError::input("no route").is_input_error());
        assert!(!SculptureError::compute("merge").is_input_error());
    }

    #[test]
    fn test_config_error_converts() {
        let err: SculptureError = ConfigError::NonPositive {
            field: "size",
            value: 0.0,
        }
        .into();
        assert!(matches!(err, SculptureError::Config(_)));
        assert_eq!(err.to_string(), "Config error: size must be positive: 0");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full");
        let err: SculptureError = io.into();
        assert!(err.to_string().contains("disk full"));
    }
}
