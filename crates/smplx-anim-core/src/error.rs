//! Error types for clip assembly and container IO

use serde::{Deserialize, Serialize};

/// Error type covering assembly, validation, and container round-trips
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ClipError {
    /// Explicit frame range with start after end
    #[error("invalid frame range: start {start} > end {end}")]
    InvalidRange { start: i32, end: i32 },

    /// Frame rate must be positive and finite
    #[error("invalid frame rate: {rate}")]
    InvalidFrameRate { rate: f32 },

    /// A named array has the wrong shape
    #[error("shape mismatch for '{name}': expected {expected}, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A required container entry is absent
    #[error("container entry not found: {name}")]
    MissingEntry { name: String },

    /// A container entry holds a value the reader cannot accept
    #[error("invalid container entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },

    /// The file is not a recognized container (bad magic or version)
    #[error("unsupported container: {reason}")]
    UnsupportedContainer { reason: String },

    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error
    #[error("io error: {reason}")]
    Io { reason: String },

    /// The progress callback requested an abort
    #[error("export cancelled")]
    Cancelled,
}

impl ClipError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } | Self::InvalidFrameRate { .. } => "validation",
            Self::ShapeMismatch { .. }
            | Self::MissingEntry { .. }
            | Self::InvalidEntry { .. }
            | Self::UnsupportedContainer { .. } => "container",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<std::io::Error> for ClipError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<bincode::Error> for ClipError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
