//! Error types for region operations.
//!
//! This module defines `RegionError`, the error type for shape construction,
//! boolean composition, area integration and (de)serialization. It uses
//! `thiserror` for convenient error construction.

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for region operations.
///
/// All fallible region operations return `Result<T, RegionError>`.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Shape validation failures
    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Invalid coordinate values
    #[error("Invalid coordinate '{coordinate}': value {value} is not finite or out of range")]
    InvalidCoordinate { coordinate: String, value: f64 },

    /// The region has no finite extent, so it cannot be integrated
    #[error("Region is unbounded: {message}")]
    Unbounded { message: String },

    /// The ordered entry list does not describe a region
    #[error("Malformed region: {message}")]
    MalformedRegion { message: String },

    /// Boolean expansion would produce too many terms
    #[error("Region too complex: expansion would produce {terms} terms (limit {limit})")]
    TooComplex { terms: usize, limit: usize },

    /// ASCII region syntax errors
    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Region file read/write failures
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic error with context (for wrapping other errors)
    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl RegionError {
    /// Create an InvalidGeometry error with a message
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Create an InvalidCoordinate error
    pub fn invalid_coordinate(coordinate: impl Into<String>, value: f64) -> Self {
        Self::InvalidCoordinate {
            coordinate: coordinate.into(),
            value,
        }
    }

    /// Create an Unbounded error with a message
    pub fn unbounded(message: impl Into<String>) -> Self {
        Self::Unbounded {
            message: message.into(),
        }
    }

    /// Create a MalformedRegion error with a message
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRegion {
            message: message.into(),
        }
    }

    /// Create a ParseError for a 1-based line number
    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an Io error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Self::InvalidGeometry { message } => Self::InvalidGeometry {
                message: format!("{}: {}", context.into(), message),
            },
            Self::InvalidCoordinate { coordinate, value } => Self::InvalidCoordinate {
                coordinate: format!("{}: {}", context.into(), coordinate),
                value,
            },
            Self::Unbounded { message } => Self::Unbounded {
                message: format!("{}: {}", context.into(), message),
            },
            Self::MalformedRegion { message } => Self::MalformedRegion {
                message: format!("{}: {}", context.into(), message),
            },
            Self::ParseError { line, message } => Self::ParseError {
                line,
                message: format!("{}: {}", context.into(), message),
            },
            Self::SerializationError(e) => Self::Other {
                message: format!("{}: {}", context.into(), e),
                source: Some(Box::new(e)),
            },
            Self::Other { message, source } => Self::Other {
                message: format!("{}: {}", context.into(), message),
                source,
            },
            // Path and limits already identify these
            other @ (Self::TooComplex { .. } | Self::Io { .. }) => other,
        }
    }
}

// Type alias for Result using RegionError
pub type Result<T> = std::result::Result<T, RegionError>;
