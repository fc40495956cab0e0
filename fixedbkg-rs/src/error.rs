use skyreg::RegionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixedBkgError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(
        "Configuration error: max_radius {max_radius} is smaller than the inner radius {inner_radius} of source {index}"
    )]
    MaxRadiusBelowInner {
        index: usize,
        max_radius: f64,
        inner_radius: f64,
    },

    #[error("Malformed background region for source {index}: {message}")]
    MalformedRegion { index: usize, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FixedBkgError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the run configuration rather than the data
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::MaxRadiusBelowInner { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FixedBkgError>;
