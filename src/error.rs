//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected entity construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntityError {
    #[error("non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("negative {field}: {value}")]
    NegativeSize { field: &'static str, value: f32 },

    #[error("playfield {width}x{height} cannot hold the player")]
    PlayfieldTooSmall { width: f32, height: f32 },
}

/// Failures while loading or validating a [`crate::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
