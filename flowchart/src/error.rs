//! Flowchart errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from configuring or rendering a flowchart.
#[derive(Debug, Error)]
pub enum FlowchartError {
    /// A canvas could not be allocated (zero or oversized dimensions).
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    #[error("invalid diagram configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse diagram configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode PNG: {0}")]
    Png(String),
}
