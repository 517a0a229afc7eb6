//! Error types for footprintlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, calculating or formatting footprints
#[derive(Error, Debug)]
pub enum FootprintError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed JSON document or response envelope
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or catalog file
    #[error("invalid configuration in '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// The calculator answered with a failure envelope
    #[error("calculator reported a failure: {0}")]
    Api(String),

    /// Country code not present in the catalog
    #[error("unknown country code: {0}")]
    UnknownCountry(String),

    /// Survey input rejected before calculation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
