//! Error types for the fallible edges of the crate
//!
//! The decode path itself never fails. Only loading inputs and writing
//! diagnostics can.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Recorded OCR output is malformed
    #[error("Invalid OCR observation: {0}")]
    Observation(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Could not serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// No platform configuration directory
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// A frame image has no matching observation file
    #[error("Missing OCR observation for frame {0:?}")]
    MissingObservation(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
