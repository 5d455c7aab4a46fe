//! Error types for the prompt-curation library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for prompt-curation operations.
pub type Result<T> = std::result::Result<T, CurationError>;

/// Error types that can occur while evaluating and reweighting a dataset.
///
/// A missing label file is deliberately not represented here: it is a normal
/// outcome (`Ok(None)` from [`crate::labels::load_labels`]) that the
/// evaluation run reports as a warning.
#[derive(Error, Debug)]
pub enum CurationError {
    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during YAML parsing or serialization.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yml::Error),

    /// The image could not be opened or its dimensions could not be decoded.
    #[error("Unable to read image {path}: {source}")]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A label line did not follow `class x_center y_center width height`.
    #[error("Malformed label in {path} at line {line}: {reason}")]
    MalformedLabel {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The file name does not carry a `<prompt>_<unique id>.<ext>` shape.
    #[error("Invalid filename format: {0}")]
    InvalidFilename(String),

    /// IoU threshold outside `[0.0, 1.0]`.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Configuration that cannot drive an evaluation run.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
