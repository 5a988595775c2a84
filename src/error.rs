//! Error types for pageflow.

use std::io;
use thiserror::Error;

/// Result type alias for pageflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while paginating or exporting a document.
///
/// Every variant is fatal to the export attempt that produced it. No partial
/// page state survives an error and nothing is retried automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Content or configuration JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text metrics are unavailable for the requested font or size.
    #[error("Text measurement error: {0}")]
    Measurement(String),

    /// The rendering surface failed while serializing the document.
    #[error("Emission error: {0}")]
    Emission(String),

    /// The page geometry cannot hold the content's atomic units.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The export was cancelled by the host before an artifact was produced.
    #[error("Export cancelled")]
    Cancelled,
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Emission(format!("PDF write failed: {}", err))
    }
}
