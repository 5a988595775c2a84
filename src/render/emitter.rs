//! The emitter seam between a paginated document and its output bytes.

use super::json::{to_json, JsonFormat};
use crate::error::Result;
use crate::model::Document;

/// Serializes a paginated document into an output artifact.
///
/// Implementations return bytes only on success; a failing emitter must not
/// hand back partial output.
pub trait DocumentEmitter: Send + Sync {
    /// Short emitter name for logging.
    fn name(&self) -> &str;

    /// File extension of the produced artifact (without the dot).
    fn file_extension(&self) -> &str;

    /// MIME type of the produced artifact.
    fn mime_type(&self) -> &str;

    /// Serialize the document.
    fn emit(&self, doc: &Document) -> Result<Vec<u8>>;
}

/// Emits the laid-out pages as JSON, mainly for inspection and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter {
    format: JsonFormat,
}

impl JsonEmitter {
    /// Create a JSON emitter.
    pub fn new(format: JsonFormat) -> Self {
        Self { format }
    }
}

impl DocumentEmitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &str {
        "application/json"
    }

    fn emit(&self, doc: &Document) -> Result<Vec<u8>> {
        to_json(doc, self.format).map(String::into_bytes)
    }
}
