//! Rendering module for serializing paginated documents.

mod emitter;
mod json;
mod options;
mod pdf;
mod text;

pub use emitter::{DocumentEmitter, JsonEmitter};
pub use json::{to_json, JsonFormat};
pub use options::{ColorScheme, EmitOptions, Palette};
pub use pdf::PdfEmitter;
pub use text::to_text;
