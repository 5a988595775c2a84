//! Document model types.
//!
//! `Content` is what the paginator consumes; `Document` is what it produces
//! and what emitters serialize.

mod content;
mod document;

pub use content::{display_name, Content, Record, Section};
pub use document::{Document, DrawInstruction, Page, TextRole};
