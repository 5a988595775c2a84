//! # pageflow
//!
//! Paginate multi-section channel content into fixed-size PDF pages.
//!
//! Content arrives as an ordered list of records (one per channel), each with
//! titled free-text sections. pageflow wraps the text, decides page breaks
//! without orphaning headings, separates records with a divider, and writes
//! the result as a PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pageflow::{Content, Record};
//!
//! fn main() -> pageflow::Result<()> {
//!     let content = Content::new(vec![
//!         Record::new("x").with_section("Strategy", "Short threads, twice a day."),
//!         Record::new("instagram").with_section("Weekly Plan", "Mon: reel\nThu: carousel"),
//!     ]);
//!
//!     let pdf = pageflow::render_pdf(&content)?;
//!     std::fs::write("content-plan.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`layout::wrap`] measures and wraps text
//! - [`layout::layout_section`] turns a section into a block plan
//! - [`layout::PageCursor`] tracks remaining space and break state
//! - [`layout::Paginator`] walks records and produces a [`Document`]
//! - [`render::PdfEmitter`] serializes the document

pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{
    Artifact, CancelToken, EmptyInputPolicy, ExportOutcome, Exporter, DEFAULT_FILE_NAME,
};
pub use layout::{Geometry, Paginator, StandardMetrics, TextMeasurer};
pub use model::{Content, Document, DrawInstruction, Page, Record, Section, TextRole};
pub use render::{ColorScheme, DocumentEmitter, EmitOptions, JsonFormat, PdfEmitter};

use std::path::{Path, PathBuf};

/// Paginate content with the given geometry.
///
/// Zero records yield a document with a single empty page.
///
/// # Example
///
/// ```
/// use pageflow::{paginate, Content, Geometry, Record};
///
/// let content = Content::new(vec![Record::new("x").with_section("Strategy", "Daily.")]);
/// let doc = paginate(&content, &Geometry::default()).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn paginate(content: &Content, geometry: &Geometry) -> Result<Document> {
    layout::paginate(&content.records, geometry)
}

/// Render content to PDF bytes with the default geometry and options.
///
/// Unlike [`Exporter`], this always produces a document, even for empty
/// content.
pub fn render_pdf(content: &Content) -> Result<Vec<u8>> {
    let doc = paginate(content, &Geometry::default())?;
    PdfEmitter::default().emit(&doc)
}

/// Read a JSON content file and export it into `out_dir` with defaults.
///
/// Returns the path of the written PDF, or `None` when the file held no
/// records.
///
/// # Example
///
/// ```no_run
/// let path = pageflow::export_file("content.json", "./out").unwrap();
/// ```
pub fn export_file<P: AsRef<Path>, Q: AsRef<Path>>(
    content_path: P,
    out_dir: Q,
) -> Result<Option<PathBuf>> {
    let content = Content::from_json_file(content_path)?;
    Exporter::new().export_to_dir(&content, out_dir)
}
