//! Plain text rendering for paginated documents.

use crate::model::Document;

/// Render the document as text, one block per page.
///
/// Each page starts with a `=== Page n ===` marker; separators render as a
/// dashed line. Useful for eyeballing page breaks without a PDF viewer.
pub fn to_text(doc: &Document) -> String {
    doc.pages
        .iter()
        .map(|page| format!("=== Page {} ===\n{}", page.number, page.plain_text()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
