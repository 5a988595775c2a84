//! JSON rendering for paginated documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Emission(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{paginate, Geometry};
    use crate::model::Record;

    #[test]
    fn test_to_json_pretty() {
        let records = vec![Record::new("x").with_section("Strategy", "Hello")];
        let doc = paginate(&records, &Geometry::default()).unwrap();

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"record_title\""));
        assert!(json.contains("X (Twitter)"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_round_trips() {
        let doc = paginate(&[Record::new("facebook")], &Geometry::default()).unwrap();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
