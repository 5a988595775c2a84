//! Input content types: records and their sections.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The structured content handed to the paginator.
///
/// Records keep the order in which they were selected; nothing downstream
/// re-sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// One record per selected channel, in selection order
    pub records: Vec<Record>,
}

impl Content {
    /// Create content from an ordered list of records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse content from JSON.
    ///
    /// Accepts either `{"records": [...]}` or a bare array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Wrapped(Content),
            Bare(Vec<Record>),
        }

        Ok(match serde_json::from_str::<Shape>(json)? {
            Shape::Wrapped(content) => content,
            Shape::Bare(records) => Content::new(records),
        })
    }

    /// Read and parse a JSON content file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl From<Vec<Record>> for Content {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

/// One channel's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Channel code (e.g. "x", "instagram", "linkedin")
    pub identifier: String,

    /// Sections in declared order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Record {
    /// Create a record with no sections.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section (builder style).
    pub fn with_section(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(Section::new(title, body));
        self
    }

    /// The heading shown for this record.
    ///
    /// The single-letter code `x` expands to its public name; every other
    /// identifier is name-capitalized.
    pub fn display_name(&self) -> String {
        display_name(&self.identifier)
    }
}

/// A titled block of free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading
    pub title: String,

    /// Free text; embedded line breaks are hard breaks
    #[serde(default)]
    pub body: String,
}

impl Section {
    /// Create a section.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Map a channel identifier to its display heading.
pub fn display_name(identifier: &str) -> String {
    let trimmed = identifier.trim();
    if trimmed.eq_ignore_ascii_case("x") {
        return "X (Twitter)".to_string();
    }

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
