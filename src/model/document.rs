//! Output document types: laid-out pages and their draw instructions.

use crate::layout::Geometry;
use serde::{Deserialize, Serialize};

/// A fully paginated document, ready for an emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Page geometry shared by every page
    pub geometry: Geometry,

    /// Pages in output order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document with no pages.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if no page carries any instruction.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }

    /// Iterate over all instructions in page order, then draw order.
    pub fn instructions(&self) -> impl Iterator<Item = (&Page, &DrawInstruction)> {
        self.pages
            .iter()
            .flat_map(|page| page.instructions.iter().map(move |ins| (page, ins)))
    }

    /// Count text instructions with the given role.
    pub fn count_role(&self, role: TextRole) -> usize {
        self.instructions()
            .filter(|(_, ins)| ins.role() == Some(role))
            .count()
    }

    /// Count separator instructions.
    pub fn separator_count(&self) -> usize {
        self.instructions()
            .filter(|(_, ins)| ins.is_separator())
            .count()
    }
}

/// A single output page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Draw instructions in draw order
    pub instructions: Vec<DrawInstruction>,

    /// Vertical extent consumed inside the margins, in points
    pub used_height: f32,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            instructions: Vec::new(),
            used_height: 0.0,
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }

    /// Check if the page has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Texts drawn on this page with the given role, in draw order.
    pub fn texts(&self, role: TextRole) -> Vec<&str> {
        self.instructions
            .iter()
            .filter(|ins| ins.role() == Some(role))
            .filter_map(DrawInstruction::text)
            .collect()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.instructions
            .iter()
            .map(|ins| match ins {
                DrawInstruction::Text { text, .. } => text.clone(),
                DrawInstruction::Separator { .. } => "----".to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What a text run represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    /// Record heading (channel name)
    RecordTitle,
    /// Section heading
    SectionTitle,
    /// One wrapped line of section body
    Body,
}

impl TextRole {
    /// Whether the role is drawn in the bold face.
    pub fn is_bold(self) -> bool {
        !matches!(self, TextRole::Body)
    }
}

/// An atomic, positioned unit of renderable content.
///
/// `y` is the offset of the instruction's top edge from the top of the
/// page, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// A single line of text
    Text {
        role: TextRole,
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
    },

    /// A horizontal divider between records
    Separator {
        x: f32,
        y: f32,
        width: f32,
        thickness: f32,
    },
}

impl DrawInstruction {
    /// Text role, if this is a text run.
    pub fn role(&self) -> Option<TextRole> {
        match self {
            DrawInstruction::Text { role, .. } => Some(*role),
            DrawInstruction::Separator { .. } => None,
        }
    }

    /// Text content, if this is a text run.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawInstruction::Text { text, .. } => Some(text),
            DrawInstruction::Separator { .. } => None,
        }
    }

    /// Top offset from the page's top edge.
    pub fn y(&self) -> f32 {
        match self {
            DrawInstruction::Text { y, .. } | DrawInstruction::Separator { y, .. } => *y,
        }
    }

    /// Check if this is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, DrawInstruction::Separator { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(role: TextRole, s: &str, y: f32) -> DrawInstruction {
        DrawInstruction::Text {
            role,
            text: s.to_string(),
            x: 40.0,
            y,
            font_size: 10.0,
        }
    }

    #[test]
    fn test_page_texts_by_role() {
        let mut page = Page::new(1);
        page.push(text(TextRole::RecordTitle, "Instagram", 40.0));
        page.push(text(TextRole::Body, "first", 60.0));
        page.push(text(TextRole::Body, "second", 74.0));

        assert_eq!(page.texts(TextRole::Body), vec!["first", "second"]);
        assert_eq!(page.texts(TextRole::RecordTitle), vec!["Instagram"]);
        assert!(page.texts(TextRole::SectionTitle).is_empty());
    }

    #[test]
    fn test_document_get_page() {
        let mut doc = Document::new(Geometry::default());
        doc.pages.push(Page::new(1));
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(1).is_some());
        assert!(doc.get_page(2).is_none());
        assert!(doc.is_blank());
    }

    #[test]
    fn test_instruction_accessors() {
        let sep = DrawInstruction::Separator {
            x: 40.0,
            y: 100.0,
            width: 515.0,
            thickness: 0.75,
        };
        assert!(sep.is_separator());
        assert_eq!(sep.role(), None);
        assert_eq!(sep.y(), 100.0);
        assert!(TextRole::SectionTitle.is_bold());
        assert!(!TextRole::Body.is_bold());
    }
}
