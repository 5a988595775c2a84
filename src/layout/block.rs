//! Section block layout.
//!
//! A section becomes a flat list of lines with known heights. Nothing here
//! knows about pages; placement is the paginator's job.

use super::measure::{wrap, TextMeasurer};
use super::Geometry;
use crate::error::Result;
use crate::model::Section;

/// Typographic style applied to a section block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    /// Section heading font size
    pub title_font_size: f32,

    /// Body font size
    pub body_font_size: f32,

    /// Line height as a multiple of font size
    pub line_height: f32,

    /// Fixed gap after the block
    pub block_margin: f32,
}

impl BlockStyle {
    /// Height of the title line.
    pub fn title_height(&self) -> f32 {
        self.title_font_size * self.line_height
    }

    /// Height of one body line.
    pub fn body_line_height(&self) -> f32 {
        self.body_font_size * self.line_height
    }
}

impl From<&Geometry> for BlockStyle {
    fn from(geometry: &Geometry) -> Self {
        Self {
            title_font_size: geometry.section_title_font_size,
            body_font_size: geometry.body_font_size,
            line_height: geometry.line_height_multiplier,
            block_margin: geometry.section_spacing,
        }
    }
}

/// Kind of a planned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanItemKind {
    Title,
    BodyLine,
}

/// One line of a block plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub kind: PlanItemKind,
    pub text: String,
    pub font_size: f32,
    pub height: f32,
}

/// A laid-out section: its title line followed by its wrapped body lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPlan {
    /// Title first, then body lines in order
    pub items: Vec<PlanItem>,

    /// Title + body lines + block margin
    pub total_height: f32,

    /// Gap to leave after the last body line
    pub margin: f32,
}

impl BlockPlan {
    /// The title line.
    pub fn title(&self) -> Option<&PlanItem> {
        self.items
            .first()
            .filter(|item| item.kind == PlanItemKind::Title)
    }

    /// The body lines, in order.
    pub fn body_lines(&self) -> &[PlanItem] {
        match self.title() {
            Some(_) => &self.items[1..],
            None => &self.items,
        }
    }

    /// Height of the title plus the first body line.
    pub fn lead_height(&self) -> f32 {
        self.items.iter().take(2).map(|item| item.height).sum()
    }
}

/// Lay out one section at the given content width.
///
/// The body always produces at least one line (empty bodies keep one empty
/// line), so every plan has a lead of title + first body line.
pub fn layout_section(
    section: &Section,
    style: &BlockStyle,
    content_width: f32,
    measurer: &dyn TextMeasurer,
) -> Result<BlockPlan> {
    let lines = wrap(&section.body, content_width, style.body_font_size, measurer)?;

    let mut items = Vec::with_capacity(lines.len() + 1);
    items.push(PlanItem {
        kind: PlanItemKind::Title,
        text: section.title.clone(),
        font_size: style.title_font_size,
        height: style.title_height(),
    });

    let line_height = style.body_line_height();
    items.extend(lines.into_iter().map(|text| PlanItem {
        kind: PlanItemKind::BodyLine,
        text,
        font_size: style.body_font_size,
        height: line_height,
    }));

    let total_height = items.iter().map(|item| item.height).sum::<f32>() + style.block_margin;

    Ok(BlockPlan {
        items,
        total_height,
        margin: style.block_margin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StandardMetrics;

    fn style() -> BlockStyle {
        BlockStyle {
            title_font_size: 10.0,
            body_font_size: 5.0,
            line_height: 2.0,
            block_margin: 3.0,
        }
    }

    #[test]
    fn test_layout_section_heights() {
        let section = Section::new("Strategy", "one\ntwo\nthree");
        let plan = layout_section(&section, &style(), 500.0, &StandardMetrics::new()).unwrap();

        assert_eq!(plan.items.len(), 4);
        assert_eq!(plan.title().unwrap().text, "Strategy");
        assert_eq!(plan.title().unwrap().height, 20.0);
        assert_eq!(plan.body_lines().len(), 3);
        assert!(plan.body_lines().iter().all(|l| l.height == 10.0));
        assert_eq!(plan.total_height, 20.0 + 30.0 + 3.0);
        assert_eq!(plan.lead_height(), 30.0);
    }

    #[test]
    fn test_layout_empty_body_reserves_one_line() {
        let section = Section::new("Notes", "");
        let plan = layout_section(&section, &style(), 500.0, &StandardMetrics::new()).unwrap();
        assert_eq!(plan.body_lines().len(), 1);
        assert_eq!(plan.body_lines()[0].text, "");
    }

    #[test]
    fn test_style_from_geometry() {
        let geometry = Geometry::default();
        let style = BlockStyle::from(&geometry);
        assert_eq!(style.title_font_size, geometry.section_title_font_size);
        assert_eq!(style.body_line_height(), geometry.body_line_height());
    }

    #[test]
    fn test_layout_propagates_measurement_error() {
        let mut bad = style();
        bad.body_font_size = 0.0;
        let section = Section::new("Strategy", "body");
        assert!(layout_section(&section, &bad, 500.0, &StandardMetrics::new()).is_err());
    }
}
