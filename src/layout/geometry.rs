//! Page geometry and typographic constants.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page geometry, fixed for a whole run.
///
/// All lengths are in PDF points (1/72 inch). Every field can be overridden,
/// which is how tests exercise small pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Margin on all four sides
    pub margin: f32,

    /// Record heading font size
    pub title_font_size: f32,

    /// Section heading font size
    pub section_title_font_size: f32,

    /// Body text font size
    pub body_font_size: f32,

    /// Line height as a multiple of the font size
    pub line_height_multiplier: f32,

    /// Vertical space reserved for the divider between records
    pub record_separator_height: f32,

    /// Stroke width of the divider
    pub separator_thickness: f32,

    /// Gap below a record heading
    pub record_title_spacing: f32,

    /// Gap after each section's last body line
    pub section_spacing: f32,
}

impl Geometry {
    /// Create the default A4 portrait geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A4 portrait (595 x 842 pt).
    pub fn a4() -> Self {
        Self::default()
    }

    /// US Letter portrait (612 x 792 pt).
    pub fn letter() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            ..Self::default()
        }
    }

    /// Set page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the three font sizes (record title, section title, body).
    pub fn with_font_sizes(mut self, title: f32, section_title: f32, body: f32) -> Self {
        self.title_font_size = title;
        self.section_title_font_size = section_title;
        self.body_font_size = body;
        self
    }

    /// Set the line height multiplier.
    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.line_height_multiplier = multiplier;
        self
    }

    /// Set the separator reservation height.
    pub fn with_separator_height(mut self, height: f32) -> Self {
        self.record_separator_height = height;
        self
    }

    /// Set the spacing below record titles and after sections.
    pub fn with_spacing(mut self, record_title: f32, section: f32) -> Self {
        self.record_title_spacing = record_title;
        self.section_spacing = section;
        self
    }

    /// Parse geometry overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let geometry: Geometry = serde_json::from_str(json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Read geometry overrides from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Vertical space available between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    /// Horizontal space available between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Height of the record heading line.
    pub fn record_title_height(&self) -> f32 {
        self.title_font_size * self.line_height_multiplier
    }

    /// Height of a section heading line.
    pub fn section_title_height(&self) -> f32 {
        self.section_title_font_size * self.line_height_multiplier
    }

    /// Height of one body line.
    pub fn body_line_height(&self) -> f32 {
        self.body_font_size * self.line_height_multiplier
    }

    /// Height a section needs before it may start: its title plus one body line.
    pub fn section_lead_height(&self) -> f32 {
        self.section_title_height() + self.body_line_height()
    }

    /// Fixed height reserved before drawing a record heading.
    ///
    /// When the record has sections the reservation includes the first
    /// section's lead, so a heading is never the last thing on a page.
    pub fn record_heading_block(&self, has_sections: bool) -> f32 {
        let heading = self.record_title_height() + self.record_title_spacing;
        if has_sections {
            heading + self.section_lead_height()
        } else {
            heading
        }
    }

    /// Check that the geometry is usable.
    ///
    /// Fails when a dimension is not finite or not positive, or when the
    /// usable height cannot hold a record separator followed by a full
    /// heading block, the largest unit the paginator places atomically.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("title_font_size", self.title_font_size),
            ("section_title_font_size", self.section_title_font_size),
            ("body_font_size", self.body_font_size),
            ("line_height_multiplier", self.line_height_multiplier),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidGeometry(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("margin", self.margin),
            ("record_separator_height", self.record_separator_height),
            ("separator_thickness", self.separator_thickness),
            ("record_title_spacing", self.record_title_spacing),
            ("section_spacing", self.section_spacing),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidGeometry(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "margins ({}) leave no content width on a {}pt wide page",
                self.margin, self.page_width
            )));
        }

        let largest_unit = self.record_separator_height + self.record_heading_block(true);
        if self.usable_height() < largest_unit {
            return Err(Error::InvalidGeometry(format!(
                "usable height {:.2}pt cannot hold a separator and heading block ({:.2}pt)",
                self.usable_height(),
                largest_unit
            )));
        }

        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 40.0,
            title_font_size: 18.0,
            section_title_font_size: 13.0,
            body_font_size: 10.5,
            line_height_multiplier: 1.4,
            record_separator_height: 16.0,
            separator_thickness: 0.75,
            record_title_spacing: 6.0,
            section_spacing: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_valid() {
        let geometry = Geometry::default();
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.usable_height(), 762.0);
        assert_eq!(geometry.content_width(), 515.0);
    }

    #[test]
    fn test_letter() {
        let geometry = Geometry::letter();
        assert_eq!(geometry.page_width, 612.0);
        assert_eq!(geometry.page_height, 792.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_derived_heights() {
        let geometry = Geometry::new()
            .with_font_sizes(20.0, 10.0, 10.0)
            .with_line_height(1.0)
            .with_spacing(5.0, 0.0);
        assert_eq!(geometry.record_title_height(), 20.0);
        assert_eq!(geometry.section_lead_height(), 20.0);
        assert_eq!(geometry.record_heading_block(false), 25.0);
        assert_eq!(geometry.record_heading_block(true), 45.0);
    }

    #[test]
    fn test_validate_rejects_zero_font() {
        let geometry = Geometry::new().with_font_sizes(18.0, 0.0, 10.0);
        assert!(matches!(
            geometry.validate(),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_margin() {
        let geometry = Geometry::new().with_margin(300.0);
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_page_too_short_for_heading() {
        let geometry = Geometry::new().with_page_size(595.0, 100.0);
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_validate_requires_room_for_separator_and_heading() {
        let geometry = Geometry::new()
            .with_margin(10.0)
            .with_font_sizes(20.0, 10.0, 10.0)
            .with_line_height(1.0)
            .with_separator_height(10.0)
            .with_spacing(0.0, 0.0);

        // heading block 40 alone would fit in 40, but not with the separator
        let tight = geometry.clone().with_page_size(200.0, 60.0);
        assert!(matches!(tight.validate(), Err(Error::InvalidGeometry(_))));

        let exact = geometry.with_page_size(200.0, 70.0);
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let geometry = Geometry::from_json(r#"{"margin": 20, "body_font_size": 12}"#).unwrap();
        assert_eq!(geometry.margin, 20.0);
        assert_eq!(geometry.body_font_size, 12.0);
        assert_eq!(geometry.page_width, 595.0);
    }

    #[test]
    fn test_from_json_invalid_values() {
        assert!(Geometry::from_json(r#"{"page_width": -1}"#).is_err());
    }
}
