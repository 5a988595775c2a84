//! Pagination driver.
//!
//! Walks records in input order, lays out each section, and places lines on
//! pages through the page cursor. Break decisions are made per unit in a
//! fixed order:
//!
//! 1. record heading block (heading + first section lead)
//! 2. section lead (title + first body line)
//! 3. each remaining body line
//! 4. separator between records, together with the next heading block

use super::block::{layout_section, BlockPlan, BlockStyle, PlanItem};
use super::cursor::PageCursor;
use super::measure::{StandardMetrics, TextMeasurer};
use super::Geometry;
use crate::error::{Error, Result};
use crate::export::CancelToken;
use crate::model::{Document, DrawInstruction, Page, Record, TextRole};
use std::sync::Arc;

/// Paginate records with the built-in text metrics.
pub fn paginate(records: &[Record], geometry: &Geometry) -> Result<Document> {
    Paginator::new(geometry.clone()).paginate(records)
}

/// Configurable pagination driver.
///
/// A `Paginator` holds only configuration; every call builds a fresh
/// document, so one instance can serve concurrent exports.
#[derive(Clone)]
pub struct Paginator {
    geometry: Geometry,
    measurer: Arc<dyn TextMeasurer>,
    cancel: Option<CancelToken>,
}

impl Paginator {
    /// Create a paginator for the given geometry.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            measurer: Arc::new(StandardMetrics::new()),
            cancel: None,
        }
    }

    /// Use a custom text measurer.
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    /// Check the token between records and abort when it is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The geometry in use.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Lay out `records` into pages.
    ///
    /// The first page exists before anything is placed, so zero records
    /// yield a document with one empty page.
    pub fn paginate(&self, records: &[Record]) -> Result<Document> {
        self.geometry.validate()?;

        let style = BlockStyle::from(&self.geometry);
        let mut flow = Flow::new(&self.geometry);

        for (index, record) in records.iter().enumerate() {
            if let Some(ref token) = self.cancel {
                token.check()?;
            }

            log::debug!(
                "Laying out record {} '{}' ({} sections) from page {}",
                index + 1,
                record.identifier,
                record.sections.len(),
                flow.cursor.page_count()
            );

            let plans = record
                .sections
                .iter()
                .map(|section| {
                    layout_section(
                        section,
                        &style,
                        self.geometry.content_width(),
                        self.measurer.as_ref(),
                    )
                })
                .collect::<Result<Vec<_>>>()?;

            flow.place_record_heading(record, !plans.is_empty())?;
            for plan in &plans {
                flow.place_section(plan)?;
            }

            if let Some(next) = records.get(index + 1) {
                flow.place_separator(!next.sections.is_empty())?;
            }
        }

        let document = flow.finish();
        log::debug!(
            "Paginated {} records into {} pages",
            records.len(),
            document.page_count()
        );
        Ok(document)
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("geometry", &self.geometry)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Mutable state of one pagination run.
struct Flow<'a> {
    geometry: &'a Geometry,
    cursor: PageCursor,
    pages: Vec<Page>,
}

impl<'a> Flow<'a> {
    fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            cursor: PageCursor::new(geometry.usable_height()),
            pages: vec![Page::new(1)],
        }
    }

    /// Make sure `height` fits on the current page, breaking first if not.
    fn ensure(&mut self, height: f32, what: &str) -> Result<()> {
        if self.cursor.reserve(height).fits {
            return Ok(());
        }
        if self.cursor.is_fresh() {
            return Err(Error::InvalidGeometry(format!(
                "{} needs {:.2}pt but a page only has {:.2}pt",
                what,
                height,
                self.geometry.usable_height()
            )));
        }

        self.break_page();
        log::trace!(
            "Page break before {} ({:.2}pt), now on page {}",
            what,
            height,
            self.cursor.page_count()
        );

        if self.cursor.reserve(height).fits {
            Ok(())
        } else {
            Err(Error::InvalidGeometry(format!(
                "{} does not fit on an empty page",
                what
            )))
        }
    }

    fn break_page(&mut self) {
        if let Some(page) = self.pages.last_mut() {
            page.used_height = self.cursor.used();
        }
        self.cursor.advance_page();
        self.pages.push(Page::new(self.cursor.page_count()));
    }

    /// Consume `height` and return the absolute top offset of the slot.
    fn take(&mut self, height: f32) -> Result<f32> {
        self.cursor
            .consume(height)
            .map(|offset| self.geometry.margin + offset)
            .ok_or_else(|| {
                Error::InvalidGeometry(format!("{:.2}pt consumed without a reservation", height))
            })
    }

    fn push(&mut self, instruction: DrawInstruction) {
        if let Some(page) = self.pages.last_mut() {
            page.push(instruction);
        }
    }

    fn push_text(&mut self, role: TextRole, text: &str, font_size: f32, y: f32) {
        self.push(DrawInstruction::Text {
            role,
            text: text.to_string(),
            x: self.geometry.margin,
            y,
            font_size,
        });
    }

    fn place_line(&mut self, role: TextRole, item: &PlanItem) -> Result<()> {
        let y = self.take(item.height)?;
        self.push_text(role, &item.text, item.font_size, y);
        Ok(())
    }

    fn place_record_heading(&mut self, record: &Record, has_sections: bool) -> Result<()> {
        self.ensure(
            self.geometry.record_heading_block(has_sections),
            "record heading",
        )?;

        let y = self.take(self.geometry.record_title_height())?;
        self.push_text(
            TextRole::RecordTitle,
            &record.display_name(),
            self.geometry.title_font_size,
            y,
        );
        self.cursor.skip(self.geometry.record_title_spacing);
        Ok(())
    }

    fn place_section(&mut self, plan: &BlockPlan) -> Result<()> {
        self.ensure(plan.lead_height(), "section lead")?;

        if let Some(title) = plan.title() {
            self.place_line(TextRole::SectionTitle, title)?;
        }

        let mut lines = plan.body_lines().iter();
        if let Some(first) = lines.next() {
            self.place_line(TextRole::Body, first)?;
        }
        for line in lines {
            self.ensure(line.height, "body line")?;
            self.place_line(TextRole::Body, line)?;
        }

        self.cursor.skip(plan.margin);
        Ok(())
    }

    /// Draw the divider, keeping it on the same page as the next record's
    /// heading block.
    fn place_separator(&mut self, next_has_sections: bool) -> Result<()> {
        let height = self.geometry.record_separator_height;
        self.ensure(
            height + self.geometry.record_heading_block(next_has_sections),
            "record separator",
        )?;

        let y = self.take(height)?;
        self.push(DrawInstruction::Separator {
            x: self.geometry.margin,
            y: y + height / 2.0,
            width: self.geometry.content_width(),
            thickness: self.geometry.separator_thickness,
        });
        Ok(())
    }

    fn finish(mut self) -> Document {
        if let Some(page) = self.pages.last_mut() {
            page.used_height = self.cursor.used();
        }
        Document {
            geometry: self.geometry.clone(),
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Geometry with round numbers: title 20, section title 10, body lines 10.
    fn small_geometry(page_height: f32) -> Geometry {
        Geometry::new()
            .with_page_size(300.0, page_height)
            .with_margin(10.0)
            .with_font_sizes(20.0, 10.0, 10.0)
            .with_line_height(1.0)
            .with_separator_height(10.0)
            .with_spacing(0.0, 0.0)
    }

    #[test]
    fn test_zero_records_single_empty_page() {
        let doc = paginate(&[], &Geometry::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.is_blank());
    }

    #[test]
    fn test_record_without_sections_is_title_only() {
        let doc = paginate(&[Record::new("instagram")], &Geometry::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].texts(TextRole::RecordTitle), vec!["Instagram"]);
        assert_eq!(doc.count_role(TextRole::Body), 0);
    }

    #[test]
    fn test_positions_follow_cursor() {
        let geometry = small_geometry(200.0);
        let record = Record::new("x").with_section("Plan", "a\nb");
        let doc = paginate(&[record], &geometry).unwrap();

        let ys: Vec<f32> = doc.pages[0].instructions.iter().map(|i| i.y()).collect();
        // title at 10, section title at 30, body lines at 40 and 50
        assert_eq!(ys, vec![10.0, 30.0, 40.0, 50.0]);
        assert_eq!(doc.pages[0].used_height, 50.0);
    }

    #[test]
    fn test_section_lead_moves_to_next_page() {
        // usable = 50: heading block 40 fits, the first section ends at 40,
        // and the second section's 20pt lead does not fit in the last 10.
        let geometry = small_geometry(70.0);
        let record = Record::new("x")
            .with_section("First", "one")
            .with_section("Second", "two");
        let doc = paginate(&[record], &geometry).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].texts(TextRole::SectionTitle), vec!["Second"]);
        assert_eq!(doc.pages[1].texts(TextRole::Body), vec!["two"]);
    }

    #[test]
    fn test_separator_breaks_before_drawing() {
        // usable = 50: record 1 uses 40, and the separator plus the next
        // heading block (10 + 40) does not fit in the last 10.
        let geometry = small_geometry(70.0);
        let records = vec![
            Record::new("x").with_section("S", "line"),
            Record::new("instagram").with_section("S", "line"),
        ];
        let doc = paginate(&records, &geometry).unwrap();

        assert_eq!(doc.separator_count(), 1);
        assert!(doc.pages[0].instructions.iter().all(|i| !i.is_separator()));
        assert!(doc.pages[1].instructions[0].is_separator());
    }

    #[test]
    fn test_separator_moves_with_title_only_record() {
        // usable = 50: record 1 uses 40; separator 10 + bare heading 20 moves.
        let geometry = small_geometry(70.0);
        let records = vec![
            Record::new("x").with_section("S", "line"),
            Record::new("instagram"),
        ];
        let doc = paginate(&records, &geometry).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[1].instructions[0].is_separator());
        assert_eq!(doc.pages[1].texts(TextRole::RecordTitle), vec!["Instagram"]);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let geometry = small_geometry(30.0);
        let result = paginate(&[Record::new("x").with_section("S", "b")], &geometry);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_cancelled_before_first_record() {
        let token = CancelToken::new();
        token.cancel();
        let paginator = Paginator::new(Geometry::default()).with_cancel(token);
        let result = paginator.paginate(&[Record::new("x")]);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_sections_keep_declared_order() {
        let record = Record::new("linkedin")
            .with_section("Weekly Plan", "w")
            .with_section("Strategy", "s")
            .with_section("Audience", "a");
        let doc = paginate(&[record], &Geometry::default()).unwrap();
        assert_eq!(
            doc.pages[0].texts(TextRole::SectionTitle),
            vec!["Weekly Plan", "Strategy", "Audience"]
        );
    }
}
