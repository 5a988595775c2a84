//! PDF emission using lopdf.
//!
//! Each `Page` becomes one PDF page. Instructions are written in the order
//! they were drawn; the emitter never re-sorts them. Page content streams
//! are built and compressed in parallel and then attached in page order.

use super::emitter::DocumentEmitter;
use super::options::{EmitOptions, Palette};
use crate::error::{Error, Result};
use crate::layout::{Geometry, StandardMetrics, TextMeasurer};
use crate::model::{Document, DrawInstruction, Page, TextRole};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat, Stream};
use rayon::prelude::*;
use std::io::Write;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
const FOOTER_FONT_SIZE: f32 = 8.0;
/// Baseline position as a fraction of the font size below the glyph top.
const ASCENT: f32 = 0.8;

/// Serializes a paginated document to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfEmitter {
    options: EmitOptions,
}

impl PdfEmitter {
    /// Create a PDF emitter.
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    fn page_stream(&self, page: &Page, page_total: u32, geometry: &Geometry) -> Result<Vec<u8>> {
        let mut ctx = PageContext::new(geometry, self.options.color_scheme.palette());
        ctx.begin();
        for instruction in &page.instructions {
            ctx.draw(instruction);
        }
        if self.options.page_numbers {
            ctx.draw_footer(&format!("Page {} of {}", page.number, page_total))?;
        }
        let content = ctx.finish();

        let encoded = content
            .encode()
            .map_err(|e| Error::Emission(format!("page {} content: {}", page.number, e)))?;
        compress(&encoded)
    }

    fn info_dictionary(&self) -> Option<lopdf::Dictionary> {
        let options = &self.options;
        if options.title.is_none() && options.author.is_none() && options.created.is_none() {
            return None;
        }

        let mut info = dictionary! {
            "Producer" => Object::string_literal(format!("pageflow {}", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(ref title) = options.title {
            info.set("Title", Object::String(to_win_ansi(title), StringFormat::Literal));
        }
        if let Some(ref author) = options.author {
            info.set("Author", Object::String(to_win_ansi(author), StringFormat::Literal));
        }
        if let Some(created) = options.created {
            info.set(
                "CreationDate",
                Object::string_literal(format!("D:{}", created.format("%Y%m%d%H%M%SZ"))),
            );
        }
        Some(info)
    }
}

impl DocumentEmitter for PdfEmitter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn file_extension(&self) -> &str {
        "pdf"
    }

    fn mime_type(&self) -> &str {
        "application/pdf"
    }

    fn emit(&self, doc: &Document) -> Result<Vec<u8>> {
        let geometry = &doc.geometry;
        let page_total = doc.page_count();

        let streams = doc
            .pages
            .par_iter()
            .map(|page| self.page_stream(page, page_total, geometry))
            .collect::<Result<Vec<_>>>()?;

        let mut pdf = lopdf::Document::with_version("1.7");
        let pages_id = pdf.new_object_id();

        let regular_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let media_box: Vec<Object> = vec![
            0.0.into(),
            0.0.into(),
            geometry.page_width.into(),
            geometry.page_height.into(),
        ];
        let mut kids: Vec<Object> = Vec::with_capacity(streams.len());
        for stream in streams {
            let content_id =
                pdf.add_object(Stream::new(dictionary! { "Filter" => "FlateDecode" }, stream));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        if let Some(info) = self.info_dictionary() {
            let info_id = pdf.add_object(info);
            pdf.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)
            .map_err(|e| Error::Emission(format!("PDF serialization failed: {}", e)))?;

        log::debug!("Emitted {} pages ({} bytes)", page_total, bytes.len());
        Ok(bytes)
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Emission(format!("content compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Emission(format!("content compression failed: {}", e)))
}

/// Drawing state for one page's content stream.
struct PageContext<'a> {
    geometry: &'a Geometry,
    palette: Palette,
    content: Content,
    font: Option<(&'static str, f32)>,
    fill: Option<[f32; 3]>,
}

impl<'a> PageContext<'a> {
    fn new(geometry: &'a Geometry, palette: Palette) -> Self {
        Self {
            geometry,
            palette,
            content: Content { operations: vec![] },
            font: None,
            fill: None,
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    /// Save graphics state and paint the background.
    fn begin(&mut self) {
        self.op("q", vec![]);
        if let Some(bg) = self.palette.background {
            self.op("rg", rgb(bg));
            self.op(
                "re",
                vec![
                    0.0.into(),
                    0.0.into(),
                    self.geometry.page_width.into(),
                    self.geometry.page_height.into(),
                ],
            );
            self.op("f", vec![]);
        }
    }

    /// Restore graphics state and return the page's content.
    fn finish(mut self) -> Content {
        self.op("Q", vec![]);
        self.content
    }

    fn set_font(&mut self, name: &'static str, size: f32) {
        if self.font != Some((name, size)) {
            self.op("Tf", vec![name.into(), size.into()]);
            self.font = Some((name, size));
        }
    }

    fn set_fill(&mut self, color: [f32; 3]) {
        if self.fill != Some(color) {
            self.op("rg", rgb(color));
            self.fill = Some(color);
        }
    }

    fn draw(&mut self, instruction: &DrawInstruction) {
        match instruction {
            DrawInstruction::Text {
                role,
                text,
                x,
                y,
                font_size,
            } => self.draw_text(*role, text, *x, *y, *font_size),
            DrawInstruction::Separator {
                x,
                y,
                width,
                thickness,
            } => self.draw_rule(*x, *y, *width, *thickness),
        }
    }

    fn draw_text(&mut self, role: TextRole, text: &str, x: f32, y: f32, font_size: f32) {
        // Blank body lines keep their slot in the page layout but draw nothing.
        if text.trim().is_empty() {
            return;
        }
        let leading = (self.geometry.line_height_multiplier - 1.0) * font_size / 2.0;
        let baseline = y + leading + font_size * ASCENT;

        let (font, color) = if role.is_bold() {
            (BOLD_FONT, self.palette.heading)
        } else {
            (REGULAR_FONT, self.palette.text)
        };

        self.op("BT", vec![]);
        self.set_font(font, font_size);
        self.set_fill(color);
        self.op(
            "Td",
            vec![x.into(), (self.geometry.page_height - baseline).into()],
        );
        self.op(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    fn draw_rule(&mut self, x: f32, y: f32, width: f32, thickness: f32) {
        if thickness <= 0.0 {
            return;
        }
        let pdf_y = self.geometry.page_height - y;
        self.op("w", vec![thickness.into()]);
        self.op("RG", rgb(self.palette.rule));
        self.op("m", vec![x.into(), pdf_y.into()]);
        self.op("l", vec![(x + width).into(), pdf_y.into()]);
        self.op("S", vec![]);
    }

    fn draw_footer(&mut self, text: &str) -> Result<()> {
        let width = StandardMetrics::new().measure(text, FOOTER_FONT_SIZE)?;
        let x = (self.geometry.page_width - width) / 2.0;
        let y = (self.geometry.margin - FOOTER_FONT_SIZE) / 2.0;

        self.op("BT", vec![]);
        self.set_font(REGULAR_FONT, FOOTER_FONT_SIZE);
        self.set_fill(self.palette.footer);
        self.op("Td", vec![x.into(), y.max(0.0).into()]);
        self.op(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
        Ok(())
    }
}

fn rgb(color: [f32; 3]) -> Vec<Object> {
    color.iter().map(|c| (*c).into()).collect()
}

/// Encode text for the standard fonts' WinAnsiEncoding.
///
/// Characters with no WinAnsi code point become `?`.
pub(crate) fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::model::Record;
    use crate::render::ColorScheme;

    fn sample_document() -> Document {
        let records = vec![
            Record::new("x").with_section("Strategy", "Short threads, twice a day."),
            Record::new("instagram").with_section("Weekly Plan", "Mon: reel\nThu: carousel"),
        ];
        paginate(&records, &Geometry::default()).unwrap()
    }

    #[test]
    fn test_emit_produces_pdf_header() {
        let bytes = PdfEmitter::default().emit(&sample_document()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn test_emit_page_count_matches() {
        let doc = sample_document();
        let bytes = PdfEmitter::default().emit(&doc).unwrap();
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len() as u32, doc.page_count());
    }

    #[test]
    fn test_emit_is_deterministic_without_timestamp() {
        let doc = sample_document();
        let emitter = PdfEmitter::new(EmitOptions::new().with_title("Plan"));
        assert_eq!(emitter.emit(&doc).unwrap(), emitter.emit(&doc).unwrap());
    }

    #[test]
    fn test_page_stream_is_bracketed_and_ordered() {
        let doc = sample_document();
        let emitter = PdfEmitter::new(
            EmitOptions::new()
                .with_color_scheme(ColorScheme::Dark)
                .with_page_numbers(true),
        );
        let mut ctx = PageContext::new(&doc.geometry, emitter.options.color_scheme.palette());
        ctx.begin();
        for ins in &doc.pages[0].instructions {
            ctx.draw(ins);
        }
        ctx.draw_footer("Page 1 of 1").unwrap();
        let content = ctx.finish();

        let ops: Vec<&str> = content
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(ops.first(), Some(&"q"));
        assert_eq!(ops.last(), Some(&"Q"));
        // Dark scheme paints a background before any text.
        assert_eq!(&ops[1..4], &["rg", "re", "f"]);

        let texts: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match &op.operands[0] {
                Object::String(bytes, _) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts[0], b"X (Twitter)".to_vec());
        assert_eq!(texts[1], b"Strategy".to_vec());
        assert_eq!(texts.last().unwrap(), &b"Page 1 of 1".to_vec());
    }

    #[test]
    fn test_blank_line_takes_space_but_draws_nothing() {
        let record = Record::new("x").with_section("Plan", "first\n\nthird");
        let doc = paginate(&[record], &Geometry::default()).unwrap();
        assert_eq!(doc.pages[0].texts(TextRole::Body), vec!["first", "", "third"]);

        let emitter = PdfEmitter::default();
        let mut ctx = PageContext::new(&doc.geometry, emitter.options.color_scheme.palette());
        for ins in &doc.pages[0].instructions {
            ctx.draw(ins);
        }
        let shown = ctx
            .finish()
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        // record title, section title, two non-blank body lines
        assert_eq!(shown, 4);
    }

    #[test]
    fn test_to_win_ansi() {
        assert_eq!(to_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(to_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("“hi”"), vec![0x93, b'h', b'i', 0x94]);
        assert_eq!(to_win_ansi("日"), b"?".to_vec());
    }
}
