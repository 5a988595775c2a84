//! Text measurement and greedy line wrapping.
//!
//! Widths come from a static advance-width table for the standard Helvetica
//! face, the font the PDF emitter draws with. The table is in 1/1000 em units
//! and covers ASCII 0x20..=0x7E; index = (char as usize) - 32. Characters
//! outside that range fall back to an average width.

use crate::error::{Error, Result};

/// Source of text widths.
///
/// This is the only place the layout engine needs real glyph knowledge, so
/// it is the substitution point for a platform metrics provider.
pub trait TextMeasurer: Send + Sync {
    /// Rendered width of `text` at `font_size`, in points.
    fn measure(&self, text: &str, font_size: f32) -> Result<f32>;
}

/// Built-in metrics for the standard Helvetica face.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics {
    _private: (),
}

impl StandardMetrics {
    /// Create the standard metrics provider.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Width of a single character in 1/1000 em.
    pub fn char_width(c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            HELVETICA_WIDTHS[code - 32]
        } else {
            AVERAGE_CHAR_WIDTH
        }
    }
}

impl TextMeasurer for StandardMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Result<f32> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(Error::Measurement(format!(
                "no metrics for font size {}",
                font_size
            )));
        }
        let units: u32 = text.chars().map(|c| u32::from(Self::char_width(c))).sum();
        Ok(units as f32 * font_size / 1000.0)
    }
}

const AVERAGE_CHAR_WIDTH: u16 = 556;

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Wrap `text` into lines no wider than `max_width` at `font_size`.
///
/// Hard line breaks (`\n`, `\r\n`) always start a new line. Within a
/// paragraph words are packed greedily with one space between them; a word
/// wider than `max_width` sits alone on its line without being broken. An
/// empty paragraph yields one empty line, so empty input still occupies a
/// line.
pub fn wrap(
    text: &str,
    max_width: f32,
    font_size: f32,
    measurer: &dyn TextMeasurer,
) -> Result<Vec<String>> {
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(Error::Measurement(format!(
            "line width must be positive, got {}",
            max_width
        )));
    }

    let space_width = measurer.measure(" ", font_size)?;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        wrap_paragraph(
            paragraph,
            max_width,
            font_size,
            space_width,
            measurer,
            &mut lines,
        )?;
    }
    Ok(lines)
}

fn wrap_paragraph(
    paragraph: &str,
    max_width: f32,
    font_size: f32,
    space_width: f32,
    measurer: &dyn TextMeasurer,
    lines: &mut Vec<String>,
) -> Result<()> {
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in paragraph.split_whitespace() {
        let word_width = measurer.measure(word, font_size)?;

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    lines.push(current);
    Ok(())
}
