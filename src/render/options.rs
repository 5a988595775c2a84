//! Emitter options and configuration.

use chrono::{DateTime, Utc};

/// Options for emitting a paginated document.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Color scheme used for page background, text and rules
    pub color_scheme: ColorScheme,

    /// Draw "Page n of N" inside the bottom margin
    pub page_numbers: bool,

    /// Document title for the PDF Info dictionary
    pub title: Option<String>,

    /// Document author for the PDF Info dictionary
    pub author: Option<String>,

    /// Creation timestamp; omitted from the Info dictionary when unset
    pub created: Option<DateTime<Utc>>,
}

impl EmitOptions {
    /// Create new emit options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color scheme.
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Enable or disable page numbers.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.page_numbers = enabled;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Stamp the document with a creation time.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Color scheme passed explicitly to the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Dark text on white paper
    #[default]
    Light,
    /// Light text on a dark page background
    Dark,
}

/// RGB colors (0.0..=1.0) resolved from a color scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Option<[f32; 3]>,
    pub heading: [f32; 3],
    pub text: [f32; 3],
    pub rule: [f32; 3],
    pub footer: [f32; 3],
}

impl ColorScheme {
    /// Resolve the palette for this scheme.
    pub fn palette(self) -> Palette {
        match self {
            ColorScheme::Light => Palette {
                background: None,
                heading: [0.07, 0.09, 0.15],
                text: [0.20, 0.22, 0.27],
                rule: [0.80, 0.82, 0.86],
                footer: [0.45, 0.47, 0.52],
            },
            ColorScheme::Dark => Palette {
                background: Some([0.07, 0.09, 0.15]),
                heading: [0.98, 0.98, 0.99],
                text: [0.82, 0.84, 0.88],
                rule: [0.29, 0.33, 0.40],
                footer: [0.58, 0.61, 0.67],
            },
        }
    }
}
