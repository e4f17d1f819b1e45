//! # Font Metrics
//!
//! The layout engine only needs two numbers from a font: how wide a word is
//! and how tall a line is. Both are answered in points by a [`FontMetrics`]
//! provider; callers convert to layout units.
//!
//! [`StandardFontMetrics`] ships built-in Helvetica widths so the engine works
//! without any font files. [`TrueTypeMetrics`] reads real advance widths from
//! a TrueType/OpenType font via ttf-parser.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The font a text run is set in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    #[serde(default = "default_family")]
    pub family: String,
    /// Size in points.
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
}

fn default_family() -> String {
    "Helvetica".to_string()
}

fn default_size() -> f64 {
    10.0
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_size(),
            bold: false,
        }
    }
}

impl FontSpec {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }
}

/// Measures text. All results are in points.
pub trait FontMetrics {
    fn word_width(&self, text: &str, font: &FontSpec) -> f64;
    fn word_height(&self, font: &FontSpec) -> f64;
}

/// Helvetica metrics for the printable ASCII range, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a-z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold digits and letters are a little wider; this scale is close
/// enough for layout purposes.
const BOLD_WIDTH_FACTOR: f64 = 1.05;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Built-in metrics for the standard PDF sans-serif font.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl StandardFontMetrics {
    pub fn new() -> Self {
        Self
    }

    fn char_width(ch: char) -> u16 {
        let code = ch as u32;
        if (32..127).contains(&code) {
            HELVETICA_WIDTHS[(code - 32) as usize]
        } else {
            556
        }
    }
}

impl FontMetrics for StandardFontMetrics {
    fn word_width(&self, text: &str, font: &FontSpec) -> f64 {
        let em: u32 = text.chars().map(|c| Self::char_width(c) as u32).sum();
        let width = em as f64 / 1000.0 * font.size;
        if font.bold {
            width * BOLD_WIDTH_FACTOR
        } else {
            width
        }
    }

    fn word_height(&self, font: &FontSpec) -> f64 {
        font.size * LINE_HEIGHT_FACTOR
    }
}

/// Metrics parsed from a TrueType/OpenType font.
#[derive(Debug, Clone)]
pub struct TrueTypeMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl TrueTypeMetrics {
    /// Parse metrics from font data. Returns `None` for data ttf-parser
    /// cannot read.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        // Auto text is numeric in practice; the Basic Latin and Latin-1 blocks
        // cover every pattern literal we expect.
        for code in 32u32..=0xFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(TrueTypeMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        })
    }

    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }
}

impl FontMetrics for TrueTypeMetrics {
    fn word_width(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().map(|c| self.char_width(c, font.size)).sum()
    }

    fn word_height(&self, font: &FontSpec) -> f64 {
        let extent = self.ascender as f64 - self.descender as f64 + self.line_gap as f64;
        extent / self.units_per_em as f64 * font.size
    }
}
