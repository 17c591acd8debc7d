//! Glyph-by-glyph text layout.
//!
//! One layout routine feeds bounds, hit-testing, the rasterizer and the SVG
//! exporter so all four agree on where every glyph lands.

use crate::fonts::{FontRegistry, GlyphOutlines};
use crate::model::{TextAlign, TextStroke};
use lyon::path::Path;
use vellum_core::Rect;

/// One glyph outline placed in document space (before stroke rotation).
#[derive(Debug, Clone)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Pen position on the baseline
    pub x: f64,
    pub baseline: f64,
    pub path: Path,
    pub bounds: Option<Rect>,
}

#[derive(Debug, Clone)]
pub struct TextLayout {
    pub glyphs: Vec<PlacedGlyph>,
    /// Visual width of each line
    pub line_widths: Vec<f64>,
    /// Union of glyph ink boxes
    pub ink: Option<Rect>,
}

impl TextLayout {
    /// Glyphs that carry ink.
    pub fn inked(&self) -> impl Iterator<Item = &PlacedGlyph> {
        self.glyphs.iter().filter(|g| g.bounds.is_some())
    }
}

/// Sum of advances plus kerning and letter spacing between glyphs.
///
/// No spacing is added after the last glyph.
pub fn line_width(face: &dyn GlyphOutlines, line: &str, size: f64, letter_spacing: f64) -> f64 {
    let scale = size / face.units_per_em();
    let chars: Vec<char> = line.chars().collect();
    let mut w = 0.0;
    for (i, c) in chars.iter().enumerate() {
        w += face.advance_width(*c) * scale;
        if let Some(next) = chars.get(i + 1) {
            w += face.kerning(*c, *next) * scale;
            w += letter_spacing;
        }
    }
    w
}

/// Horizontal shift applied to a line's start for the given alignment.
pub fn align_shift(width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -width / 2.0,
        TextAlign::Right => -width,
    }
}

/// Lay out every line of `text` with `face`.
pub fn layout_text(text: &TextStroke, face: &dyn GlyphOutlines) -> TextLayout {
    let scale = text.size / face.units_per_em();
    let step = text.size * text.line_height;
    let mut glyphs = Vec::new();
    let mut line_widths = Vec::new();
    let mut ink: Option<Rect> = None;

    for (line_no, line) in text.lines().enumerate() {
        let baseline = text.y + step * line_no as f64;
        let width = line_width(face, line, text.size, text.letter_spacing);
        line_widths.push(width);

        let mut pen = text.x + align_shift(width, text.align);
        let chars: Vec<char> = line.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            let g = face.glyph_path(*c, pen, baseline, text.size);
            if let Some(b) = g.bounds {
                ink = Some(ink.map_or(b, |acc| acc.union(&b)));
            }
            glyphs.push(PlacedGlyph {
                ch: *c,
                x: pen,
                baseline,
                path: g.path,
                bounds: g.bounds,
            });
            pen += face.advance_width(*c) * scale;
            if let Some(next) = chars.get(i + 1) {
                pen += face.kerning(*c, *next) * scale + text.letter_spacing;
            }
        }
    }

    TextLayout {
        glyphs,
        line_widths,
        ink,
    }
}

/// Layout using the registry's resolved face, `None` while the font is unresolved.
pub fn layout_with(text: &TextStroke, fonts: &FontRegistry) -> Option<TextLayout> {
    let face = fonts.try_get(&text.font_family)?;
    Some(layout_text(text, face.as_ref()))
}
