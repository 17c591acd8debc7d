//! Text strokes rendered from font outlines.

use serde::{Deserialize, Serialize};

use super::{LineJoin, StrokeMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Outline drawn under the glyph fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOutline {
    pub color: String,
    pub width: f64,
    #[serde(default = "TextOutline::default_join")]
    pub join: LineJoin,
    #[serde(default = "TextOutline::default_miter_limit")]
    pub miter_limit: f64,
}

impl TextOutline {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            join: Self::default_join(),
            miter_limit: Self::default_miter_limit(),
        }
    }

    fn default_join() -> LineJoin {
        LineJoin::Round
    }

    fn default_miter_limit() -> f64 {
        4.0
    }
}

/// Multi-line text. `(x, y)` is the alignment anchor on the first baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    pub text: String,
    pub font_family: String,
    pub fill: String,
    /// Baseline step as a multiple of `size`
    pub line_height: f64,
    /// Extra advance between consecutive glyphs, in document units
    #[serde(default)]
    pub letter_spacing: f64,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub outline: Option<TextOutline>,
}

impl TextStroke {
    pub fn new(text: impl Into<String>, font_family: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            meta: StrokeMeta::new(),
            text: text.into(),
            font_family: font_family.into(),
            fill: "#111111".to_string(),
            line_height: 1.2,
            letter_spacing: 0.0,
            x,
            y,
            size: 64.0,
            rotation: 0.0,
            align: TextAlign::Left,
            outline: None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Lines as laid out: split on `\n`, empty lines become a single space.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split('\n')
            .map(|l| if l.is_empty() { " " } else { l })
    }

    /// Outline width when an outline is drawn.
    pub fn outline_width(&self) -> f64 {
        self.outline
            .as_ref()
            .map(|o| o.width)
            .filter(|w| *w > 0.0)
            .unwrap_or(0.0)
    }
}
