//! Vector markup import for embedded artwork.
//!
//! Markup is sanitized before it is stored: prolog, processing
//! instructions, doctype, comments, metadata, script blocks and inline
//! event handlers are removed so an embedded document can neither nest a
//! second document root nor carry script.

use crate::model::{EmbeddedVector, StrokeMeta, ViewBox};
use regex::Regex;
use std::sync::OnceLock;
use vellum_core::constants::DEFAULT_EMBED_SIZE;
use vellum_core::ImportError;

fn strip_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?is)<\?xml.*?\?>",
            r"(?s)<\?.*?\?>",
            r"(?is)<!DOCTYPE.*?>",
            r"(?s)<!--.*?-->",
            r"(?is)<metadata.*?</metadata>",
            r"(?is)<script.*?</script>",
            r#"(?is)\s+on[a-z\-]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("invalid sanitize pattern"))
        .collect()
    })
}

fn root_regex() -> &'static Regex {
    static ROOT: OnceLock<Regex> = OnceLock::new();
    ROOT.get_or_init(|| Regex::new(r"(?is)<svg\b([^>]*)>").expect("invalid root pattern"))
}

fn inner_regex() -> &'static Regex {
    static INNER: OnceLock<Regex> = OnceLock::new();
    INNER.get_or_init(|| {
        Regex::new(r"(?is)<svg\b[^>]*>(.*)</svg\s*>").expect("invalid inner pattern")
    })
}

fn attr_regex(name: &str) -> Regex {
    // Attribute names here are fixed identifiers, never user input.
    Regex::new(&format!(
        r#"(?i)(?:^|\s){}\s*=\s*["']([^"']*)["']"#,
        regex::escape(name)
    ))
    .expect("invalid attribute pattern")
}

/// Remove everything that must not end up inside a host document.
pub fn sanitize_for_embed(src: &str) -> String {
    let mut s = src.trim_start_matches('\u{feff}').to_string();
    for re in strip_patterns() {
        s = re.replace_all(&s, "").into_owned();
    }
    s.trim().to_string()
}

/// Children of the root element, or the sanitized input when there is no root.
pub fn extract_inner(svg: &str) -> String {
    let s = sanitize_for_embed(svg);
    match inner_regex().captures(&s) {
        Some(caps) => caps[1].to_string(),
        None => s,
    }
}

/// Dimensions declared on the root element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgMeta {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<ViewBox>,
}

impl SvgMeta {
    /// Intrinsic size: explicit width/height, then the viewBox, then the default.
    pub fn intrinsic_size(&self) -> (f64, f64) {
        let pick = |explicit: Option<f64>, from_vb: Option<f64>| {
            explicit
                .or(from_vb)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_EMBED_SIZE)
        };
        (
            pick(self.width, self.view_box.map(|vb| vb.w)),
            pick(self.height, self.view_box.map(|vb| vb.h)),
        )
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v).trim();
    v.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_view_box(value: &str) -> Option<ViewBox> {
    let nums: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;
    match nums.as_slice() {
        [x, y, w, h] if nums.iter().all(|n| n.is_finite()) => Some(ViewBox {
            x: *x,
            y: *y,
            w: *w,
            h: *h,
        }),
        _ => None,
    }
}

/// Read width, height and viewBox from the root element.
///
/// Unparseable values (percentages, units other than px) are reported as
/// absent rather than as errors.
pub fn parse_meta(svg: &str) -> SvgMeta {
    let Some(caps) = root_regex().captures(svg) else {
        return SvgMeta::default();
    };
    let attrs = &caps[1];
    let attr = |name: &str| attr_regex(name).captures(attrs).map(|c| c[1].to_string());
    SvgMeta {
        width: attr("width").as_deref().and_then(parse_length),
        height: attr("height").as_deref().and_then(parse_length),
        view_box: attr("viewBox").as_deref().and_then(parse_view_box),
    }
}

impl EmbeddedVector {
    /// Sanitize `markup` and place it at `(x, y)` with scale 1.
    ///
    /// Missing or malformed dimensions fall back to a fixed intrinsic size.
    pub fn from_markup(markup: &str, x: f64, y: f64) -> Result<Self, ImportError> {
        let svg = sanitize_for_embed(markup);
        if svg.is_empty() {
            return Err(ImportError::Empty);
        }
        if !root_regex().is_match(&svg) {
            return Err(ImportError::MissingRoot);
        }
        let meta = parse_meta(&svg);
        if meta.width.is_none() && meta.height.is_none() && meta.view_box.is_none() {
            tracing::warn!(
                "Embedded markup declares no size, using {}x{}",
                DEFAULT_EMBED_SIZE,
                DEFAULT_EMBED_SIZE
            );
        }
        let (iw, ih) = meta.intrinsic_size();
        Ok(Self {
            meta: StrokeMeta::new(),
            svg,
            x,
            y,
            scale: 1.0,
            rotation: 0.0,
            iw,
            ih,
            view_box: meta.view_box,
        })
    }

    /// Root children of the stored markup.
    pub fn inner_markup(&self) -> String {
        extract_inner(&self.svg)
    }
}
