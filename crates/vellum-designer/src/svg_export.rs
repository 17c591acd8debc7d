//! SVG export of the visible composition.
//!
//! The exporter mirrors the rasterizer: strokes are written in ascending
//! z-order, erasers become one `<mask>` per targeted id, and every stroke
//! is wrapped in its mask group and then its rotation group. All
//! coordinates are shifted numerically so the union box starts at (0, 0).

use crate::bounds::{rotation_center, union_bounds};
use crate::fonts::FontRegistry;
use crate::model::{EmbeddedVector, EraserStroke, ShapeKind, ShapeStroke, Stroke, StrokeId};
use crate::raster::erasers_by_target;
use crate::text_layout::layout_with;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use vellum_core::constants::AA_MARGIN;
use vellum_core::{ExportError, Point, Rect, Rgba};

/// Background handling for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub background: Rgba,
    /// Omit the background rectangle entirely
    pub transparent_background: bool,
    /// Punch every live eraser through the background as well
    pub erase_background: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            transparent_background: true,
            erase_background: false,
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    /// Union box in document space
    pub bounds: Rect,
    /// Visible text left out because its font is not resolved yet
    pub skipped_text: Vec<StrokeId>,
}

/// Shift applied to every emitted coordinate.
#[derive(Debug, Clone, Copy)]
struct Offset {
    dx: f64,
    dy: f64,
}

impl Offset {
    fn x(&self, x: f64) -> String {
        num(x + self.dx)
    }

    fn y(&self, y: f64) -> String {
        num(y + self.dy)
    }
}

/// Format a number with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 || !r.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", r);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn esc(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// `M x y L x y ...` per run of finite points.
fn polyline_data(points: &[Point], off: Offset) -> String {
    let mut d = String::new();
    let mut open = false;
    for p in points {
        if p.is_gap() {
            open = false;
            continue;
        }
        let cmd = if open { 'L' } else { 'M' };
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = write!(d, "{} {} {}", cmd, off.x(p.x), off.y(p.y));
        open = true;
    }
    d
}

/// Path data for a lyon path.
fn path_data(path: &lyon::path::Path, off: Offset) -> String {
    let mut d = String::new();
    let pt = |p: lyon::math::Point| format!("{} {}", off.x(p.x as f64), off.y(p.y as f64));
    for event in path.iter() {
        let seg = match event {
            lyon::path::Event::Begin { at } => format!("M {}", pt(at)),
            lyon::path::Event::Line { to, .. } => format!("L {}", pt(to)),
            lyon::path::Event::Quadratic { ctrl, to, .. } => format!("Q {} {}", pt(ctrl), pt(to)),
            lyon::path::Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => format!("C {} {} {}", pt(ctrl1), pt(ctrl2), pt(to)),
            lyon::path::Event::End { close: true, .. } => "Z".to_string(),
            lyon::path::Event::End { close: false, .. } => continue,
        };
        if !d.is_empty() {
            d.push(' ');
        }
        d.push_str(&seg);
    }
    d
}

fn stroke_attrs(color: &str, width: f64) -> String {
    if width > 0.0 {
        format!(" stroke=\"{}\" stroke-width=\"{}\"", esc(color), num(width))
    } else {
        " stroke=\"none\"".to_string()
    }
}

fn shape_markup(s: &ShapeStroke, off: Offset) -> String {
    let fill = match s.fill.as_deref().filter(|_| s.has_fill()) {
        Some(f) => esc(f),
        None => "none".to_string(),
    };
    let stroke = stroke_attrs(&s.stroke, s.stroke_width);
    match s.kind {
        ShapeKind::Rect => {
            let b = s.normalized_box();
            let r = s.effective_radius();
            let radius = if r > 0.0 {
                format!(" rx=\"{0}\" ry=\"{0}\"", num(r))
            } else {
                String::new()
            };
            format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{} fill=\"{}\"{}/>",
                off.x(b.x),
                off.y(b.y),
                num(b.w),
                num(b.h),
                radius,
                fill,
                stroke
            )
        }
        ShapeKind::Ellipse => {
            let b = s.normalized_box();
            let c = b.center();
            format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\"{}/>",
                off.x(c.x),
                off.y(c.y),
                num(b.w / 2.0),
                num(b.h / 2.0),
                fill,
                stroke
            )
        }
        ShapeKind::Line => format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" fill=\"none\"{} stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
            off.x(s.x),
            off.y(s.y),
            off.x(s.x + s.w),
            off.y(s.y + s.h),
            stroke
        ),
    }
}

/// The viewBox is fitted into the intrinsic box with `xMidYMid meet`,
/// the same fit the raster gets from usvg.
fn embedded_markup(e: &EmbeddedVector, off: Offset) -> String {
    let (k, tx, ty, vx, vy) = match e.view_box.filter(|vb| vb.w > 0.0 && vb.h > 0.0) {
        Some(vb) => {
            let k = (e.iw / vb.w).min(e.ih / vb.h);
            (
                k,
                (e.iw - vb.w * k) / 2.0,
                (e.ih - vb.h * k) / 2.0,
                vb.x,
                vb.y,
            )
        }
        None => (1.0, 0.0, 0.0, 0.0, 0.0),
    };
    let s = e.scale * k;
    format!(
        "<g transform=\"translate({} {}) scale({} {}) translate({} {})\">{}</g>",
        off.x(e.x + e.scale * tx),
        off.y(e.y + e.scale * ty),
        num(s),
        num(s),
        num(-vx),
        num(-vy),
        e.inner_markup()
    )
}

/// Markup for one drawable stroke, or `None` when its font is unresolved.
fn primitive(stroke: &Stroke, fonts: &FontRegistry, off: Offset) -> Option<String> {
    let markup = match stroke {
        Stroke::Pen(s) => {
            let d = polyline_data(&s.points, off);
            if d.is_empty() || s.size <= 0.0 {
                String::new()
            } else {
                format!(
                    "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
                    d,
                    esc(&s.color),
                    num(s.size)
                )
            }
        }
        Stroke::Eraser(_) => String::new(),
        Stroke::Shape(s) => shape_markup(s, off),
        Stroke::Polygon(s) => {
            let pts: Vec<String> = s
                .points
                .iter()
                .filter(|p| p.is_finite())
                .map(|p| format!("{},{}", off.x(p.x), off.y(p.y)))
                .collect();
            if pts.is_empty() {
                String::new()
            } else {
                let (tag, fill) = match (s.closed, s.fill.as_deref()) {
                    (true, Some(f)) => ("polygon", esc(f)),
                    (true, None) => ("polygon", "none".to_string()),
                    (false, _) => ("polyline", "none".to_string()),
                };
                format!(
                    "<{} points=\"{}\" fill=\"{}\"{} stroke-linejoin=\"{}\" stroke-linecap=\"{}\"/>",
                    tag,
                    pts.join(" "),
                    fill,
                    stroke_attrs(&s.stroke, s.stroke_width),
                    s.join.as_svg(),
                    s.cap.as_svg()
                )
            }
        }
        Stroke::Text(t) => {
            let layout = layout_with(t, fonts)?;
            let outline = t.outline.as_ref().filter(|o| o.width > 0.0);
            let mut out = String::new();
            for glyph in layout.inked() {
                let d = path_data(&glyph.path, off);
                if let Some(o) = outline {
                    let _ = write!(
                        out,
                        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"{}\" stroke-miterlimit=\"{}\" stroke-linecap=\"round\"/>",
                        d,
                        esc(&o.color),
                        num(o.width),
                        o.join.as_svg(),
                        num(o.miter_limit)
                    );
                }
                let _ = write!(out, "<path d=\"{}\" fill=\"{}\"/>", d, esc(&t.fill));
            }
            out
        }
        Stroke::Embedded(e) => embedded_markup(e, off),
    };
    Some(markup)
}

fn mask_def(name: &str, erasers: &[&EraserStroke], off: Offset, w: u32, h: u32) -> String {
    let mut out = format!(
        "<mask id=\"{}\" maskUnits=\"userSpaceOnUse\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"><rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"white\"/>",
        name, w, h, w, h
    );
    for e in erasers.iter().filter(|e| e.size > 0.0) {
        let d = polyline_data(&e.points, off);
        if d.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            "<path d=\"{}\" fill=\"none\" stroke=\"black\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
            d,
            num(e.size)
        );
    }
    out.push_str("</mask>");
    out
}

fn mask_id(id: StrokeId) -> String {
    format!("erase-{}", id)
}

/// Serialize every visible stroke into a standalone SVG document.
///
/// # Errors
/// [`ExportError::NothingToExport`] when no visible stroke has finite bounds.
pub fn export_svg<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    fonts: &FontRegistry,
    opts: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let mut ordered: Vec<&Stroke> = strokes.into_iter().collect();
    ordered.sort_by_key(|s| s.z());

    let bounds = union_bounds(ordered.iter().copied(), fonts, AA_MARGIN)
        .ok_or(ExportError::NothingToExport)?;
    let width = bounds.w.ceil().max(1.0) as u32;
    let height = bounds.h.ceil().max(1.0) as u32;
    let off = Offset {
        dx: -bounds.x,
        dy: -bounds.y,
    };
    let erasers = erasers_by_target(ordered.iter().copied());

    let mut defs = String::new();
    let mut body = String::new();
    let mut skipped_text = Vec::new();
    let mut live: Vec<&EraserStroke> = Vec::new();
    let mut seen: BTreeSet<StrokeId> = BTreeSet::new();

    for stroke in ordered
        .iter()
        .filter(|s| s.is_visible() && !s.is_eraser())
    {
        let Some(inner) = primitive(stroke, fonts, off) else {
            tracing::warn!(
                "Skipping text {} during export: font not resolved",
                stroke.id()
            );
            skipped_text.push(stroke.id());
            continue;
        };
        if inner.is_empty() {
            continue;
        }

        let rotated = match (stroke.rotation(), rotation_center(stroke, fonts)) {
            (angle, Some(c)) if angle != 0.0 => format!(
                "<g transform=\"rotate({} {} {})\">{}</g>",
                num(angle),
                off.x(c.x),
                off.y(c.y),
                inner
            ),
            _ => inner,
        };

        match erasers.get(&stroke.id()) {
            Some(list) => {
                let name = mask_id(stroke.id());
                defs.push_str(&mask_def(&name, list, off, width, height));
                let _ = write!(body, "<g mask=\"url(#{})\">{}</g>", name, rotated);
                for e in list {
                    if seen.insert(e.meta.id) {
                        live.push(e);
                    }
                }
            }
            None => body.push_str(&rotated),
        }
    }

    let mut background = String::new();
    if !opts.transparent_background {
        let bg = opts.background;
        let opacity = if bg.a < 255 {
            format!(" fill-opacity=\"{}\"", num(bg.a as f64 / 255.0))
        } else {
            String::new()
        };
        let masked = if opts.erase_background && !live.is_empty() {
            live.sort_by_key(|e| e.meta.z);
            defs.push_str(&mask_def("erase-background", &live, off, width, height));
            " mask=\"url(#erase-background)\""
        } else {
            ""
        };
        background = format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"{}{}/>",
            width,
            height,
            Rgba::opaque(bg.r, bg.g, bg.b).to_hex(),
            opacity,
            masked
        );
    }

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\">",
        w = width,
        h = height
    );
    if !defs.is_empty() {
        let _ = write!(svg, "<defs>{}</defs>", defs);
    }
    svg.push_str(&background);
    svg.push_str(&body);
    svg.push_str("</svg>");

    tracing::info!(
        "Exported {}x{} document ({} skipped text)",
        width,
        height,
        skipped_text.len()
    );

    Ok(ExportReport {
        svg,
        width,
        height,
        bounds,
        skipped_text,
    })
}
