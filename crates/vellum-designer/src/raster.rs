//! Raster preview using tiny-skia.
//!
//! Strokes are drawn in ascending z-order. Each visible, non-eraser stroke
//! is rendered alone onto a scratch layer, the erasers that target its id
//! are subtracted from that layer with `DestinationOut`, and the layer is
//! then composited onto the surface. An eraser therefore only ever affects
//! the strokes listed in its target set.
//!
//! Features:
//! - Anti-aliased fills and strokes from the shared lyon geometry
//! - Per-glyph text drawing, outline under fill
//! - Embedded vectors through resvg with a per-document tree cache
//! - Selection frames and corner handles rotated with their stroke

use crate::bounds::local_bounds;
use crate::fonts::FontRegistry;
use crate::hit::handle_rect;
use crate::model::{EmbeddedVector, EraserStroke, LineCap, LineJoin, ShapeKind, Stroke, StrokeId};
use crate::selection::Selection;
use crate::store::StrokeStore;
use crate::text_layout::layout_with;
use crate::transform::Handle;
use resvg::usvg;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use tiny_skia::{
    BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke as SkStroke,
    StrokeDash, Transform,
};
use vellum_core::constants::{SELECTION_COLOR, SELECTION_DASH};
use vellum_core::{ExportError, Point, Rect, Rgba};

/// Output surface and view mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    /// `None` leaves the surface transparent
    pub background: Option<Rgba>,
    /// Document point drawn at pixel (0, 0)
    pub origin: Point,
    pub zoom: f64,
    /// Subtract every live eraser from the background too
    pub erase_background: bool,
}

impl RasterOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            origin: Point::new(0.0, 0.0),
            zoom: 1.0,
            erase_background: false,
        }
    }

    /// Surface covering `bounds` at scale 1, the same area the exporter writes.
    pub fn covering(bounds: Rect) -> Self {
        Self {
            width: bounds.w.ceil().max(1.0) as u32,
            height: bounds.h.ceil().max(1.0) as u32,
            background: None,
            origin: Point::new(bounds.x, bounds.y),
            zoom: 1.0,
            erase_background: false,
        }
    }

    pub fn with_background(mut self, background: Option<Rgba>) -> Self {
        self.background = background;
        self
    }

    fn view(&self) -> Transform {
        let z = self.zoom as f32;
        Transform::from_row(
            z,
            0.0,
            0.0,
            z,
            (-self.origin.x * self.zoom) as f32,
            (-self.origin.y * self.zoom) as f32,
        )
    }
}

struct CachedTree {
    markup_hash: u64,
    tree: Option<usvg::Tree>,
}

/// Parsed embedded documents keyed by stroke id and markup hash.
///
/// Owned by the document, so independent documents never share entries.
#[derive(Default)]
pub struct EmbedCache {
    entries: HashMap<StrokeId, CachedTree>,
}

impl EmbedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose stroke no longer exists.
    pub fn retain(&mut self, store: &StrokeStore) {
        self.entries.retain(|id, _| store.contains(*id));
    }

    /// Parsed tree for `e`, reparsed only when its markup changed.
    ///
    /// Markup that fails to parse is cached as `None` and skipped.
    pub fn tree_for(&mut self, e: &EmbeddedVector) -> Option<&usvg::Tree> {
        let mut hasher = DefaultHasher::new();
        e.svg.hash(&mut hasher);
        let markup_hash = hasher.finish();

        let stale = self
            .entries
            .get(&e.meta.id)
            .is_none_or(|c| c.markup_hash != markup_hash);
        if stale {
            let tree = match usvg::Tree::from_str(&e.svg, &usvg::Options::default()) {
                Ok(tree) => Some(tree),
                Err(err) => {
                    tracing::warn!("Embedded vector {} failed to parse: {}", e.meta.id, err);
                    None
                }
            };
            self.entries
                .insert(e.meta.id, CachedTree { markup_hash, tree });
        }
        self.entries.get(&e.meta.id)?.tree.as_ref()
    }
}

/// Convert a lyon path into a tiny-skia path.
pub(crate) fn to_skia_path(path: &lyon::path::Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            lyon::path::Event::Begin { at } => pb.move_to(at.x, at.y),
            lyon::path::Event::Line { to, .. } => pb.line_to(to.x, to.y),
            lyon::path::Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            lyon::path::Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            lyon::path::Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

fn color_of(value: &str) -> Color {
    let c = Rgba::parse(value).unwrap_or_else(|e| {
        tracing::debug!("{}, drawing black", e);
        Rgba::BLACK
    });
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn paint_of(value: &str) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color_of(value));
    paint.anti_alias = true;
    paint
}

fn sk_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}

fn sk_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

fn round_stroke(width: f64) -> SkStroke {
    SkStroke {
        width: width as f32,
        line_cap: tiny_skia::LineCap::Round,
        line_join: tiny_skia::LineJoin::Round,
        ..Default::default()
    }
}

/// Stroke rotation about its local box center, in document space.
fn rotation_of(stroke: &Stroke, fonts: &FontRegistry) -> Transform {
    let angle = stroke.rotation();
    if angle == 0.0 {
        return Transform::identity();
    }
    match local_bounds(stroke, fonts).known() {
        Some(b) => {
            let c = b.center();
            Transform::from_rotate_at(angle as f32, c.x as f32, c.y as f32)
        }
        None => Transform::identity(),
    }
}

/// Draw one stroke, without erasure, onto `pixmap`.
fn draw_stroke(
    pixmap: &mut Pixmap,
    stroke: &Stroke,
    fonts: &FontRegistry,
    cache: &mut EmbedCache,
    view: Transform,
) {
    let ts = view.pre_concat(rotation_of(stroke, fonts));
    match stroke {
        Stroke::Pen(s) => {
            if s.size <= 0.0 {
                return;
            }
            if let Some(path) = to_skia_path(&s.path()) {
                pixmap.stroke_path(&path, &paint_of(&s.color), &round_stroke(s.size), ts, None);
            }
        }
        Stroke::Eraser(_) => {}
        Stroke::Shape(s) => {
            let Some(path) = to_skia_path(&s.path()) else {
                return;
            };
            if let Some(fill) = s.fill.as_deref().filter(|_| s.has_fill()) {
                pixmap.fill_path(&path, &paint_of(fill), FillRule::Winding, ts, None);
            }
            if s.stroke_width > 0.0 {
                let sk = match s.kind {
                    ShapeKind::Line => round_stroke(s.stroke_width),
                    ShapeKind::Rect | ShapeKind::Ellipse => SkStroke {
                        width: s.stroke_width as f32,
                        ..Default::default()
                    },
                };
                pixmap.stroke_path(&path, &paint_of(&s.stroke), &sk, ts, None);
            }
        }
        Stroke::Polygon(s) => {
            let Some(path) = to_skia_path(&s.path()) else {
                return;
            };
            if let Some(fill) = s.fill.as_deref().filter(|_| s.is_filled()) {
                pixmap.fill_path(&path, &paint_of(fill), FillRule::Winding, ts, None);
            }
            if s.stroke_width > 0.0 {
                let sk = SkStroke {
                    width: s.stroke_width as f32,
                    line_cap: sk_cap(s.cap),
                    line_join: sk_join(s.join),
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint_of(&s.stroke), &sk, ts, None);
            }
        }
        Stroke::Text(t) => {
            let Some(layout) = layout_with(t, fonts) else {
                return;
            };
            let fill = paint_of(&t.fill);
            let outline = t.outline.as_ref().filter(|o| o.width > 0.0).map(|o| {
                let sk = SkStroke {
                    width: o.width as f32,
                    miter_limit: o.miter_limit as f32,
                    line_join: sk_join(o.join),
                    line_cap: tiny_skia::LineCap::Round,
                    ..Default::default()
                };
                (paint_of(&o.color), sk)
            });
            for glyph in layout.inked() {
                let Some(path) = to_skia_path(&glyph.path) else {
                    continue;
                };
                if let Some((paint, sk)) = &outline {
                    pixmap.stroke_path(&path, paint, sk, ts, None);
                }
                pixmap.fill_path(&path, &fill, FillRule::Winding, ts, None);
            }
        }
        Stroke::Embedded(e) => {
            let Some(tree) = cache.tree_for(e) else {
                return;
            };
            let size = tree.size();
            if size.width() <= 0.0 || size.height() <= 0.0 {
                return;
            }
            let sx = (e.iw * e.scale) as f32 / size.width();
            let sy = (e.ih * e.scale) as f32 / size.height();
            let placed = ts.pre_translate(e.x as f32, e.y as f32).pre_scale(sx, sy);
            resvg::render(tree, placed, &mut pixmap.as_mut());
        }
    }
}

/// Subtract `eraser` from whatever is on `pixmap`.
fn apply_eraser(pixmap: &mut Pixmap, eraser: &EraserStroke, view: Transform) {
    if eraser.size <= 0.0 {
        return;
    }
    let Some(path) = to_skia_path(&eraser.path()) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.blend_mode = BlendMode::DestinationOut;
    paint.anti_alias = true;
    pixmap.stroke_path(&path, &paint, &round_stroke(eraser.size), view, None);
}

/// Visible erasers grouped by the ids they target, each list in z-order.
pub fn erasers_by_target<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
) -> HashMap<StrokeId, Vec<&'a EraserStroke>> {
    let mut erasers: Vec<&EraserStroke> = strokes
        .into_iter()
        .filter(|s| s.is_visible())
        .filter_map(|s| match s {
            Stroke::Eraser(e) => Some(e),
            _ => None,
        })
        .collect();
    erasers.sort_by_key(|e| e.meta.z);

    let mut map: HashMap<StrokeId, Vec<&EraserStroke>> = HashMap::new();
    for e in erasers {
        for id in &e.target_ids {
            map.entry(*id).or_default().push(e);
        }
    }
    map
}

/// Render every visible stroke with per-id erasure.
pub fn render<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    fonts: &FontRegistry,
    cache: &mut EmbedCache,
    opts: &RasterOptions,
) -> Result<Pixmap, ExportError> {
    let surface_error = || ExportError::Surface {
        width: opts.width,
        height: opts.height,
    };
    let mut pixmap = Pixmap::new(opts.width, opts.height).ok_or_else(surface_error)?;
    let mut scratch = Pixmap::new(opts.width, opts.height).ok_or_else(surface_error)?;

    let mut ordered: Vec<&Stroke> = strokes.into_iter().collect();
    ordered.sort_by_key(|s| s.z());
    let erasers = erasers_by_target(ordered.iter().copied());
    let view = opts.view();
    let drawn: Vec<&Stroke> = ordered
        .iter()
        .copied()
        .filter(|s| s.is_visible() && !s.is_eraser())
        .collect();

    if let Some(bg) = opts.background {
        let color = Color::from_rgba8(bg.r, bg.g, bg.b, bg.a);
        if opts.erase_background {
            scratch.fill(color);
            let mut live: Vec<&EraserStroke> = drawn
                .iter()
                .filter_map(|s| erasers.get(&s.id()))
                .flatten()
                .copied()
                .collect();
            let mut seen = HashSet::new();
            live.retain(|e| seen.insert(e.meta.id));
            live.sort_by_key(|e| e.meta.z);
            for eraser in live {
                apply_eraser(&mut scratch, eraser, view);
            }
            pixmap.draw_pixmap(
                0,
                0,
                scratch.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        } else {
            pixmap.fill(color);
        }
    }

    for stroke in drawn {
        scratch.fill(Color::TRANSPARENT);
        draw_stroke(&mut scratch, stroke, fonts, cache, view);
        if let Some(list) = erasers.get(&stroke.id()) {
            for eraser in list {
                apply_eraser(&mut scratch, eraser, view);
            }
        }
        pixmap.draw_pixmap(
            0,
            0,
            scratch.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
    Ok(pixmap)
}

fn selection_paint() -> Paint<'static> {
    paint_of(SELECTION_COLOR)
}

/// Dashed frame around each selected stroke, plus corner handles on the primary.
///
/// Drawn on top of the composed surface; never part of export geometry.
pub fn draw_selection(
    pixmap: &mut Pixmap,
    store: &StrokeStore,
    selection: &Selection,
    fonts: &FontRegistry,
    opts: &RasterOptions,
) {
    let view = opts.view();
    let paint = selection_paint();
    let zoom = opts.zoom.max(f64::EPSILON) as f32;
    let frame_stroke = SkStroke {
        width: 1.0 / zoom,
        dash: StrokeDash::new(SELECTION_DASH.iter().map(|d| d / zoom).collect(), 0.0),
        ..Default::default()
    };
    let handle_stroke = SkStroke {
        width: 1.0 / zoom,
        ..Default::default()
    };
    let mut white = Paint::default();
    white.set_color(Color::WHITE);

    for id in selection.ids() {
        let Some(stroke) = store.get(*id) else {
            continue;
        };
        let Some(b) = local_bounds(stroke, fonts).known() else {
            continue;
        };
        let ts = view.pre_concat(rotation_of(stroke, fonts));
        if let Some(r) = tiny_skia::Rect::from_xywh(b.x as f32, b.y as f32, b.w as f32, b.h as f32)
        {
            pixmap.stroke_path(&PathBuilder::from_rect(r), &paint, &frame_stroke, ts, None);
        }
        if selection.primary() != Some(*id) {
            continue;
        }
        for handle in Handle::ALL {
            let h = handle_rect(handle.corner(&b));
            if let Some(r) =
                tiny_skia::Rect::from_xywh(h.x as f32, h.y as f32, h.w as f32, h.h as f32)
            {
                let path = PathBuilder::from_rect(r);
                pixmap.fill_path(&path, &white, FillRule::Winding, ts, None);
                pixmap.stroke_path(&path, &paint, &handle_stroke, ts, None);
            }
        }
    }
}

/// Preview of an in-progress polygon, including its trailing vertex.
pub fn draw_polygon_preview(pixmap: &mut Pixmap, points: &[Point], opts: &RasterOptions) {
    let path = crate::model::polyline_path(points, false);
    if let Some(p) = to_skia_path(&path) {
        let sk = SkStroke {
            width: (1.0 / opts.zoom.max(f64::EPSILON)) as f32,
            dash: StrokeDash::new(SELECTION_DASH.to_vec(), 0.0),
            ..Default::default()
        };
        pixmap.stroke_path(&p, &selection_paint(), &sk, opts.view(), None);
    }
}

/// Encode a rendered surface as PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba).ok_or(
        ExportError::Encode {
            reason: "pixel buffer size mismatch".to_string(),
        },
    )?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ExportError::Encode {
            reason: e.to_string(),
        })?;
    Ok(out.into_inner())
}
