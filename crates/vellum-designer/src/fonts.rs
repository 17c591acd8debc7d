//! Font outline access and the per-document font registry.
//!
//! Text geometry is consumed through the [`GlyphOutlines`] trait so layout,
//! bounds, hit-testing, rasterizing and export never depend on a concrete
//! font library. [`RustTypeFace`] adapts `rusttype`; [`SystemFontSource`]
//! finds faces through `fontdb`.
//!
//! Resolution is asynchronous. [`FontRegistry`] offers a non-blocking
//! [`FontRegistry::try_get`], deduplicates in-flight loads per family, and
//! always clears the pending marker when a load finishes, whether it
//! succeeded or not.

use async_trait::async_trait;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use lyon::math::point;
use lyon::path::Path;
use rusttype::{Font, OutlineBuilder, Scale};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use vellum_core::{FontError, ReadyCallback, Rect, StatusCallback};
use vellum_settings::FontEntry;

/// A glyph outline placed in document space.
#[derive(Debug, Clone)]
pub struct GlyphPath {
    pub path: Path,
    /// `None` for glyphs without ink (spaces)
    pub bounds: Option<Rect>,
}

/// Glyph geometry and metrics of one resolved face.
///
/// Metrics are in font units; `glyph_path` returns the outline scaled to
/// `size` with its origin on the baseline at `(x, y)`, y pointing down.
pub trait GlyphOutlines {
    fn units_per_em(&self) -> f64;
    fn ascender(&self) -> f64;
    fn descender(&self) -> f64;
    fn advance_width(&self, c: char) -> f64;
    fn kerning(&self, left: char, right: char) -> f64;
    fn glyph_path(&self, c: char, x: f64, y: f64, size: f64) -> GlyphPath;
}

pub(crate) fn path_bounds(path: &Path) -> Option<Rect> {
    if path.iter().next().is_none() {
        return None;
    }
    let b = lyon::algorithms::aabb::bounding_box(path.iter());
    Some(Rect::new(
        b.min.x as f64,
        b.min.y as f64,
        (b.max.x - b.min.x) as f64,
        (b.max.y - b.min.y) as f64,
    ))
}

/// Collects rusttype outline callbacks into a lyon path with an offset.
struct LyonOutline {
    builder: lyon::path::path::Builder,
    dx: f32,
    dy: f32,
    open: bool,
}

impl LyonOutline {
    fn new(dx: f32, dy: f32) -> Self {
        Self {
            builder: Path::builder(),
            dx,
            dy,
            open: false,
        }
    }

    fn at(&self, x: f32, y: f32) -> lyon::math::Point {
        point(x + self.dx, y + self.dy)
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(false);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for LyonOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(false);
        }
        let at = self.at(x, y);
        self.builder.begin(at);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.at(x, y);
        self.builder.line_to(to);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.at(x1, y1);
        let to = self.at(x, y);
        self.builder.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.at(x1, y1);
        let c2 = self.at(x2, y2);
        let to = self.at(x, y);
        self.builder.cubic_bezier_to(c1, c2, to);
    }

    fn close(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
    }
}

/// [`GlyphOutlines`] backed by a `rusttype` font.
pub struct RustTypeFace {
    font: Font<'static>,
    units_per_em: f64,
    ascent: f64,
    descent: f64,
}

impl RustTypeFace {
    pub fn from_bytes(family: &str, bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| FontError::Parse {
            family: family.to_string(),
            reason: "not a TrueType/OpenType font".to_string(),
        })?;
        let vm = font.v_metrics_unscaled();
        Ok(Self {
            units_per_em: f64::from(font.units_per_em().max(1)),
            ascent: f64::from(vm.ascent),
            descent: f64::from(vm.descent),
            font,
        })
    }

    /// Scale at which one pixel equals one font unit.
    fn unit_scale(&self) -> Scale {
        Scale::uniform((self.ascent - self.descent).max(1.0) as f32)
    }

    /// Scale at which the em square is `size` units tall.
    fn em_scale(&self, size: f64) -> Scale {
        let height = size * (self.ascent - self.descent).max(1.0) / self.units_per_em;
        Scale::uniform(height as f32)
    }
}

impl GlyphOutlines for RustTypeFace {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn ascender(&self) -> f64 {
        self.ascent
    }

    fn descender(&self) -> f64 {
        self.descent
    }

    fn advance_width(&self, c: char) -> f64 {
        f64::from(
            self.font
                .glyph(c)
                .scaled(self.unit_scale())
                .h_metrics()
                .advance_width,
        )
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        f64::from(self.font.pair_kerning(self.unit_scale(), left, right))
    }

    fn glyph_path(&self, c: char, x: f64, y: f64, size: f64) -> GlyphPath {
        let glyph = self.font.glyph(c).scaled(self.em_scale(size));
        let mut outline = LyonOutline::new(x as f32, y as f32);
        glyph.build_outline(&mut outline);
        let path = outline.finish();
        let bounds = path_bounds(&path);
        GlyphPath { path, bounds }
    }
}

/// Asynchronous provider of faces by family name.
#[async_trait(?Send)]
pub trait FontSource {
    async fn load(&self, family: &str) -> Result<Rc<dyn GlyphOutlines>, FontError>;
}

/// Resolves families from installed system fonts and configured font files.
pub struct SystemFontSource {
    db: Database,
    files: HashMap<String, PathBuf>,
}

impl SystemFontSource {
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("fontdb loaded {} system faces", db.len());
        Self {
            db,
            files: HashMap::new(),
        }
    }

    /// Register configured entries whose url is a local file.
    pub fn with_entries(mut self, entries: &[FontEntry]) -> Self {
        for entry in entries {
            let path = entry.url.strip_prefix("file://").unwrap_or(&entry.url);
            if path.contains("://") {
                tracing::debug!("Skipping remote font source for {}", entry.family);
                continue;
            }
            self.files.insert(entry.family.clone(), PathBuf::from(path));
        }
        self
    }

    /// Sorted list of all family names known to the system database.
    pub fn families(&self) -> Vec<String> {
        let mut set = HashSet::new();
        for face in self.db.faces() {
            for (name, _) in &face.families {
                set.insert(name.clone());
            }
        }
        set.extend(self.files.keys().cloned());
        let mut out: Vec<_> = set.into_iter().collect();
        out.sort();
        out
    }

    fn read_bytes(&self, family: &str) -> Result<Vec<u8>, FontError> {
        let io_err = |e: std::io::Error| FontError::Io {
            family: family.to_string(),
            reason: e.to_string(),
        };
        if let Some(path) = self.files.get(family) {
            return fs::read(path).map_err(io_err);
        }

        let families: Vec<Family<'_>> = match family.trim() {
            "" | "Sans" | "sans-serif" => vec![Family::SansSerif],
            "Serif" | "serif" => vec![Family::Serif],
            "Monospace" | "monospace" => vec![Family::Monospace],
            other => vec![Family::Name(other)],
        };
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let not_found = || FontError::NotFound {
            family: family.to_string(),
        };
        let id = self.db.query(&query).ok_or_else(not_found)?;
        let face = self.db.face(id).ok_or_else(not_found)?;

        match &face.source {
            fontdb::Source::File(path) => fs::read(path).map_err(io_err),
            fontdb::Source::SharedFile(path, _) => fs::read(path).map_err(io_err),
            fontdb::Source::Binary(bytes) => Ok(bytes.as_ref().as_ref().to_vec()),
        }
    }
}

impl Default for SystemFontSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl FontSource for SystemFontSource {
    async fn load(&self, family: &str) -> Result<Rc<dyn GlyphOutlines>, FontError> {
        let bytes = self.read_bytes(family)?;
        let face = RustTypeFace::from_bytes(family, bytes)?;
        Ok(Rc::new(face))
    }
}

/// Font bytes held in memory, e.g. uploaded TTF/OTF files.
#[derive(Default)]
pub struct MemoryFontSource {
    fonts: HashMap<String, Vec<u8>>,
}

impl MemoryFontSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: impl Into<String>, bytes: Vec<u8>) {
        self.fonts.insert(family.into(), bytes);
    }
}

#[async_trait(?Send)]
impl FontSource for MemoryFontSource {
    async fn load(&self, family: &str) -> Result<Rc<dyn GlyphOutlines>, FontError> {
        let bytes = self
            .fonts
            .get(family)
            .ok_or_else(|| FontError::NotFound {
                family: family.to_string(),
            })?
            .clone();
        Ok(Rc::new(RustTypeFace::from_bytes(family, bytes)?))
    }
}

/// Resolution state of a family.
#[derive(Clone)]
pub enum FontState {
    Ready(Rc<dyn GlyphOutlines>),
    Pending,
    Missing,
}

/// Per-document font cache with in-flight deduplication.
#[derive(Default)]
pub struct FontRegistry {
    faces: HashMap<String, Rc<dyn GlyphOutlines>>,
    pending: HashSet<String>,
    status: Option<String>,
    on_ready: Option<ReadyCallback>,
    on_status: Option<StatusCallback>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback fired after every completed load, used to trigger a re-render.
    pub fn set_on_ready(&mut self, callback: ReadyCallback) {
        self.on_ready = Some(callback);
    }

    pub fn set_on_status(&mut self, callback: StatusCallback) {
        self.on_status = Some(callback);
    }

    /// Resolved face, if any. Never blocks and never starts a load.
    pub fn try_get(&self, family: &str) -> Option<Rc<dyn GlyphOutlines>> {
        self.faces.get(family).cloned()
    }

    pub fn state(&self, family: &str) -> FontState {
        if let Some(face) = self.faces.get(family) {
            FontState::Ready(face.clone())
        } else if self.pending.contains(family) {
            FontState::Pending
        } else {
            FontState::Missing
        }
    }

    pub fn is_pending(&self, family: &str) -> bool {
        self.pending.contains(family)
    }

    /// Mark `family` as loading. Returns false when it is already resolved or
    /// in flight, in which case the caller must not start another load.
    pub fn begin_load(&mut self, family: &str) -> bool {
        if self.faces.contains_key(family) || self.pending.contains(family) {
            return false;
        }
        self.pending.insert(family.to_string());
        self.set_status(format!("Loading font: {}", family));
        true
    }

    /// Record the outcome of a load started with [`begin_load`](Self::begin_load).
    pub fn complete(&mut self, family: &str, result: Result<Rc<dyn GlyphOutlines>, FontError>) {
        self.pending.remove(family);
        match result {
            Ok(face) => {
                self.faces.insert(family.to_string(), face);
                tracing::info!("Font ready: {}", family);
                self.set_status(format!("Font ready: {}", family));
            }
            Err(e) => {
                tracing::warn!("Font load failed for {}: {}", family, e);
                self.set_status(format!("Failed to load {}: {}", family, e));
            }
        }
        if let Some(cb) = &self.on_ready {
            cb(family);
        }
    }

    /// Resolve `family` through `source`, deduplicating with in-flight loads.
    pub async fn load(&mut self, family: &str, source: &dyn FontSource) -> FontState {
        if !self.begin_load(family) {
            return self.state(family);
        }
        let result = source.load(family).await;
        self.complete(family, result);
        self.state(family)
    }

    /// Register an already parsed face, e.g. an uploaded font.
    pub fn insert_face(&mut self, family: impl Into<String>, face: Rc<dyn GlyphOutlines>) {
        let family = family.into();
        self.pending.remove(&family);
        self.set_status(format!("Font loaded: {}", family));
        self.faces.insert(family, face);
    }

    /// Families that have a resolved face.
    pub fn resolved_families(&self) -> Vec<String> {
        let mut out: Vec<_> = self.faces.keys().cloned().collect();
        out.sort();
        out
    }

    /// Last human-readable status line.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, message: String) {
        if let Some(cb) = &self.on_status {
            cb(&message);
        }
        self.status = Some(message);
    }
}

pub mod testing {
    //! Deterministic face for tests and benchmarks.

    use super::{path_bounds, GlyphOutlines, GlyphPath};
    use lyon::math::{point, Box2D};
    use lyon::path::{Path, Winding};

    /// Every inked glyph is a box; no font file needed.
    ///
    /// 1000 units per em, ascender 800, descender -200. Inked glyphs advance
    /// 500 units and cover x 50..450, y -700..0 relative to the origin.
    /// A space advances 250 with no ink. The pair `AV` kerns by -100.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BoxFace;

    impl GlyphOutlines for BoxFace {
        fn units_per_em(&self) -> f64 {
            1000.0
        }

        fn ascender(&self) -> f64 {
            800.0
        }

        fn descender(&self) -> f64 {
            -200.0
        }

        fn advance_width(&self, c: char) -> f64 {
            if c == ' ' {
                250.0
            } else {
                500.0
            }
        }

        fn kerning(&self, left: char, right: char) -> f64 {
            if left == 'A' && right == 'V' {
                -100.0
            } else {
                0.0
            }
        }

        fn glyph_path(&self, c: char, x: f64, y: f64, size: f64) -> GlyphPath {
            let mut builder = Path::builder();
            if !c.is_whitespace() {
                let s = size / 1000.0;
                builder.add_rectangle(
                    &Box2D::new(
                        point((x + 50.0 * s) as f32, (y - 700.0 * s) as f32),
                        point((x + 450.0 * s) as f32, y as f32),
                    ),
                    Winding::Positive,
                );
            }
            let path = builder.build();
            let bounds = path_bounds(&path);
            GlyphPath { path, bounds }
        }
    }
}
