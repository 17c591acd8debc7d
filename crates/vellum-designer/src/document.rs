//! Editable document.
//!
//! [`Document`] ties the stroke store, selection, font registry, embed cache,
//! undo history and the active interaction session together. Hosts feed it
//! pointer events and commands and ask it to render or export.
//!
//! Every committed change records the preceding stroke list in the history.
//! Pointer sessions record once, when the pointer is released, so a whole
//! drag or freehand run undoes in one step.

use crate::bounds::{local_bounds, union_bounds};
use crate::fonts::{FontRegistry, FontSource, FontState};
use crate::hit::{hit_handle, hit_test};
use crate::history::History;
use crate::model::{
    EmbeddedVector, EraserStroke, Point, PolygonStroke, ShapeKind, ShapeStroke, Stroke, StrokeId,
    StrokeKind, TextStroke,
};
use crate::raster::{self, EmbedCache, RasterOptions};
use crate::selection::Selection;
use crate::serialization::{DocumentSnapshot, EmbeddedFont};
use crate::session::{DraftStep, PolygonDraft, Session, Tool};
use crate::store::{ReorderOp, StrokeStore};
use crate::svg_export::{self, ExportOptions, ExportReport};
use crate::transform::{self, ResizeRequest};
use tiny_skia::Pixmap;
use vellum_core::constants::AA_MARGIN;
use vellum_core::{DocumentError, ExportError, ImportError, Rgba};
use vellum_settings::{Config, FontEntry, ShapeKindSetting};

/// Keyboard state accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Square shapes while creating or resizing; toggle selection on click
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

pub struct Document {
    store: StrokeStore,
    selection: Selection,
    fonts: FontRegistry,
    cache: EmbedCache,
    history: History,
    session: Session,
    tool: Tool,
    config: Config,
    background: Rgba,
    transparent_background: bool,
    /// Store content before the edit in progress
    pending: Option<Vec<Stroke>>,
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Empty document using `config` for tool defaults and background.
    pub fn with_config(config: Config) -> Self {
        let background = Rgba::parse(&config.canvas.background).unwrap_or_else(|e| {
            tracing::warn!("{}, using white background", e);
            Rgba::WHITE
        });
        let transparent_background = config.canvas.transparent_background;
        Self {
            store: StrokeStore::new(),
            selection: Selection::new(),
            fonts: FontRegistry::new(),
            cache: EmbedCache::new(),
            history: History::new(),
            session: Session::Idle,
            tool: Tool::Select,
            config,
            background,
            transparent_background,
            pending: None,
            modified: false,
        }
    }

    /// Document restored from a snapshot.
    pub fn from_snapshot(config: Config, snapshot: DocumentSnapshot) -> Result<Self, DocumentError> {
        let mut doc = Self::with_config(config);
        doc.restore(snapshot)?;
        Ok(doc)
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent_background
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn set_background(&mut self, color: Rgba, transparent: bool) {
        self.background = color;
        self.transparent_background = transparent;
        self.modified = true;
    }

    /// Switch tools, finishing whatever session is in progress.
    ///
    /// A polygon draft is committed when it has enough vertices and
    /// discarded otherwise.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        if matches!(self.session, Session::PolygonEdit(_)) {
            self.close_polygon();
        } else if !self.session.is_idle() {
            self.pointer_up();
        }
        self.store.break_pen_input();
        tracing::debug!("Tool {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
    }

    /// Change pen color and width; the next pen run starts a new stroke.
    pub fn set_pen_style(&mut self, color: impl Into<String>, width: f64) {
        self.config.pen.color = color.into();
        self.config.pen.width = width;
        self.store.break_pen_input();
    }

    fn begin_edit(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.store.snapshot());
        }
    }

    fn end_edit(&mut self, changed: bool) {
        if let Some(before) = self.pending.take() {
            if changed {
                self.history.record(before);
                self.modified = true;
            }
        }
    }

    fn revert_edit(&mut self) {
        if let Some(before) = self.pending.take() {
            self.store.restore(before);
            self.selection.retain_existing(&self.store);
        }
    }

    /// Run a command as one undoable step.
    fn edit<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        if !self.session.is_idle() && !matches!(self.session, Session::PolygonEdit(_)) {
            self.pointer_up();
        }
        self.begin_edit();
        let changed = f(self);
        self.end_edit(changed);
        changed
    }

    // Pointer input

    /// Pointer pressed at `at` (document space).
    ///
    /// Returns the stroke the press created or grabbed, if any.
    pub fn pointer_down(&mut self, at: Point, mods: Modifiers) -> Option<StrokeId> {
        if !self.session.is_idle() && !matches!(self.session, Session::PolygonEdit(_)) {
            tracing::debug!("Ignoring pointer down during {}", self.session.name());
            return None;
        }
        match self.tool {
            Tool::Select => self.begin_select(at, mods),
            Tool::Pen => {
                self.begin_edit();
                let id = self
                    .store
                    .begin_pen_input(&self.config.pen.color, self.config.pen.width, at);
                self.session = Session::Freehand {
                    id,
                    eraser: false,
                    capture_hits: false,
                };
                Some(id)
            }
            Tool::Eraser => Some(self.begin_eraser(at)),
            Tool::Shape => Some(self.begin_shape(at)),
            Tool::Polygon => self.polygon_click(at),
            Tool::Text => Some(self.place_text(at)),
        }
    }

    fn begin_select(&mut self, at: Point, mods: Modifiers) -> Option<StrokeId> {
        let grab = self.selection.primary().and_then(|id| {
            let stroke = self.store.get(id).filter(|s| !s.is_locked())?;
            let handle = hit_handle(at, stroke, &self.fonts)?;
            let start_bounds = local_bounds(stroke, &self.fonts).known()?;
            Some((id, handle, start_bounds, stroke.clone()))
        });
        if let Some((id, handle, start_bounds, start)) = grab {
            self.begin_edit();
            self.session = Session::Resize {
                id,
                handle,
                start_bounds,
                start: Box::new(start),
            };
            return Some(id);
        }

        let hit = hit_test(at, self.store.iter(), &self.fonts);
        match hit {
            Some(id) => {
                if mods.shift {
                    self.selection.toggle(id);
                    if !self.selection.contains(id) {
                        return None;
                    }
                } else if !self.selection.contains(id) {
                    self.selection.select_only(id);
                }
                self.begin_edit();
                self.session = Session::Drag {
                    id,
                    last: at,
                    moved: false,
                };
            }
            None if !mods.shift => self.selection.clear(),
            None => {}
        }
        hit
    }

    fn begin_eraser(&mut self, at: Point) -> StrokeId {
        let mut eraser = EraserStroke::new(self.config.pen.eraser_width);
        eraser.points.push(at);
        let capture_hits = self.selection.is_empty();
        if capture_hits {
            eraser
                .target_ids
                .extend(hit_test(at, self.store.iter(), &self.fonts));
        } else {
            let store = &self.store;
            eraser.target_ids.extend(
                self.selection
                    .ids()
                    .iter()
                    .copied()
                    .filter(|id| store.get(*id).is_some_and(|s| !s.is_eraser())),
            );
        }
        self.begin_edit();
        let id = self.store.append(eraser.into());
        self.session = Session::Freehand {
            id,
            eraser: true,
            capture_hits,
        };
        id
    }

    fn begin_shape(&mut self, at: Point) -> StrokeId {
        let settings = &self.config.shape;
        let kind = match settings.kind {
            ShapeKindSetting::Rect => ShapeKind::Rect,
            ShapeKindSetting::Ellipse => ShapeKind::Ellipse,
            ShapeKindSetting::Line => ShapeKind::Line,
        };
        let mut shape = ShapeStroke::new(kind, at.x, at.y);
        shape.fill = settings.has_fill.then(|| settings.fill.clone());
        shape.stroke = settings.stroke.clone();
        shape.stroke_width = settings.stroke_width;
        shape.corner_radius =
            (kind == ShapeKind::Rect && settings.corner_radius > 0.0).then_some(settings.corner_radius);

        self.begin_edit();
        let id = self.store.append(shape.into());
        self.selection.select_only(id);
        self.session = Session::ShapeCreate { id, origin: at };
        id
    }

    fn polygon_click(&mut self, at: Point) -> Option<StrokeId> {
        let step = match &mut self.session {
            Session::PolygonEdit(draft) => draft.push(at),
            _ => {
                self.session =
                    Session::PolygonEdit(PolygonDraft::new(at, self.config.polygon.close_radius));
                return None;
            }
        };
        match step {
            DraftStep::Added => None,
            DraftStep::Closed(vertices) => {
                self.session = Session::Idle;
                Some(self.commit_polygon(vertices, true))
            }
        }
    }

    fn commit_polygon(&mut self, vertices: Vec<Point>, closed: bool) -> StrokeId {
        let settings = &self.config.polygon;
        let mut poly = PolygonStroke::new(vertices, closed);
        poly.fill = (closed && settings.has_fill).then(|| settings.fill.clone());
        poly.stroke = settings.stroke.clone();
        poly.stroke_width = settings.stroke_width;

        let mut id = poly.meta.id;
        self.edit(|doc| {
            id = doc.store.append(poly.into());
            true
        });
        self.selection.select_only(id);
        id
    }

    fn place_text(&mut self, at: Point) -> StrokeId {
        let settings = &self.config.text;
        let mut text = TextStroke::new(
            settings.placeholder.clone(),
            settings.font_family.clone(),
            at.x,
            at.y,
        )
        .with_size(settings.size);
        text.fill = settings.fill.clone();
        text.line_height = settings.line_height;
        text.letter_spacing = settings.letter_spacing;
        if self.fonts.try_get(&text.font_family).is_none() {
            tracing::debug!("Text placed before {} resolved", text.font_family);
        }

        let mut id = text.meta.id;
        self.edit(|doc| {
            id = doc.store.append(text.into());
            true
        });
        self.selection.select_only(id);
        self.tool = Tool::Select;
        id
    }

    /// Pointer moved to `at` with the button held, or hovering during a
    /// polygon draft.
    pub fn pointer_move(&mut self, at: Point, mods: Modifiers) {
        match &mut self.session {
            Session::Idle => {}
            Session::Drag { last, moved, .. } => {
                let (dx, dy) = (at.x - last.x, at.y - last.y);
                if dx == 0.0 && dy == 0.0 {
                    return;
                }
                *last = at;
                *moved = true;
                for id in self.selection.ids() {
                    if let Some(s) = self.store.get_mut(*id) {
                        if !s.is_locked() {
                            *s = transform::translate(s, dx, dy);
                        }
                    }
                }
            }
            Session::Resize {
                id,
                handle,
                start_bounds,
                start,
            } => {
                let req = ResizeRequest {
                    handle: *handle,
                    pointer: at,
                    start_bounds: *start_bounds,
                    start: &**start,
                    keep_square: mods.shift,
                };
                let next = transform::resize(&req, &self.fonts);
                if let Some(slot) = self.store.get_mut(*id) {
                    *slot = next;
                }
            }
            Session::Freehand { eraser: false, .. } => {
                self.store.extend_pen_input(at);
            }
            Session::Freehand {
                id,
                eraser: true,
                capture_hits,
            } => {
                let hit = if *capture_hits {
                    hit_test(at, self.store.iter(), &self.fonts)
                } else {
                    None
                };
                if let Some(Stroke::Eraser(e)) = self.store.get_mut(*id) {
                    if e.points.last() != Some(&at) {
                        e.points.push(at);
                    }
                    e.target_ids.extend(hit);
                }
            }
            Session::ShapeCreate { id, origin } => {
                let (mut w, mut h) = (at.x - origin.x, at.y - origin.y);
                if let Some(Stroke::Shape(s)) = self.store.get_mut(*id) {
                    if mods.shift && s.kind != ShapeKind::Line {
                        let m = w.abs().min(h.abs());
                        w = m.copysign(w);
                        h = m.copysign(h);
                    }
                    s.w = w;
                    s.h = h;
                }
            }
            Session::PolygonEdit(draft) => draft.hover(at),
        }
    }

    /// Pointer released: commit the session as one undo step.
    ///
    /// An eraser that captured no target and a shape that never got a size
    /// are dropped. Polygon drafts stay open across releases.
    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::PolygonEdit(draft) => self.session = Session::PolygonEdit(draft),
            Session::Drag { moved, .. } => self.end_edit(moved),
            Session::Resize { id, start, .. } => {
                let changed = self.store.get(id).is_some_and(|s| *s != *start);
                self.end_edit(changed);
            }
            Session::Freehand { eraser: false, .. } => {
                self.store.end_pen_input();
                self.end_edit(true);
            }
            Session::Freehand { id, eraser: true, .. } => {
                let untargeted = matches!(
                    self.store.get(id),
                    Some(Stroke::Eraser(e)) if e.target_ids.is_empty()
                );
                if untargeted {
                    tracing::debug!("Discarding eraser {} without targets", id);
                    self.revert_edit();
                } else {
                    self.end_edit(true);
                }
            }
            Session::ShapeCreate { id, .. } => {
                let empty = matches!(
                    self.store.get(id),
                    Some(Stroke::Shape(s)) if s.w == 0.0 && s.h == 0.0
                );
                if empty {
                    self.revert_edit();
                } else {
                    self.end_edit(true);
                }
            }
        }
    }

    /// Abort the session in progress, restoring the committed state.
    pub fn cancel(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::PolygonEdit(draft) => {
                tracing::debug!("Discarded polygon draft with {} vertices", draft.len());
            }
            _ => self.revert_edit(),
        }
    }

    /// Close the polygon draft. Drafts with too few vertices are discarded.
    pub fn close_polygon(&mut self) -> Option<StrokeId> {
        if !matches!(self.session, Session::PolygonEdit(_)) {
            return None;
        }
        let Session::PolygonEdit(draft) = std::mem::take(&mut self.session) else {
            return None;
        };
        match draft.finish() {
            Some(vertices) => Some(self.commit_polygon(vertices, true)),
            None => {
                tracing::debug!("Discarded polygon draft with {} vertices", draft.len());
                None
            }
        }
    }

    // Selection

    /// Select a single stroke. Erasers cannot be selected.
    pub fn select(&mut self, id: StrokeId) -> bool {
        match self.store.get(id) {
            Some(s) if !s.is_eraser() => {
                self.selection.select_only(id);
                true
            }
            _ => false,
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.store);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // Commands

    /// Change the paint order of the selection.
    pub fn reorder(&mut self, op: ReorderOp) -> bool {
        let ids = self.selection.ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        self.edit(|doc| {
            let before: Vec<i64> = doc.store.iter().map(Stroke::z).collect();
            doc.store.reorder(op, &ids);
            doc.store.iter().map(Stroke::z).ne(before)
        })
    }

    /// Delete the selected strokes. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        if ids.is_empty() {
            return 0;
        }
        let mut removed = 0;
        self.edit(|doc| {
            removed = doc.store.remove(&ids).len();
            removed > 0
        });
        self.selection.clear();
        self.cache.retain(&self.store);
        removed
    }

    /// Remove every stroke.
    pub fn clear(&mut self) {
        if matches!(self.session, Session::PolygonEdit(_)) {
            self.session = Session::Idle;
        }
        self.edit(|doc| {
            let had = !doc.store.is_empty();
            doc.store.clear();
            had
        });
        self.selection.clear();
        self.cache.clear();
    }

    /// Flip the visibility flag. Returns the new value.
    pub fn toggle_visible(&mut self, id: StrokeId) -> Result<bool, DocumentError> {
        self.toggle_flag(id, |meta| {
            meta.visible = !meta.visible;
            meta.visible
        })
    }

    /// Flip the lock flag. Returns the new value.
    pub fn toggle_locked(&mut self, id: StrokeId) -> Result<bool, DocumentError> {
        self.toggle_flag(id, |meta| {
            meta.locked = !meta.locked;
            meta.locked
        })
    }

    fn toggle_flag<F>(&mut self, id: StrokeId, flip: F) -> Result<bool, DocumentError>
    where
        F: FnOnce(&mut crate::model::StrokeMeta) -> bool,
    {
        if !self.store.contains(id) {
            return Err(DocumentError::UnknownStroke { id: id.to_string() });
        }
        let mut now = false;
        self.edit(|doc| match doc.store.get_mut(id) {
            Some(s) => {
                now = flip(s.meta_mut());
                true
            }
            None => false,
        });
        Ok(now)
    }

    /// Apply `patch` to selected strokes of `kind` (all kinds when `None`).
    pub fn patch_selected<F>(&mut self, kind: Option<StrokeKind>, patch: F) -> usize
    where
        F: FnMut(&mut Stroke),
    {
        let selection = self.selection.clone();
        let mut changed = 0;
        self.edit(|doc| {
            changed = doc.store.patch_selected(kind, &selection, patch);
            changed > 0
        });
        changed
    }

    /// Rotate every selected, unlocked stroke by `delta` degrees.
    pub fn rotate_selected(&mut self, delta: f64) -> usize {
        self.patch_selected(None, |s| {
            if !s.is_locked() {
                *s = transform::rotate_by(s, delta);
            }
        })
    }

    /// Set the rotation of every selected, unlocked stroke.
    pub fn set_rotation_selected(&mut self, degrees: f64) -> usize {
        self.patch_selected(None, |s| {
            if !s.is_locked() {
                *s = transform::rotate_to(s, degrees);
            }
        })
    }

    /// Replace the string of a text stroke.
    pub fn set_text(&mut self, id: StrokeId, text: impl Into<String>) -> Result<(), DocumentError> {
        match self.store.get(id) {
            None => return Err(DocumentError::UnknownStroke { id: id.to_string() }),
            Some(s) if s.as_text().is_none() => {
                return Err(DocumentError::WrongKind {
                    id: id.to_string(),
                    expected: StrokeKind::Text.to_string(),
                })
            }
            Some(_) => {}
        }
        let text = text.into();
        self.edit(|doc| match doc.store.get_mut(id) {
            Some(Stroke::Text(t)) if t.text != text => {
                t.text = text;
                true
            }
            _ => false,
        });
        Ok(())
    }

    /// Import vector markup as an embedded stroke at `at`.
    pub fn import_svg(&mut self, markup: &str, at: Point) -> Result<StrokeId, ImportError> {
        let embedded = EmbeddedVector::from_markup(markup, at.x, at.y)?;
        let mut id = embedded.meta.id;
        self.edit(|doc| {
            id = doc.store.append(embedded.into());
            true
        });
        self.selection.select_only(id);
        Ok(id)
    }

    /// Drop the last freehand segment of the current or latest pen stroke.
    pub fn undo_last_pen_segment(&mut self) -> bool {
        let changed = self.edit(|doc| doc.store.undo_last_pen_segment());
        self.selection.retain_existing(&self.store);
        changed
    }

    pub fn undo(&mut self) -> bool {
        self.cancel();
        let Some(previous) = self.history.undo(self.store.snapshot()) else {
            return false;
        };
        self.store.restore(previous);
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel();
        let Some(next) = self.history.redo(self.store.snapshot()) else {
            return false;
        };
        self.store.restore(next);
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.selection.retain_existing(&self.store);
        self.cache.retain(&self.store);
        self.modified = true;
    }

    // Fonts

    /// Families used by text strokes that are neither resolved nor loading.
    pub fn missing_fonts(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .store
            .iter()
            .filter_map(Stroke::as_text)
            .map(|t| t.font_family.clone())
            .filter(|f| matches!(self.fonts.state(f), FontState::Missing))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Load every missing family from `source`. Returns how many resolved.
    pub async fn load_fonts(&mut self, source: &dyn FontSource) -> usize {
        let mut ready = 0;
        for family in self.missing_fonts() {
            if let FontState::Ready(_) = self.fonts.load(&family, source).await {
                ready += 1;
            }
        }
        ready
    }

    // Output

    fn effective_background(&self) -> Option<Rgba> {
        (!self.transparent_background).then_some(self.background)
    }

    /// View options carrying this document's background settings.
    pub fn raster_options(&self, width: u32, height: u32) -> RasterOptions {
        RasterOptions {
            erase_background: self.config.export.erase_background,
            ..RasterOptions::new(width, height).with_background(self.effective_background())
        }
    }

    /// Live view: strokes, then the selection and polygon draft overlays.
    pub fn render(&mut self, opts: &RasterOptions) -> Result<Pixmap, ExportError> {
        let mut pixmap = raster::render(self.store.iter(), &self.fonts, &mut self.cache, opts)?;
        raster::draw_selection(&mut pixmap, &self.store, &self.selection, &self.fonts, opts);
        if let Session::PolygonEdit(draft) = &self.session {
            raster::draw_polygon_preview(&mut pixmap, &draft.preview(), opts);
        }
        Ok(pixmap)
    }

    /// Raster of exactly the area an export covers, without overlays.
    pub fn rasterize(&mut self) -> Result<Pixmap, ExportError> {
        let bounds = union_bounds(self.store.iter(), &self.fonts, AA_MARGIN)
            .ok_or(ExportError::NothingToExport)?;
        let opts = RasterOptions {
            erase_background: self.config.export.erase_background,
            ..RasterOptions::covering(bounds).with_background(self.effective_background())
        };
        raster::render(self.store.iter(), &self.fonts, &mut self.cache, &opts)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            background: self.background,
            transparent_background: self.transparent_background,
            erase_background: self.config.export.erase_background,
        }
    }

    pub fn export_svg(&self) -> Result<ExportReport, ExportError> {
        svg_export::export_svg(self.store.iter(), &self.fonts, &self.export_options())
    }

    // Persistence

    /// Persistable state, including the configured sources of used fonts.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let mut snap = DocumentSnapshot::new(
            self.store.snapshot(),
            self.background.to_hex(),
            self.transparent_background,
        );
        for family in snap.referenced_families() {
            if let Some(url) = self.config.font_url(&family) {
                snap.embedded_fonts
                    .insert(family.clone(), EmbeddedFont::from_url(url));
            }
        }
        snap
    }

    /// Replace the whole document with `snapshot`. History is cleared.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) -> Result<(), DocumentError> {
        snapshot.validate()?;
        let background = Rgba::parse(&snapshot.bg).map_err(|e| DocumentError::Format {
            reason: e.to_string(),
        })?;
        for (family, font) in &snapshot.embedded_fonts {
            if self.config.font_url(family).is_none() {
                self.config.fonts.push(FontEntry {
                    family: family.clone(),
                    url: font.url.clone(),
                });
            }
        }
        self.store = StrokeStore::from_strokes(snapshot.strokes);
        self.background = background;
        self.transparent_background = snapshot.transparent_bg;
        self.selection.clear();
        self.history.clear();
        self.cache.clear();
        self.session = Session::Idle;
        self.pending = None;
        self.modified = false;
        tracing::info!("Restored document with {} stroke(s)", self.store.len());
        Ok(())
    }
}
