use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use vellum_core::{ExportError, FontError};
use vellum_designer::fonts::testing::BoxFace;
use vellum_designer::{
    Document, FontRegistry, FontSource, FontState, GlyphOutlines, MemoryFontSource, Modifiers,
    Point, Tool,
};

/// Serves [`BoxFace`] for every family and counts the requests.
#[derive(Default)]
struct CountingSource {
    calls: Cell<usize>,
    fail: bool,
}

#[async_trait(?Send)]
impl FontSource for CountingSource {
    async fn load(&self, family: &str) -> Result<Rc<dyn GlyphOutlines>, FontError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(FontError::NotFound {
                family: family.to_string(),
            });
        }
        Ok(Rc::new(BoxFace))
    }
}

#[tokio::test]
async fn test_resolved_family_is_loaded_once() {
    let source = CountingSource::default();
    let mut registry = FontRegistry::new();

    assert!(matches!(
        registry.load("Box", &source).await,
        FontState::Ready(_)
    ));
    assert!(matches!(
        registry.load("Box", &source).await,
        FontState::Ready(_)
    ));
    assert_eq!(source.calls.get(), 1);
    assert_eq!(registry.resolved_families(), vec!["Box".to_string()]);
}

#[tokio::test]
async fn test_in_flight_load_is_not_repeated() {
    let source = CountingSource::default();
    let mut registry = FontRegistry::new();
    assert!(registry.begin_load("Box"));

    assert!(matches!(
        registry.load("Box", &source).await,
        FontState::Pending
    ));
    assert_eq!(source.calls.get(), 0);
    assert!(registry.try_get("Box").is_none());
}

#[tokio::test]
async fn test_failed_load_clears_pending_and_reports() {
    let source = CountingSource {
        fail: true,
        ..Default::default()
    };
    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = notified.clone();
    let mut registry = FontRegistry::new();
    registry.set_on_ready(Box::new(move |family| sink.borrow_mut().push(family.to_string())));

    assert!(matches!(
        registry.load("Nope", &source).await,
        FontState::Missing
    ));
    assert!(!registry.is_pending("Nope"));
    assert!(registry.status().unwrap().contains("Nope"));
    assert_eq!(*notified.borrow(), vec!["Nope".to_string()]);

    // a later attempt is allowed
    registry.load("Nope", &source).await;
    assert_eq!(source.calls.get(), 2);
}

#[tokio::test]
async fn test_memory_source_reports_unknown_and_bad_fonts() {
    let mut source = MemoryFontSource::new();
    source.insert("Garbage", vec![0, 1, 2, 3]);

    assert!(matches!(
        source.load("Absent").await,
        Err(FontError::NotFound { .. })
    ));
    assert!(source.load("Garbage").await.is_err());
}

#[tokio::test]
async fn test_document_loads_missing_fonts_then_exports_text() {
    let mut doc = Document::new();
    doc.config_mut().text.font_family = "Box".to_string();
    doc.set_tool(Tool::Text);
    doc.pointer_down(Point::new(0.0, 100.0), Modifiers::NONE);

    assert_eq!(doc.missing_fonts(), vec!["Box".to_string()]);
    assert!(matches!(
        doc.export_svg(),
        Err(ExportError::NothingToExport)
    ));

    let source = CountingSource::default();
    assert_eq!(doc.load_fonts(&source).await, 1);
    assert!(doc.missing_fonts().is_empty());
    assert_eq!(doc.load_fonts(&source).await, 0);

    let report = doc.export_svg().unwrap();
    assert!(report.skipped_text.is_empty());
    // "Text": one path per inked glyph
    assert_eq!(report.svg.matches("<path").count(), 4);
}
