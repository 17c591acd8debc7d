use tempfile::TempDir;
use vellum_core::DocumentError;
use vellum_designer::{
    Document, DocumentSnapshot, FontSourceKind, Modifiers, Point, Stroke, TextStroke, Tool,
};
use vellum_settings::{Config, FontEntry};

fn sketch() -> Document {
    let mut doc = Document::new();
    doc.set_tool(Tool::Pen);
    doc.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
    doc.pointer_move(Point::new(10.0, 5.0), Modifiers::NONE);
    doc.pointer_up();
    doc.pointer_down(Point::new(20.0, 0.0), Modifiers::NONE);
    doc.pointer_move(Point::new(30.0, 5.0), Modifiers::NONE);
    doc.pointer_up();
    doc.set_tool(Tool::Shape);
    doc.pointer_down(Point::new(40.0, 40.0), Modifiers::NONE);
    doc.pointer_move(Point::new(90.0, 70.0), Modifiers::NONE);
    doc.pointer_up();
    doc
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sketch.json");
    let doc = sketch();

    doc.snapshot().save_to_file(&path).unwrap();
    let loaded = DocumentSnapshot::load_from_file(&path).unwrap();
    assert_eq!(loaded.strokes, doc.store().snapshot());
    assert!(loaded.transparent_bg);

    let restored = Document::from_snapshot(Config::default(), loaded).unwrap();
    assert_eq!(restored.store().len(), 2);
    assert!(!restored.can_undo());
    assert!(!restored.is_modified());
    match restored.store().iter().find(|s| matches!(s, Stroke::Pen(_))) {
        Some(Stroke::Pen(pen)) => assert_eq!(pen.sub_path_count(), 2),
        other => panic!("expected pen, got {:?}", other),
    };
}

#[test]
fn test_unsupported_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    let mut snap = sketch().snapshot();
    snap.version = 7;
    std::fs::write(&path, serde_json::to_string(&snap).unwrap()).unwrap();

    let err = DocumentSnapshot::load_from_file(&path).unwrap_err();
    assert_eq!(
        err.root_cause().downcast_ref::<DocumentError>(),
        Some(&DocumentError::UnsupportedVersion { version: 7 })
    );
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(DocumentSnapshot::load_from_file(dir.path().join("absent.json")).is_err());
}

#[test]
fn test_bad_background_is_rejected() {
    let snap = DocumentSnapshot::new(Vec::new(), "not-a-color", false);
    assert!(matches!(
        Document::from_snapshot(Config::default(), snap),
        Err(DocumentError::Format { .. })
    ));
}

#[test]
fn test_font_sources_travel_with_the_document() {
    let url = "data:font/ttf;base64,AAAA";
    let mut config = Config::default();
    config.fonts.push(FontEntry {
        family: "Box".to_string(),
        url: url.to_string(),
    });
    let mut doc = Document::with_config(config);
    doc.config_mut().text.font_family = "Box".to_string();
    doc.set_tool(Tool::Text);
    doc.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);

    let snap = doc.snapshot();
    assert_eq!(snap.embedded_fonts["Box"].kind, FontSourceKind::Data);

    let restored = Document::from_snapshot(Config::default(), snap).unwrap();
    assert_eq!(restored.config().font_url("Box"), Some(url));
    assert_eq!(restored.missing_fonts(), vec!["Box".to_string()]);
}

#[test]
fn test_background_survives_restore() {
    let mut doc = Document::new();
    doc.set_background(vellum_core::Rgba::parse("#336699").unwrap(), false);
    let json = doc.snapshot().to_json().unwrap();
    assert!(json.contains("\"bg\": \"#336699\""));

    let snap = DocumentSnapshot::from_json(&json).unwrap();
    let restored = Document::from_snapshot(Config::default(), snap).unwrap();
    assert_eq!(restored.background().to_hex(), "#336699");
    assert!(!restored.is_transparent());
}

#[test]
fn test_text_strokes_keep_their_fields() {
    let mut text = TextStroke::new("hello\nworld", "Lora", 5.0, 50.0).with_size(32.0);
    text.letter_spacing = 1.5;
    let snap = DocumentSnapshot::new(vec![text.clone().into()], "#ffffff", true);
    let back = DocumentSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
    assert_eq!(back.strokes, vec![Stroke::from(text)]);
}
