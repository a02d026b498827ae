#![allow(clippy::float_cmp)]

use canvas::doc::FieldDefinition;
use lopdf::Document;

use super::*;
use crate::pdf::tests::sample_pdf;

const MAP: &str = r#"{"fields":[
    {"name":"full_name","type":"text","page":1,"x":101,"y":702,"width":198,"height":21},
    {"name":"agree","type":"checkbox","page":1,"x":15,"y":30}
]}"#;

/// Scratch directory unique to this test and process.
fn scratch(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("formmap-{test}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn fixture(test: &str) -> (PathBuf, PathBuf, PathBuf) {
    let dir = scratch(test);
    let pdf_path = dir.join("form.pdf");
    let map_path = dir.join("map.json");
    std::fs::write(&pdf_path, sample_pdf(&[(612, 792)], false)).unwrap();
    std::fs::write(&map_path, MAP).unwrap();
    (dir, pdf_path, map_path)
}

// =============================================================
// inspect / validate
// =============================================================

#[test]
fn inspect_reads_pages() {
    let (_dir, pdf_path, _) = fixture("inspect");
    inspect(&pdf_path).unwrap();
}

#[test]
fn inspect_missing_file_is_io_error() {
    let err = inspect(Path::new("/nonexistent/formmap.pdf")).unwrap_err();
    assert_eq!(err.error_code(), "E_IO");
}

#[test]
fn validate_accepts_clean_map() {
    let (_dir, _, map_path) = fixture("validate-ok");
    validate_map(&map_path).unwrap();
}

#[test]
fn validate_counts_errors() {
    let dir = scratch("validate-bad");
    let map_path = dir.join("bad.json");
    let map = r#"{"fields":[
        {"name":"dup","type":"text","page":1,"x":1,"y":1},
        {"name":"dup","type":"text","page":1,"x":2,"y":2},
        {"name":"  ","type":"checkbox","page":1,"x":3,"y":3}
    ]}"#;
    std::fs::write(&map_path, map).unwrap();
    let err = validate_map(&map_path).unwrap_err();
    assert!(matches!(err, AppError::Invalid(n) if n >= 2));
}

#[test]
fn validate_rejects_malformed_map() {
    let dir = scratch("validate-malformed");
    let map_path = dir.join("broken.json");
    std::fs::write(&map_path, r#"{"nope":[]}"#).unwrap();
    let err = validate_map(&map_path).unwrap_err();
    assert!(matches!(err, AppError::Import(_)));
}

// =============================================================
// generate
// =============================================================

#[test]
fn generate_writes_fillable_pdf() {
    let (dir, pdf_path, map_path) = fixture("generate");
    let out = dir.join("filled.pdf");
    generate(&pdf_path, &map_path, &out).unwrap();

    let doc = Document::load_mem(&std::fs::read(&out).unwrap()).unwrap();
    assert!(doc.catalog().unwrap().get(b"AcroForm").is_ok());
}

#[test]
fn generate_refuses_invalid_map() {
    let (dir, pdf_path, _) = fixture("generate-invalid");
    let map_path = dir.join("dups.json");
    std::fs::write(&map_path, r#"{"fields":[{"name":"a","page":1},{"name":"a","page":1}]}"#).unwrap();
    let out = dir.join("never.pdf");
    let err = generate(&pdf_path, &map_path, &out).unwrap_err();
    assert!(matches!(err, AppError::Generate(_)));
    assert!(!out.exists());
}

// =============================================================
// snap
// =============================================================

#[test]
fn snap_fields_quantizes_anchor_and_size() {
    let mut engine = EngineCore::new();
    engine.create_field(FieldDefinition::text("a", 1, 101.0, 702.0, 198.0, 21.0));
    engine.create_field(FieldDefinition::checkbox("b", 1, 15.0, 30.0, 10.0));

    assert_eq!(snap_fields(&mut engine, 7.5), 1);
    let a = &engine.fields()[0];
    assert_eq!((a.x, a.y), (97.5, 705.0));
    assert_eq!(a.size(), Some((195.0, 22.5)));
    let b = &engine.fields()[1];
    assert_eq!((b.x, b.y), (15.0, 30.0));
}

#[test]
fn snap_fields_keeps_minimum_size() {
    let mut engine = EngineCore::new();
    engine.create_field(FieldDefinition::text("tiny", 1, 0.0, 0.0, 12.0, 12.0));
    snap_fields(&mut engine, 50.0);
    assert_eq!(engine.fields()[0].size(), Some((10.0, 10.0)));
}

#[test]
fn snap_writes_default_export_name() {
    let (dir, pdf_path, map_path) = fixture("snap");
    snap(&pdf_path, &map_path, 7.5, None).unwrap();

    let written = std::fs::read_to_string(dir.join("form.json")).unwrap();
    let fields = codec::import_json(&written).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!((fields[0].x, fields[0].y), (97.5, 705.0));
}

// =============================================================
// detect
// =============================================================

#[test]
fn page_images_are_numbered_from_one() {
    assert_eq!(page_image_path(Path::new("/tmp/pages"), 3), PathBuf::from("/tmp/pages/page-3.png"));
}

#[tokio::test]
async fn detect_requires_service_url() {
    let (dir, pdf_path, _) = fixture("detect-disabled");
    let err = detect(&AppConfig::default(), &pdf_path, &dir, None).await.unwrap_err();
    assert!(matches!(err, AppError::DetectionDisabled));
    assert_eq!(err.error_code(), "E_DETECT_DISABLED");
}
