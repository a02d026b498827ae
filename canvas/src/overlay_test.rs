#![allow(clippy::float_cmp)]

use super::*;
use crate::input::InputState;

const PAGE: PageSize = PageSize { width: 612.0, height: 792.0 };

fn core() -> EngineCore {
    let mut core = EngineCore::new();
    core.open_document(2, PAGE);
    core.set_scale(1.0);
    core.grid.show_grid = false;
    core.grid.snap_enabled = false;
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rects(scene: &Scene, role: Role) -> Vec<(CanvasRect, bool, Emphasis)> {
    scene
        .with_role(role)
        .filter_map(|p| match p.shape {
            Shape::Rect { rect, dashed } => Some((rect, dashed, p.emphasis)),
            _ => None,
        })
        .collect()
}

fn texts(scene: &Scene, role: Role) -> Vec<String> {
    scene
        .with_role(role)
        .filter_map(|p| match &p.shape {
            Shape::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================
// Scene basics
// =============================================================

#[test]
fn no_document_means_empty_scene() {
    let scene = build_scene(&EngineCore::new());
    assert!(scene.primitives.is_empty());
    assert_eq!(scene.width, 0.0);
}

#[test]
fn scene_size_follows_scale() {
    let mut core = core();
    core.set_scale(2.0);
    let scene = build_scene(&core);
    assert_eq!((scene.width, scene.height), (1224.0, 1584.0));
}

// =============================================================
// Grid
// =============================================================

#[test]
fn grid_hidden_when_toggled_off() {
    let scene = build_scene(&core());
    assert_eq!(scene.with_role(Role::GridLine).count(), 0);
}

#[test]
fn grid_lines_and_labels_in_pdf_points() {
    let mut core = core();
    core.grid.show_grid = true;
    core.grid.set_size(100.0);
    let scene = build_scene(&core);
    // x: 0..=600 (7 lines), y: 0..=700 (8 lines)
    assert_eq!(scene.with_role(Role::GridLine).count(), 15);
    let labels = texts(&scene, Role::RulerLabel);
    assert_eq!(labels.len(), 15);
    assert_eq!(labels[0], "0");
    assert_eq!(labels[6], "600");
    assert_eq!(labels[14], "700");
}

#[test]
fn tiny_pitch_is_capped_per_axis() {
    let mut core = core();
    core.grid.show_grid = true;
    core.grid.size = 1e-6;
    let scene = build_scene(&core);
    assert_eq!(scene.with_role(Role::GridLine).count(), 2 * MAX_GRID_LINES);
}

#[test]
fn horizontal_grid_lines_count_from_page_bottom() {
    let mut core = core();
    core.grid.show_grid = true;
    core.grid.set_size(100.0);
    let scene = build_scene(&core);
    let ys: Vec<f64> = scene
        .with_role(Role::GridLine)
        .filter_map(|p| match p.shape {
            Shape::Line { from, to } if from.y == to.y => Some(from.y),
            _ => None,
        })
        .collect();
    assert_eq!(ys[0], 792.0);
    assert_eq!(ys[1], 692.0);
}

#[test]
fn fractional_grid_labels() {
    let mut core = core();
    core.grid.show_grid = true;
    core.grid.set_size(7.5);
    let labels = texts(&build_scene(&core), Role::RulerLabel);
    assert_eq!(labels[1], "7.5");
    assert_eq!(labels[2], "15");
}

// =============================================================
// Field markers
// =============================================================

#[test]
fn text_field_is_dashed_until_selected() {
    let mut core = core();
    core.create_field(FieldDefinition::text("name", 1, 100.0, 700.0, 200.0, 20.0));
    let scene = build_scene(&core);
    let boxes = rects(&scene, Role::TextBox);
    assert_eq!(boxes.len(), 1);
    let (rect, dashed, emphasis) = boxes[0];
    assert_eq!(rect, CanvasRect { left: 100.0, top: 72.0, right: 300.0, bottom: 92.0 });
    assert!(dashed);
    assert_eq!(emphasis, Emphasis::Normal);
    assert_eq!(scene.with_role(Role::Crosshair).count(), 2);
    assert_eq!(texts(&scene, Role::FieldLabel), vec!["name".to_owned()]);
    assert_eq!(scene.with_role(Role::ResizeHandle).count(), 0);

    let id = core.fields()[0].id;
    core.select(Some(id));
    let scene = build_scene(&core);
    let (_, dashed, emphasis) = rects(&scene, Role::TextBox)[0];
    assert!(!dashed);
    assert_eq!(emphasis, Emphasis::Selected);
    let handle = rects(&scene, Role::ResizeHandle)[0].0;
    assert_eq!(handle, CanvasRect { left: 296.0, top: 68.0, right: 304.0, bottom: 76.0 });
}

#[test]
fn point_text_field_has_crosshair_only() {
    let mut core = core();
    let mut f = FieldDefinition::text("p", 1, 10.0, 10.0, 1.0, 1.0);
    f.width = None;
    f.height = None;
    let id = core.store.create(f);
    core.select(Some(id));
    let scene = build_scene(&core);
    assert_eq!(scene.with_role(Role::TextBox).count(), 0);
    assert_eq!(scene.with_role(Role::ResizeHandle).count(), 0);
    let arms: Vec<_> = scene.with_role(Role::Crosshair).collect();
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].shape, Shape::Line { from: pt(10.0, 774.0), to: pt(10.0, 790.0) });
}

#[test]
fn checkbox_is_font_size_square() {
    let mut core = core();
    core.create_field(FieldDefinition::checkbox("agree", 1, 50.0, 100.0, 12.0));
    let scene = build_scene(&core);
    let (rect, dashed, _) = rects(&scene, Role::CheckboxBox)[0];
    assert_eq!(rect, CanvasRect { left: 50.0, top: 680.0, right: 62.0, bottom: 692.0 });
    assert!(!dashed);
    assert_eq!(scene.with_role(Role::Crosshair).count(), 0);
}

#[test]
fn only_current_page_fields_are_drawn() {
    let mut core = core();
    core.create_field(FieldDefinition::text("one", 1, 0.0, 0.0, 10.0, 10.0));
    core.create_field(FieldDefinition::text("two", 2, 0.0, 0.0, 10.0, 10.0));
    assert_eq!(texts(&build_scene(&core), Role::FieldLabel), vec!["one".to_owned()]);
    core.set_page(2);
    assert_eq!(texts(&build_scene(&core), Role::FieldLabel), vec!["two".to_owned()]);
}

#[test]
fn hovered_field_is_emphasized() {
    let mut core = core();
    core.create_field(FieldDefinition::text("h", 1, 100.0, 700.0, 200.0, 20.0));
    core.ui.hovered_id = Some(core.fields()[0].id);
    let scene = build_scene(&core);
    assert_eq!(rects(&scene, Role::TextBox)[0].2, Emphasis::Hovered);
}

// =============================================================
// Rubber band
// =============================================================

#[test]
fn rubber_band_shows_pdf_size_and_anchor() {
    let mut core = core();
    core.input = InputState::Selecting { start: pt(100.0, 100.0), end: pt(300.0, 160.0) };
    let scene = build_scene(&core);
    let band = rects(&scene, Role::RubberBand)[0];
    assert_eq!(band.0, CanvasRect { left: 100.0, top: 100.0, right: 300.0, bottom: 160.0 });
    assert!(band.1);
    assert_eq!(texts(&scene, Role::RubberBandLabel), vec!["200 × 60 pt".to_owned()]);
    let anchor = scene.with_role(Role::RubberBandAnchor).next().unwrap();
    assert_eq!(anchor.shape, Shape::Dot { center: pt(100.0, 160.0), radius: 5.0 });
}

#[test]
fn rubber_band_previews_snapped_rect() {
    let mut core = core();
    core.grid.snap_enabled = true;
    core.grid.set_size(10.0);
    core.input = InputState::Selecting { start: pt(103.0, 96.0), end: pt(296.0, 163.0) };
    let scene = build_scene(&core);
    // anchor (103, 629) -> (100, 630); size 193 x 67 -> 190 x 70
    assert_eq!(texts(&scene, Role::RubberBandLabel), vec!["190 × 70 pt".to_owned()]);
    let band = rects(&scene, Role::RubberBand)[0].0;
    assert_eq!((band.left, band.bottom), (100.0, 162.0));
}

#[test]
fn no_rubber_band_while_idle() {
    assert_eq!(build_scene(&core()).with_role(Role::RubberBand).count(), 0);
}
