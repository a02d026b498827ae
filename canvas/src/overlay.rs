//! Overlay display list.
//!
//! [`build_scene`] turns engine state into primitives in canvas pixels for
//! whatever draws on top of the rasterized page. Nothing here mutates state,
//! and nothing here knows about colors or fonts: primitives carry an
//! [`Emphasis`] and a [`Role`] and the host styles them.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::camera::{Camera, PageSize, PdfRect, Point};
use crate::consts::{HANDLE_SIZE_PX, MAX_GRID_LINES};
use crate::doc::{FieldDefinition, FieldKind};
use crate::engine::EngineCore;
use crate::hit::{self, CanvasRect};

/// Half-length of the anchor crosshair arms, by emphasis.
const CROSSHAIR_PX: [f64; 3] = [6.0, 7.0, 8.0];
/// Radius of the rubber band's anchor dot.
const ANCHOR_DOT_RADIUS_PX: f64 = 5.0;
/// Offset of a field's name label from its anchor.
const LABEL_OFFSET_PX: (f64, f64) = (7.0, -4.0);
/// Offset of the rubber band's size label from its top-left corner.
const SIZE_LABEL_OFFSET_PX: (f64, f64) = (5.0, 15.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Emphasis {
    Normal,
    Hovered,
    Selected,
}

impl Emphasis {
    fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Hovered => 1,
            Self::Selected => 2,
        }
    }
}

/// What a primitive depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    GridLine,
    RulerLabel,
    CheckboxBox,
    TextBox,
    Crosshair,
    FieldLabel,
    ResizeHandle,
    RubberBand,
    RubberBandAnchor,
    RubberBandLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { from: Point, to: Point },
    Rect { rect: CanvasRect, dashed: bool },
    Dot { center: Point, radius: f64 },
    Text { at: Point, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub role: Role,
    pub emphasis: Emphasis,
    pub shape: Shape,
}

impl Primitive {
    fn new(role: Role, emphasis: Emphasis, shape: Shape) -> Self {
        Self { role, emphasis, shape }
    }
}

/// Everything to draw over one page, bottom layer first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Canvas size in pixels.
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.role == role)
    }
}

/// Build the overlay for the current page. Empty when no document is open.
#[must_use]
pub fn build_scene(core: &EngineCore) -> Scene {
    if !core.has_document() {
        return Scene::default();
    }
    let camera = core.camera();
    let page = core.page_size;
    let mut scene = Scene {
        width: camera.pdf_dist_to_canvas(page.width),
        height: camera.pdf_dist_to_canvas(page.height),
        primitives: Vec::new(),
    };

    if core.grid.show_grid {
        push_grid(&mut scene, &camera, page, core.grid.size);
    }
    for field in core.fields_on_page(core.current_page) {
        let emphasis = if core.selection() == Some(field.id) {
            Emphasis::Selected
        } else if core.hovered() == Some(field.id) {
            Emphasis::Hovered
        } else {
            Emphasis::Normal
        };
        push_field(&mut scene, &camera, field, emphasis);
    }
    if let Some(rect) = core.selection_preview() {
        push_rubber_band(&mut scene, &camera, rect);
    }
    scene
}

fn push_grid(scene: &mut Scene, camera: &Camera, page: PageSize, size: f64) {
    if !(size.is_finite() && size > 0.0) {
        return;
    }
    let (w, h) = (scene.width, scene.height);
    let mut labels = Vec::new();

    for pdf_x in grid_steps(page.width, size) {
        let x = camera.pdf_dist_to_canvas(pdf_x);
        let line = Shape::Line { from: Point::new(x, 0.0), to: Point::new(x, h) };
        scene.primitives.push(Primitive::new(Role::GridLine, Emphasis::Normal, line));
        labels.push(Shape::Text { at: Point::new(x + 1.0, 9.0), text: format!("{pdf_x}") });
    }
    for pdf_y in grid_steps(page.height, size) {
        let y = camera.pdf_to_canvas(Point::new(0.0, pdf_y)).y;
        let line = Shape::Line { from: Point::new(0.0, y), to: Point::new(w, y) };
        scene.primitives.push(Primitive::new(Role::GridLine, Emphasis::Normal, line));
        labels.push(Shape::Text { at: Point::new(1.0, y - 1.0), text: format!("{pdf_y}") });
    }

    scene
        .primitives
        .extend(labels.into_iter().map(|l| Primitive::new(Role::RulerLabel, Emphasis::Normal, l)));
}

/// Multiples of `step` from 0 up to and including `limit`, at most
/// `MAX_GRID_LINES` of them.
fn grid_steps(limit: f64, step: f64) -> impl Iterator<Item = f64> {
    (0_u16..)
        .take(MAX_GRID_LINES)
        .map(move |i| f64::from(i) * step)
        .take_while(move |v| *v <= limit)
}

fn push_field(scene: &mut Scene, camera: &Camera, field: &FieldDefinition, emphasis: Emphasis) {
    let anchor = camera.pdf_to_canvas(Point::new(field.x, field.y));
    let out = &mut scene.primitives;

    match (field.kind, hit::field_bounds(field, camera)) {
        (FieldKind::Checkbox, Some(rect)) => {
            out.push(Primitive::new(Role::CheckboxBox, emphasis, Shape::Rect { rect, dashed: false }));
        }
        (FieldKind::Text, bounds) => {
            if let Some(rect) = bounds {
                let dashed = emphasis != Emphasis::Selected;
                out.push(Primitive::new(Role::TextBox, emphasis, Shape::Rect { rect, dashed }));
            }
            let arm = CROSSHAIR_PX[emphasis.index()];
            out.push(Primitive::new(
                Role::Crosshair,
                emphasis,
                Shape::Line { from: Point::new(anchor.x, anchor.y - arm), to: Point::new(anchor.x, anchor.y + arm) },
            ));
            out.push(Primitive::new(
                Role::Crosshair,
                emphasis,
                Shape::Line { from: Point::new(anchor.x - arm, anchor.y), to: Point::new(anchor.x + arm, anchor.y) },
            ));
        }
        (FieldKind::Checkbox, None) => {}
    }

    if emphasis == Emphasis::Selected {
        if let Some(center) = hit::resize_handle_center(field, camera) {
            let half = HANDLE_SIZE_PX / 2.0;
            let rect = CanvasRect {
                left: center.x - half,
                top: center.y - half,
                right: center.x + half,
                bottom: center.y + half,
            };
            out.push(Primitive::new(Role::ResizeHandle, emphasis, Shape::Rect { rect, dashed: false }));
        }
    }

    let at = Point::new(anchor.x + LABEL_OFFSET_PX.0, anchor.y + LABEL_OFFSET_PX.1);
    out.push(Primitive::new(Role::FieldLabel, emphasis, Shape::Text { at, text: field.name.clone() }));
}

fn push_rubber_band(scene: &mut Scene, camera: &Camera, rect: PdfRect) {
    let bottom_left = camera.pdf_to_canvas(Point::new(rect.x, rect.y));
    let bounds = CanvasRect {
        left: bottom_left.x,
        top: bottom_left.y - camera.pdf_dist_to_canvas(rect.height),
        right: bottom_left.x + camera.pdf_dist_to_canvas(rect.width),
        bottom: bottom_left.y,
    };
    let label = format!("{} × {} pt", rect.width, rect.height);
    let label_at = Point::new(bounds.left + SIZE_LABEL_OFFSET_PX.0, bounds.top + SIZE_LABEL_OFFSET_PX.1);

    let out = &mut scene.primitives;
    out.push(Primitive::new(Role::RubberBand, Emphasis::Normal, Shape::Rect { rect: bounds, dashed: true }));
    out.push(Primitive::new(
        Role::RubberBandAnchor,
        Emphasis::Normal,
        Shape::Dot { center: bottom_left, radius: ANCHOR_DOT_RADIUS_PX },
    ));
    out.push(Primitive::new(Role::RubberBandLabel, Emphasis::Normal, Shape::Text { at: label_at, text: label }));
}
