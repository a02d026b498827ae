//! Hit-testing of canvas points against fields and resize handles.
//!
//! Geometry is computed in canvas pixels so that thresholds stay constant on
//! screen regardless of zoom. Candidates are tested in store order and the
//! first match wins; there is no separate z-order.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{DEFAULT_CHECKBOX_SIZE_PT, HANDLE_THRESHOLD_PX, POINT_HIT_RADIUS_PX};
use crate::doc::{FieldDefinition, FieldId, FieldKind, FieldStore};

/// Which part of a field was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The field's body (rectangle, checkbox square, or point radius).
    Body,
    /// The bottom-right resize handle of a sized text field.
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub field_id: FieldId,
    pub part: HitPart,
}

/// Axis-aligned rectangle in canvas pixels (`top < bottom`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CanvasRect {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Side length of a checkbox in PDF points: its font size, or the default when unset.
#[must_use]
pub fn checkbox_side(field: &FieldDefinition) -> f64 {
    field
        .font_size
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_CHECKBOX_SIZE_PT)
}

/// Canvas-space bounds of a field, or `None` for an unsized point-only field.
///
/// The anchor is the bottom-left corner, so the rectangle extends right and up
/// on screen.
#[must_use]
pub fn field_bounds(field: &FieldDefinition, camera: &Camera) -> Option<CanvasRect> {
    let anchor = camera.pdf_to_canvas(Point::new(field.x, field.y));
    let (w, h) = match field.kind {
        FieldKind::Checkbox => {
            let side = checkbox_side(field);
            (side, side)
        }
        FieldKind::Text => field.size()?,
    };
    Some(CanvasRect {
        left: anchor.x,
        top: anchor.y - h * camera.scale,
        right: anchor.x + w * camera.scale,
        bottom: anchor.y,
    })
}

/// Whether `canvas_pt` lies on `field`.
#[must_use]
pub fn field_contains(field: &FieldDefinition, canvas_pt: Point, camera: &Camera) -> bool {
    if let Some(bounds) = field_bounds(field, camera) {
        return bounds.contains(canvas_pt);
    }
    let anchor = camera.pdf_to_canvas(Point::new(field.x, field.y));
    let dx = canvas_pt.x - anchor.x;
    let dy = canvas_pt.y - anchor.y;
    dx.hypot(dy) < POINT_HIT_RADIUS_PX
}

/// First field (in iteration order) under `canvas_pt`.
///
/// `fields` should already be restricted to the active page.
pub fn find_field_at_position<'a, I>(canvas_pt: Point, fields: I, camera: &Camera) -> Option<&'a FieldDefinition>
where
    I: IntoIterator<Item = &'a FieldDefinition>,
{
    fields
        .into_iter()
        .find(|field| field_contains(field, canvas_pt, camera))
}

/// Canvas position of the resize handle: the field's far corner
/// (`anchor + (width, -height)` on screen). `None` unless the field is a sized text field.
#[must_use]
pub fn resize_handle_center(field: &FieldDefinition, camera: &Camera) -> Option<Point> {
    if field.kind != FieldKind::Text {
        return None;
    }
    let (w, h) = field.size()?;
    let anchor = camera.pdf_to_canvas(Point::new(field.x, field.y));
    Some(Point::new(anchor.x + w * camera.scale, anchor.y - h * camera.scale))
}

/// Whether `canvas_pt` is on the resize handle of `field`.
#[must_use]
pub fn is_on_resize_handle(canvas_pt: Point, field: &FieldDefinition, camera: &Camera) -> bool {
    let Some(handle) = resize_handle_center(field, camera) else {
        return false;
    };
    (canvas_pt.x - handle.x).abs() < HANDLE_THRESHOLD_PX && (canvas_pt.y - handle.y).abs() < HANDLE_THRESHOLD_PX
}

/// Test what is under `canvas_pt` on `page`, checking the selected field's handle first.
#[must_use]
pub fn hit_test(
    canvas_pt: Point,
    store: &FieldStore,
    page: u32,
    camera: &Camera,
    selected_id: Option<FieldId>,
) -> Option<Hit> {
    if let Some(selected) = selected_id.and_then(|id| store.get(&id)) {
        if selected.page == page && is_on_resize_handle(canvas_pt, selected, camera) {
            return Some(Hit { field_id: selected.id, part: HitPart::ResizeHandle });
        }
    }
    find_field_at_position(canvas_pt, store.on_page(page), camera)
        .map(|field| Hit { field_id: field.id, part: HitPart::Body })
}
