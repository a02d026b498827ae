//! Document model: field definitions and the in-memory field store.
//!
//! This module defines what is placed on the PDF (`FieldDefinition`,
//! `FieldKind`), a sparse-update type for incremental edits (`FieldPatch`),
//! and the runtime store that owns all live fields (`FieldStore`).
//!
//! The store keeps insertion order: it is the display order, the export order
//! and the hit-test priority. Every mutation is keyed by `FieldId` and is a
//! silent no-op when the id is stale.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{MIN_FIELD_SIZE_PT, TYPE_SWITCH_TEXT_HEIGHT_PT, TYPE_SWITCH_TEXT_WIDTH_PT};

/// Unique identifier for a field. Generated on creation, never reused.
pub type FieldId = Uuid;

/// The kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Rectangular text input sized by `width` × `height`.
    #[default]
    Text,
    /// Square checkbox whose side is `font_size`.
    Checkbox,
}

/// Horizontal text alignment for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// One form field placed on a page.
///
/// `x`/`y` is the bottom-left anchor in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique identifier for this field.
    pub id: FieldId,
    /// Export name. Uniqueness is only checked before form generation.
    pub name: String,
    /// Text or checkbox.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// 1-based page number.
    pub page: u32,
    /// Left edge in PDF points.
    pub x: f64,
    /// Bottom edge in PDF points.
    pub y: f64,
    /// Width in PDF points. Text fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in PDF points. Text fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Font size; doubles as the side length of a checkbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Horizontal alignment for text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    /// Vertical alignment (display only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,
}

impl FieldDefinition {
    /// A text field with the given anchor and size and a fresh id.
    #[must_use]
    pub fn text(name: impl Into<String>, page: u32, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: FieldKind::Text,
            page,
            x,
            y,
            width: Some(width),
            height: Some(height),
            font_size: None,
            align: None,
            valign: None,
        }
    }

    /// A checkbox anchored at `(x, y)` with a fresh id.
    #[must_use]
    pub fn checkbox(name: impl Into<String>, page: u32, x: f64, y: f64, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: FieldKind::Checkbox,
            page,
            x,
            y,
            width: None,
            height: None,
            font_size: Some(size),
            align: None,
            valign: None,
        }
    }

    /// Builder: set the font size.
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Both `width` and `height` as a pair, when the field is sized.
    #[must_use]
    pub fn size(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }

    /// Whether this is a text field with a usable rectangle.
    #[must_use]
    pub fn is_sized_text(&self) -> bool {
        self.kind == FieldKind::Text && self.size().is_some()
    }

    /// Switch the field kind, resetting geometry that only makes sense for the old kind.
    ///
    /// Returns `false` when the kind is unchanged.
    pub fn set_kind(&mut self, kind: FieldKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        match kind {
            FieldKind::Text => {
                self.width = Some(TYPE_SWITCH_TEXT_WIDTH_PT);
                self.height = Some(TYPE_SWITCH_TEXT_HEIGHT_PT);
            }
            FieldKind::Checkbox => {
                self.width = None;
                self.height = None;
            }
        }
        true
    }
}

/// Sparse update for a field. Only present values are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New kind. A change resets width/height, see [`FieldDefinition::set_kind`].
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,
}

impl FieldPatch {
    /// Patch that moves the anchor.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch that changes the rectangle size.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    /// Whether the patch carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Clamp a width or height to the minimum field size.
#[must_use]
pub fn clamp_dimension(value: f64) -> f64 {
    value.max(MIN_FIELD_SIZE_PT)
}

/// Ordered in-memory store of field definitions.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    fields: Vec<FieldDefinition>,
}

impl FieldStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field under a freshly generated id and return that id.
    ///
    /// Whatever id `def` carried is discarded.
    pub fn create(&mut self, mut def: FieldDefinition) -> FieldId {
        let id = self.fresh_id();
        def.id = id;
        self.fields.push(def);
        id
    }

    /// Merge `patch` into an existing field. Returns `false` if the id is unknown.
    pub fn update(&mut self, id: &FieldId, patch: &FieldPatch) -> bool {
        let Some(field) = self.get_mut(id) else {
            return false;
        };
        if let Some(kind) = patch.kind {
            field.set_kind(kind);
        }
        if let Some(name) = &patch.name {
            field.name.clone_from(name);
        }
        if let Some(page) = patch.page {
            field.page = page;
        }
        if let Some(x) = patch.x {
            field.x = x;
        }
        if let Some(y) = patch.y {
            field.y = y;
        }
        if let Some(w) = patch.width {
            field.width = Some(w);
        }
        if let Some(h) = patch.height {
            field.height = Some(h);
        }
        if let Some(size) = patch.font_size {
            field.font_size = Some(size);
        }
        if let Some(align) = patch.align {
            field.align = Some(align);
        }
        if let Some(valign) = patch.valign {
            field.valign = Some(valign);
        }
        true
    }

    /// Remove a field by id, returning it if it was present.
    pub fn delete(&mut self, id: &FieldId) -> Option<FieldDefinition> {
        let index = self.fields.iter().position(|f| f.id == *id)?;
        Some(self.fields.remove(index))
    }

    /// Move a field's anchor. Returns `false` if the id is unknown.
    pub fn reposition(&mut self, id: &FieldId, x: f64, y: f64) -> bool {
        let Some(field) = self.get_mut(id) else {
            return false;
        };
        field.x = x;
        field.y = y;
        true
    }

    /// Set a field's size, clamping each axis to the minimum field size.
    /// Returns `false` if the id is unknown.
    pub fn resize(&mut self, id: &FieldId, width: f64, height: f64) -> bool {
        let Some(field) = self.get_mut(id) else {
            return false;
        };
        field.width = Some(clamp_dimension(width));
        field.height = Some(clamp_dimension(height));
        true
    }

    /// Return a reference to a field by id.
    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == *id)
    }

    fn get_mut(&mut self, id: &FieldId) -> Option<&mut FieldDefinition> {
        self.fields.iter_mut().find(|f| f.id == *id)
    }

    /// Whether a field with this id exists.
    #[must_use]
    pub fn contains(&self, id: &FieldId) -> bool {
        self.get(id).is_some()
    }

    /// All fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Fields on the given 1-based page, in insertion order.
    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(move |f| f.page == page)
    }

    /// Replace all fields. Ids are taken as given.
    pub fn replace_all(&mut self, fields: Vec<FieldDefinition>) {
        self.fields = fields;
    }

    /// Remove every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Number of fields currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the store contains no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Default name for the next created field: `field_{len + 1}`.
    #[must_use]
    pub fn next_default_name(&self) -> String {
        format!("field_{}", self.fields.len() + 1)
    }

    fn fresh_id(&self) -> FieldId {
        loop {
            let id = Uuid::new_v4();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
