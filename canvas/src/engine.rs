//! Interaction engine: turns pointer and keyboard events into field-store edits.
//!
//! `EngineCore` owns the field store, grid settings, current page geometry and
//! the gesture state machine. It has no rendering or I/O dependency; hosts feed
//! it canvas-pixel events and react to the returned [`Action`]s.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Camera, PageSize, PdfRect, Point, round_half_up};
use crate::codec::{self, ExportError, ImportError};
use crate::consts::{CLICK_THRESHOLD_PX, DEFAULT_FONT_SIZE, DEFAULT_SCALE, DEFAULT_TEXT_HEIGHT_PT, DEFAULT_TEXT_WIDTH_PT, SHIFT_NUDGE_PT};
use crate::doc::{FieldDefinition, FieldId, FieldKind, FieldPatch, FieldStore, clamp_dimension};
use crate::grid::{GridConfig, nudge};
use crate::hit::{self, HitPart};
use crate::input::{Axis, Button, CursorKind, InputState, Key, Modifiers, SnapMode, UiState};
use crate::validate::{self, ValidationError};

/// Engine tuning that is not part of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// When drags and resizes are snapped.
    pub snap_mode: SnapMode,
    /// Zoom used for a freshly constructed engine.
    pub default_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { snap_mode: SnapMode::OnRelease, default_scale: DEFAULT_SCALE }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    FieldCreated(FieldDefinition),
    FieldUpdated { id: FieldId, patch: FieldPatch },
    FieldDeleted { id: FieldId },
    /// The whole store was replaced (import or detection).
    FieldsReplaced { count: usize },
    SelectionChanged(Option<FieldId>),
    HoverChanged(Option<FieldId>),
    PageChanged(u32),
    SetCursor(CursorKind),
    RenderNeeded,
}

/// Row of the field list shown next to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub id: FieldId,
    pub name: String,
    pub kind: FieldKind,
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

impl From<&FieldDefinition> for FieldSummary {
    fn from(f: &FieldDefinition) -> Self {
        Self { id: f.id, name: f.name.clone(), kind: f.kind, page: f.page, x: f.x, y: f.y }
    }
}

/// Core engine state. Testable without any PDF or rendering backend.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub store: FieldStore,
    pub grid: GridConfig,
    pub config: EngineConfig,
    pub ui: UiState,
    pub input: InputState,
    /// Pixels per PDF point.
    pub scale: f64,
    /// Unscaled size of the current page.
    pub page_size: PageSize,
    /// 1-based current page.
    pub current_page: u32,
    /// Zero when no document is open.
    pub total_pages: u32,
    cursor: CursorKind,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: FieldStore::new(),
            grid: GridConfig::default(),
            config,
            ui: UiState::default(),
            input: InputState::Idle,
            scale: config.default_scale,
            page_size: PageSize::default(),
            current_page: 1,
            total_pages: 0,
            cursor: CursorKind::Default,
        }
    }

    // --- Document lifecycle ---

    /// Start editing a freshly loaded document. Any previous fields are discarded.
    pub fn open_document(&mut self, total_pages: u32, first_page: PageSize) {
        self.reset();
        self.total_pages = total_pages;
        self.page_size = first_page;
        tracing::info!(total_pages, width = first_page.width, height = first_page.height, "document opened");
    }

    /// Drop all document state. Grid settings and zoom survive.
    pub fn reset(&mut self) {
        self.store.clear();
        self.ui = UiState { text_input_focused: self.ui.text_input_focused, ..UiState::default() };
        self.input = InputState::Idle;
        self.current_page = 1;
        self.total_pages = 0;
        self.page_size = PageSize::default();
        self.cursor = CursorKind::Default;
    }

    #[must_use]
    pub fn has_document(&self) -> bool {
        self.total_pages > 0
    }

    // --- Paging and zoom ---

    /// Switch to `page`, clamped to the document. Selection and hover are cleared
    /// and any gesture in progress is abandoned.
    pub fn set_page(&mut self, page: u32) -> Vec<Action> {
        if !self.has_document() {
            return Vec::new();
        }
        let page = page.clamp(1, self.total_pages);
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.clear_selection(&mut actions);
        if self.ui.hovered_id.take().is_some() {
            actions.push(Action::HoverChanged(None));
        }
        if page != self.current_page {
            self.current_page = page;
            actions.push(Action::PageChanged(page));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn next_page(&mut self) -> Vec<Action> {
        self.set_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Vec<Action> {
        self.set_page(self.current_page.saturating_sub(1))
    }

    /// Record the unscaled size of the current page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
    }

    /// Change the zoom. Returns `false` for non-finite or non-positive values.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        self.scale = scale;
        true
    }

    /// Keyboard shortcuts are ignored while a text input has focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.ui.text_input_focused = focused;
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::new(self.scale, self.page_size.height)
    }

    #[must_use]
    pub fn selection(&self) -> Option<FieldId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn hovered(&self) -> Option<FieldId> {
        self.ui.hovered_id
    }

    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.store.get(id)
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        self.store.fields()
    }

    pub fn fields_on_page(&self, page: u32) -> impl Iterator<Item = &FieldDefinition> {
        self.store.on_page(page)
    }

    /// Field list rows in store order.
    #[must_use]
    pub fn field_summaries(&self) -> Vec<FieldSummary> {
        self.store.fields().iter().map(FieldSummary::from).collect()
    }

    /// Snapped PDF rectangle of the rubber band in progress.
    #[must_use]
    pub fn selection_preview(&self) -> Option<PdfRect> {
        match self.input {
            InputState::Selecting { start, end } => Some(self.selection_rect(start, end)),
            _ => None,
        }
    }

    /// Problems that would block form generation.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationError> {
        validate::validate(self.store.fields())
    }

    // --- Selection ---

    /// Select a field, or clear the selection with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<FieldId>) -> Vec<Action> {
        if let Some(id) = id {
            if !self.store.contains(&id) {
                return Vec::new();
            }
        }
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    /// Jump to the field's page and select it.
    pub fn focus_field(&mut self, id: &FieldId) -> Vec<Action> {
        let Some(page) = self.store.get(id).map(|f| f.page) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if page != self.current_page {
            actions.extend(self.set_page(page));
        }
        actions.extend(self.select(Some(*id)));
        actions
    }

    fn clear_selection(&mut self, actions: &mut Vec<Action>) {
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
    }

    // --- Field edits ---

    /// Add a field under a fresh id without changing the selection.
    pub fn create_field(&mut self, def: FieldDefinition) -> Action {
        let id = self.store.create(def);
        match self.store.get(&id) {
            Some(field) => Action::FieldCreated(field.clone()),
            None => Action::None,
        }
    }

    /// Merge `patch` into a field. Stale ids yield `Action::None`.
    ///
    /// The page is clamped to the open document. Widths and heights that are
    /// not positive are dropped; positive ones are raised to the minimum size.
    pub fn update_field(&mut self, id: &FieldId, mut patch: FieldPatch) -> Action {
        if let Some(page) = patch.page {
            patch.page = Some(page.clamp(1, self.total_pages.max(1)));
        }
        patch.width = patch.width.and_then(usable_dimension);
        patch.height = patch.height.and_then(usable_dimension);
        if patch.is_empty() || !self.store.update(id, &patch) {
            return Action::None;
        }
        Action::FieldUpdated { id: *id, patch }
    }

    /// Rename a field. Names that are blank after trimming are ignored.
    pub fn rename_field(&mut self, id: &FieldId, name: &str) -> Action {
        let name = name.trim();
        if name.is_empty() {
            return Action::None;
        }
        self.update_field(id, FieldPatch { name: Some(name.to_owned()), ..FieldPatch::default() })
    }

    /// Remove a field, clearing selection/hover and abandoning any gesture on it.
    pub fn delete_field(&mut self, id: &FieldId) -> Vec<Action> {
        if self.store.delete(id).is_none() {
            return Vec::new();
        }
        tracing::debug!(%id, "field deleted");
        let mut actions = vec![Action::FieldDeleted { id: *id }];
        if self.ui.selected_id == Some(*id) {
            self.clear_selection(&mut actions);
        }
        if self.ui.hovered_id == Some(*id) {
            self.ui.hovered_id = None;
            actions.push(Action::HoverChanged(None));
        }
        if self.input.target_id() == Some(*id) {
            self.input = InputState::Idle;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace every field (import, detection). Selection and hover are cleared.
    pub fn replace_fields(&mut self, fields: Vec<FieldDefinition>) -> Vec<Action> {
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.clear_selection(&mut actions);
        if self.ui.hovered_id.take().is_some() {
            actions.push(Action::HoverChanged(None));
        }
        let count = fields.len();
        self.store.clear();
        for field in fields {
            self.store.create(field);
        }
        actions.push(Action::FieldsReplaced { count });
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Import / export ---

    /// Replace the store from an export document. On error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the codec's `ImportError` when the document shape is wrong.
    pub fn import_json(&mut self, text: &str) -> Result<Vec<Action>, ImportError> {
        let fields = codec::import_json(text)?;
        Ok(self.replace_fields(fields))
    }

    /// Serialize the store with the current page dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the timestamp or JSON cannot be produced.
    pub fn export_json(&self) -> Result<String, ExportError> {
        codec::export_json(self.store.fields(), self.page_size)
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, canvas_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.input.is_active() || !self.has_document() {
            return Vec::new();
        }
        let camera = self.camera();
        let hit = hit::hit_test(canvas_pt, &self.store, self.current_page, &camera, self.ui.selected_id);
        let mut actions = Vec::new();

        match hit {
            Some(hit) if hit.part == HitPart::ResizeHandle => {
                let Some(start_size) = self.store.get(&hit.field_id).and_then(FieldDefinition::size) else {
                    return actions;
                };
                tracing::debug!(id = %hit.field_id, "resize started");
                self.input = InputState::Resizing { id: hit.field_id, start_pointer: canvas_pt, start_size };
            }
            Some(hit) => {
                let Some(start_field) = self.store.get(&hit.field_id).map(|f| Point::new(f.x, f.y)) else {
                    return actions;
                };
                tracing::debug!(id = %hit.field_id, "drag started");
                actions.extend(self.select(Some(hit.field_id)));
                self.input = InputState::Dragging { id: hit.field_id, start_pointer: canvas_pt, start_field };
            }
            None => {
                self.clear_selection(&mut actions);
                self.input = InputState::Selecting { start: canvas_pt, end: canvas_pt };
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, canvas_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let continuous = self.config.snap_mode == SnapMode::Continuous;
        match self.input {
            InputState::Idle => self.update_hover(canvas_pt),
            InputState::Selecting { start, .. } => {
                self.input = InputState::Selecting { start, end: canvas_pt };
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id, start_pointer, start_field } => {
                let pos = self.drag_position(start_pointer, start_field, canvas_pt, continuous);
                self.move_field(id, pos)
            }
            InputState::Resizing { id, start_pointer, start_size } => {
                let (w, h) = self.resize_dims(start_pointer, start_size, canvas_pt, continuous);
                self.size_field(id, w, h)
            }
        }
    }

    pub fn on_pointer_up(&mut self, canvas_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.finish_gesture(Some(canvas_pt))
    }

    /// Pointer left the canvas: finalize any gesture and drop hover.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = self.finish_gesture(None);
        if self.ui.hovered_id.take().is_some() {
            actions.push(Action::HoverChanged(None));
            actions.push(Action::RenderNeeded);
        }
        if self.cursor != CursorKind::Default {
            self.cursor = CursorKind::Default;
            actions.push(Action::SetCursor(CursorKind::Default));
        }
        actions
    }

    fn finish_gesture(&mut self, release: Option<Point>) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Selecting { start, end } => self.finish_selection(start, release.unwrap_or(end)),
            InputState::Dragging { id, start_pointer, start_field } => {
                let pos = match (release, self.store.get(&id)) {
                    (Some(pt), _) => self.drag_position(start_pointer, start_field, pt, true),
                    (None, Some(field)) => self.grid.snap_point(Point::new(field.x, field.y)),
                    (None, None) => return Vec::new(),
                };
                tracing::debug!(%id, x = pos.x, y = pos.y, "drag finished");
                let mut actions = self.move_field(id, pos);
                push_render(&mut actions);
                actions
            }
            InputState::Resizing { id, start_pointer, start_size } => {
                let (w, h) = match (release, self.store.get(&id).and_then(FieldDefinition::size)) {
                    (Some(pt), _) => self.resize_dims(start_pointer, start_size, pt, true),
                    (None, Some((w, h))) => (self.grid.snap(w), self.grid.snap(h)),
                    (None, None) => return Vec::new(),
                };
                tracing::debug!(%id, width = w, height = h, "resize finished");
                let mut actions = self.size_field(id, w, h);
                push_render(&mut actions);
                actions
            }
        }
    }

    fn finish_selection(&mut self, start: Point, end: Point) -> Vec<Action> {
        let travel_x = (end.x - start.x).abs();
        let travel_y = (end.y - start.y).abs();
        let name = self.store.next_default_name();

        let def = if travel_x < CLICK_THRESHOLD_PX && travel_y < CLICK_THRESHOLD_PX {
            let anchor = self.grid.snap_point(self.camera().canvas_to_pdf(start));
            FieldDefinition::text(name, self.current_page, anchor.x, anchor.y, DEFAULT_TEXT_WIDTH_PT, DEFAULT_TEXT_HEIGHT_PT)
        } else {
            let rect = self.selection_rect(start, end);
            FieldDefinition::text(
                name,
                self.current_page,
                rect.x,
                rect.y,
                clamp_dimension(rect.width),
                clamp_dimension(rect.height),
            )
        }
        .with_font_size(DEFAULT_FONT_SIZE);

        let created = self.create_field(def);
        let mut actions = Vec::new();
        if let Action::FieldCreated(field) = &created {
            tracing::debug!(id = %field.id, x = field.x, y = field.y, "field created");
            self.ui.selected_id = Some(field.id);
            let id = field.id;
            actions.push(created);
            actions.push(Action::SelectionChanged(Some(id)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// PDF rectangle spanned by two canvas corners: anchor at the bottom-left,
    /// extents rounded, everything snapped when snapping is on.
    fn selection_rect(&self, start: Point, end: Point) -> PdfRect {
        let camera = self.camera();
        let left = start.x.min(end.x);
        let right = start.x.max(end.x);
        let top = start.y.min(end.y);
        let bottom = start.y.max(end.y);
        let anchor = camera.canvas_to_pdf(Point::new(left, bottom));
        PdfRect {
            x: self.grid.snap(anchor.x),
            y: self.grid.snap(anchor.y),
            width: self.grid.snap(round_half_up(camera.canvas_dist_to_pdf(right - left))),
            height: self.grid.snap(round_half_up(camera.canvas_dist_to_pdf(bottom - top))),
        }
    }

    fn drag_position(&self, start_pointer: Point, start_field: Point, pt: Point, snap: bool) -> Point {
        let dx = (pt.x - start_pointer.x) / self.scale;
        let dy = -(pt.y - start_pointer.y) / self.scale;
        let pos = Point::new(round_half_up(start_field.x + dx), round_half_up(start_field.y + dy));
        if snap { self.grid.snap_point(pos) } else { pos }
    }

    fn resize_dims(&self, start_pointer: Point, start_size: (f64, f64), pt: Point, snap: bool) -> (f64, f64) {
        let dx = (pt.x - start_pointer.x) / self.scale;
        let dy = -(pt.y - start_pointer.y) / self.scale;
        let w = round_half_up(clamp_dimension(start_size.0 + dx));
        let h = round_half_up(clamp_dimension(start_size.1 + dy));
        if snap { (self.grid.snap(w), self.grid.snap(h)) } else { (w, h) }
    }

    fn move_field(&mut self, id: FieldId, pos: Point) -> Vec<Action> {
        let Some(field) = self.store.get(&id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        if field.x == pos.x && field.y == pos.y {
            return Vec::new();
        }
        self.store.reposition(&id, pos.x, pos.y);
        vec![Action::FieldUpdated { id, patch: FieldPatch::position(pos.x, pos.y) }, Action::RenderNeeded]
    }

    fn size_field(&mut self, id: FieldId, width: f64, height: f64) -> Vec<Action> {
        if !self.store.resize(&id, width, height) {
            self.input = InputState::Idle;
            return Vec::new();
        }
        let Some((w, h)) = self.store.get(&id).and_then(FieldDefinition::size) else {
            return Vec::new();
        };
        vec![Action::FieldUpdated { id, patch: FieldPatch::size(w, h) }, Action::RenderNeeded]
    }

    fn update_hover(&mut self, canvas_pt: Point) -> Vec<Action> {
        if !self.has_document() {
            return Vec::new();
        }
        let camera = self.camera();
        let hovered = hit::find_field_at_position(canvas_pt, self.store.on_page(self.current_page), &camera).map(|f| f.id);
        let mut actions = Vec::new();
        if hovered != self.ui.hovered_id {
            self.ui.hovered_id = hovered;
            actions.push(Action::HoverChanged(hovered));
            actions.push(Action::RenderNeeded);
        }

        let on_handle = self
            .ui
            .selected_id
            .and_then(|id| self.store.get(&id))
            .is_some_and(|f| f.page == self.current_page && hit::is_on_resize_handle(canvas_pt, f, &camera));
        let cursor = if on_handle {
            CursorKind::Resize
        } else if hovered.is_some() {
            CursorKind::Move
        } else {
            CursorKind::Default
        };
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
        actions
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.text_input_focused || self.input.is_active() {
            return Vec::new();
        }
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };

        if key.is_escape() {
            let mut actions = Vec::new();
            self.clear_selection(&mut actions);
            actions.push(Action::RenderNeeded);
            return actions;
        }
        if key.is_delete() {
            return self.delete_field(&id);
        }
        let Some((axis, direction)) = key.arrow() else {
            return Vec::new();
        };
        let Some(field) = self.store.get(&id) else {
            return Vec::new();
        };
        let step = if modifiers.shift { SHIFT_NUDGE_PT } else { 1.0 };
        let pos = match axis {
            Axis::X => Point::new(nudge(field.x, direction, &self.grid, step), field.y),
            Axis::Y => Point::new(field.x, nudge(field.y, direction, &self.grid, step)),
        };
        self.move_field(id, pos)
    }
}

fn usable_dimension(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then(|| clamp_dimension(value))
}

fn push_render(actions: &mut Vec<Action>) {
    if !actions.contains(&Action::RenderNeeded) {
        actions.push(Action::RenderNeeded);
    }
}
