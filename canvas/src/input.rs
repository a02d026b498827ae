//! Input model: modifier keys, mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each variant carries the context needed to compute positions
//! from the original press rather than accumulating per-move deltas, which keeps
//! snapped drags stable.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::FieldId;
use crate::grid::Direction;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key, named as a browser reports it (`"Delete"`, `"ArrowLeft"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether this key deletes the selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    /// Axis and direction for an arrow key, in PDF space (up is `Increase` on y).
    #[must_use]
    pub fn arrow(&self) -> Option<(Axis, Direction)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((Axis::X, Direction::Decrease)),
            "ArrowRight" => Some((Axis::X, Direction::Increase)),
            "ArrowUp" => Some((Axis::Y, Direction::Increase)),
            "ArrowDown" => Some((Axis::Y, Direction::Decrease)),
            _ => None,
        }
    }
}

/// Coordinate axis targeted by a keyboard nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// When drag and resize results are quantized to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// Track the pointer freely and snap once on release.
    #[default]
    OnRelease,
    /// Snap on every pointer move.
    Continuous,
}

/// Pointer cursor hint emitted to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    /// Over a field body.
    Move,
    /// Over the selected field's resize handle.
    Resize,
}

impl CursorKind {
    /// CSS cursor name.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Resize => "nesw-resize",
        }
    }
}

/// Persistent UI state visible to the overlay.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected field, if any.
    pub selected_id: Option<FieldId>,
    /// The field under the pointer, if any.
    pub hovered_id: Option<FieldId>,
    /// A text input has keyboard focus; editing shortcuts are suppressed.
    pub text_input_focused: bool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Rubber-band over empty page space. Both points are canvas pixels.
    Selecting {
        start: Point,
        end: Point,
    },
    /// Moving an existing field.
    Dragging {
        id: FieldId,
        /// Canvas pointer position at press.
        start_pointer: Point,
        /// Field anchor (PDF points) at press.
        start_field: Point,
    },
    /// Resizing a text field from its handle.
    Resizing {
        id: FieldId,
        /// Canvas pointer position at press.
        start_pointer: Point,
        /// Field `(width, height)` in PDF points at press.
        start_size: (f64, f64),
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Id of the field targeted by a drag or resize.
    #[must_use]
    pub fn target_id(&self) -> Option<FieldId> {
        match self {
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
            Self::Idle | Self::Selecting { .. } => None,
        }
    }
}
