//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space half-size of the resize handle hit box, in pixels.
pub const HANDLE_THRESHOLD_PX: f64 = 10.0;

/// Drawn size of the resize handle square, in pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Hit radius around an unsized (point-only) field anchor, in pixels.
pub const POINT_HIT_RADIUS_PX: f64 = 15.0;

/// Rubber-band travel below which a release counts as a click, in pixels per axis.
pub const CLICK_THRESHOLD_PX: f64 = 5.0;

// ── Field geometry ──────────────────────────────────────────────

/// Smallest width or height a resized field may take, in PDF points.
pub const MIN_FIELD_SIZE_PT: f64 = 10.0;

/// Width of a text field created by a point click, in PDF points.
pub const DEFAULT_TEXT_WIDTH_PT: f64 = 200.0;

/// Height of a text field created by a point click, in PDF points.
pub const DEFAULT_TEXT_HEIGHT_PT: f64 = 20.0;

/// Font size assigned to newly created fields.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Checkbox side length when a field has no font size.
pub const DEFAULT_CHECKBOX_SIZE_PT: f64 = 10.0;

/// Width given to a field switched from checkbox to text.
pub const TYPE_SWITCH_TEXT_WIDTH_PT: f64 = 50.0;

/// Height given to a field switched from checkbox to text.
pub const TYPE_SWITCH_TEXT_HEIGHT_PT: f64 = 20.0;

// ── Grid and zoom ───────────────────────────────────────────────

/// Default grid pitch in PDF points.
pub const DEFAULT_GRID_SIZE_PT: f64 = 7.5;

/// Smallest accepted grid pitch in PDF points.
pub const MIN_GRID_SIZE_PT: f64 = 0.5;

/// Upper bound on grid lines drawn per axis.
pub const MAX_GRID_LINES: usize = 4096;

/// Grid pitches offered by the toolbar.
pub const GRID_SIZE_PRESETS: [f64; 5] = [5.0, 7.5, 10.0, 25.0, 50.0];

/// Zoom factor used when a document is first opened.
pub const DEFAULT_SCALE: f64 = 1.5;

/// Zoom factors offered by the toolbar.
pub const SCALE_PRESETS: [f64; 3] = [1.0, 1.5, 2.0];

/// Arrow-key step with Shift held when snapping is off, in PDF points.
pub const SHIFT_NUDGE_PT: f64 = 10.0;

// ── Detection ───────────────────────────────────────────────────

/// Maximum number of pages sent to the detection service.
pub const MAX_DETECTION_PAGES: usize = 20;

/// Fallback width for a detected text field without a usable width.
pub const DETECTED_TEXT_WIDTH_PT: f64 = 50.0;

/// Fallback height for a detected text field without a usable height.
pub const DETECTED_TEXT_HEIGHT_PT: f64 = 20.0;
