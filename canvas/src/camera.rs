//! Coordinate transform between canvas pixels and PDF points.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either canvas (pixel) or PDF (point) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Unscaled page dimensions in PDF points (the scale-1 viewport).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in PDF points, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// Used for every PDF-space rounding so that `-0.5` and `0.5` step the same way.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Mapping between the rendered page raster and PDF user space.
///
/// `scale` is pixels per point. `page_height` is the unscaled page height in
/// points; it must be refreshed whenever the current page changes.
/// Canvas space has its origin top-left with Y growing downward; PDF space has
/// its origin bottom-left with Y growing upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scale: f64,
    pub page_height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, page_height: 0.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(scale: f64, page_height: f64) -> Self {
        Self { scale, page_height }
    }

    /// Convert a canvas pixel to integral PDF points.
    #[must_use]
    pub fn canvas_to_pdf(&self, canvas: Point) -> Point {
        canvas_to_pdf(canvas.x, canvas.y, self.scale, self.page_height)
    }

    /// Convert PDF points to a canvas pixel. No rounding is applied.
    #[must_use]
    pub fn pdf_to_canvas(&self, pdf: Point) -> Point {
        pdf_to_canvas(pdf.x, pdf.y, self.scale, self.page_height)
    }

    /// Convert a canvas-space distance (pixels) to PDF points.
    #[must_use]
    pub fn canvas_dist_to_pdf(&self, canvas_dist: f64) -> f64 {
        canvas_dist / self.scale
    }

    /// Convert a PDF-space distance (points) to canvas pixels.
    #[must_use]
    pub fn pdf_dist_to_canvas(&self, pdf_dist: f64) -> f64 {
        pdf_dist * self.scale
    }
}

/// `(round(cx / scale), round(page_height - cy / scale))`.
#[must_use]
pub fn canvas_to_pdf(cx: f64, cy: f64, scale: f64, page_height: f64) -> Point {
    Point {
        x: round_half_up(cx / scale),
        y: round_half_up(page_height - cy / scale),
    }
}

/// `(x * scale, (page_height - y) * scale)`.
#[must_use]
pub fn pdf_to_canvas(x: f64, y: f64, scale: f64, page_height: f64) -> Point {
    Point {
        x: x * scale,
        y: (page_height - y) * scale,
    }
}
