//! Grid configuration and snapping arithmetic.
//!
//! All values are PDF points. Snapping applies independently per axis and to
//! dimensions as well as coordinates. Stepping to the "next" grid line is used
//! by arrow-key nudges: a value that is off-grid first lands on the grid line
//! below it before continuing to step along the grid.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::{Point, round_half_up};
use crate::consts::{DEFAULT_GRID_SIZE_PT, MIN_GRID_SIZE_PT};

/// Step direction along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward larger values (right, or up in PDF space).
    Increase,
    /// Toward smaller values (left, or down in PDF space).
    Decrease,
}

impl Direction {
    /// `+1.0` or `-1.0`.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }
}

/// Grid settings shared by snapping and the grid overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Grid pitch in PDF points. Finite and at least [`MIN_GRID_SIZE_PT`].
    pub size: f64,
    /// Whether positions and sizes are quantized to the grid.
    pub snap_enabled: bool,
    /// Whether the overlay draws grid lines.
    pub show_grid: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: DEFAULT_GRID_SIZE_PT, snap_enabled: true, show_grid: true }
    }
}

impl GridConfig {
    /// Change the grid pitch. Sizes below [`MIN_GRID_SIZE_PT`] or non-finite
    /// sizes are rejected and leave the configuration unchanged.
    pub fn set_size(&mut self, size: f64) -> bool {
        if !size.is_finite() || size < MIN_GRID_SIZE_PT {
            return false;
        }
        self.size = size;
        true
    }

    /// Snap a single value with this configuration.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        snap_to_grid(value, self.size, self.snap_enabled)
    }

    /// Snap both axes of a point.
    #[must_use]
    pub fn snap_point(&self, p: Point) -> Point {
        Point::new(self.snap(p.x), self.snap(p.y))
    }

    /// Next grid line from `current` in `direction`, or a 1pt step when snapping is off.
    #[must_use]
    pub fn next_line(&self, current: f64, direction: Direction) -> f64 {
        snap_to_next_grid(current, direction, self.size, self.snap_enabled)
    }
}

/// Quantize `value` to the nearest multiple of `grid_size` when snapping is enabled.
#[must_use]
pub fn snap_to_grid(value: f64, grid_size: f64, snap_enabled: bool) -> f64 {
    if !snap_enabled || grid_size <= 0.0 {
        return value;
    }
    round_half_up(value / grid_size) * grid_size
}

/// Step from `current` to the next grid line strictly in `direction`.
///
/// With snapping disabled this is a 1pt nudge. Moving up always lands on the
/// line above the grid line at or below `current`; moving down lands on that
/// line itself when `current` is off-grid, otherwise one pitch lower. The
/// result never goes below zero.
#[must_use]
pub fn snap_to_next_grid(current: f64, direction: Direction, grid_size: f64, snap_enabled: bool) -> f64 {
    if !snap_enabled || grid_size <= 0.0 {
        return (current + direction.sign()).max(0.0);
    }
    let mut line = (current / grid_size).floor() * grid_size;
    if line > current {
        // Division rounded up onto the next integer.
        line -= grid_size;
    }
    let next = match direction {
        Direction::Increase => line + grid_size,
        Direction::Decrease => {
            if line < current {
                line
            } else {
                line - grid_size
            }
        }
    };
    next.max(0.0)
}

/// Move `current` one arrow-key step: the next grid line when snapping is on,
/// otherwise `step` points (1pt, or 10pt with Shift). Never below zero.
#[must_use]
pub fn nudge(current: f64, direction: Direction, grid: &GridConfig, step: f64) -> f64 {
    if grid.snap_enabled {
        return grid.next_line(current, direction);
    }
    (current + direction.sign() * step).max(0.0)
}
