#![allow(clippy::float_cmp)]

use super::*;

fn snapping(size: f64) -> GridConfig {
    GridConfig { size, snap_enabled: true, show_grid: true }
}

fn free() -> GridConfig {
    GridConfig { size: 7.5, snap_enabled: false, show_grid: true }
}

// =============================================================
// GridConfig
// =============================================================

#[test]
fn default_grid_is_seven_and_a_half_with_snap() {
    let g = GridConfig::default();
    assert_eq!(g.size, 7.5);
    assert!(g.snap_enabled);
    assert!(g.show_grid);
}

#[test]
fn set_size_accepts_positive() {
    let mut g = GridConfig::default();
    assert!(g.set_size(25.0));
    assert_eq!(g.size, 25.0);
}

#[test]
fn set_size_rejects_zero_negative_and_nan() {
    let mut g = GridConfig::default();
    assert!(!g.set_size(0.0));
    assert!(!g.set_size(-5.0));
    assert!(!g.set_size(f64::NAN));
    assert!(!g.set_size(f64::INFINITY));
    assert_eq!(g.size, 7.5);
}

#[test]
fn set_size_has_a_floor() {
    let mut g = GridConfig::default();
    assert!(!g.set_size(1e-6));
    assert!(!g.set_size(0.49));
    assert!(g.set_size(MIN_GRID_SIZE_PT));
    assert_eq!(g.size, 0.5);
}

// =============================================================
// snap_to_grid
// =============================================================

#[test]
fn snap_rounds_to_nearest_multiple() {
    assert_eq!(snap_to_grid(100.0, 7.5, true), 97.5);
    assert_eq!(snap_to_grid(101.0, 7.5, true), 97.5);
    assert_eq!(snap_to_grid(102.0, 7.5, true), 105.0);
    assert_eq!(snap_to_grid(14.0, 10.0, true), 10.0);
    assert_eq!(snap_to_grid(15.0, 10.0, true), 20.0);
}

#[test]
fn snap_disabled_is_identity() {
    assert_eq!(snap_to_grid(101.3, 7.5, false), 101.3);
}

#[test]
fn snap_is_idempotent() {
    for &g in &[5.0, 7.5, 10.0, 25.0, 50.0, 3.3] {
        let mut v = 0.0;
        while v < 900.0 {
            let once = snap_to_grid(v, g, true);
            let twice = snap_to_grid(once, g, true);
            assert!((once - twice).abs() < 1e-9, "g={g} v={v}");
            v += 1.7;
        }
    }
}

#[test]
fn snap_point_snaps_both_axes() {
    let p = snapping(10.0).snap_point(Point::new(13.0, 27.0));
    assert_eq!(p, Point::new(10.0, 30.0));
}

// =============================================================
// snap_to_next_grid
// =============================================================

#[test]
fn next_grid_up_from_on_grid_moves_one_pitch() {
    assert_eq!(snap_to_next_grid(15.0, Direction::Increase, 7.5, true), 22.5);
}

#[test]
fn next_grid_up_from_off_grid_goes_to_line_above() {
    assert_eq!(snap_to_next_grid(16.0, Direction::Increase, 7.5, true), 22.5);
}

#[test]
fn next_grid_down_from_on_grid_moves_one_pitch() {
    assert_eq!(snap_to_next_grid(15.0, Direction::Decrease, 7.5, true), 7.5);
}

#[test]
fn next_grid_down_from_off_grid_lands_on_line_below() {
    assert_eq!(snap_to_next_grid(16.0, Direction::Decrease, 7.5, true), 15.0);
}

#[test]
fn next_grid_never_negative() {
    assert_eq!(snap_to_next_grid(0.0, Direction::Decrease, 7.5, true), 0.0);
    assert_eq!(snap_to_next_grid(3.0, Direction::Decrease, 7.5, true), 0.0);
}

#[test]
fn next_grid_disabled_steps_one_point() {
    assert_eq!(snap_to_next_grid(16.0, Direction::Increase, 7.5, false), 17.0);
    assert_eq!(snap_to_next_grid(16.0, Direction::Decrease, 7.5, false), 15.0);
    assert_eq!(snap_to_next_grid(0.5, Direction::Decrease, 7.5, false), 0.0);
}

#[test]
fn next_grid_is_monotonic() {
    for &g in &[5.0, 7.5, 10.0, 25.0] {
        let mut v = 0.0;
        while v < 500.0 {
            let up = snap_to_next_grid(v, Direction::Increase, g, true);
            let down = snap_to_next_grid(v, Direction::Decrease, g, true);
            assert!(up > v, "g={g} v={v} up={up}");
            assert!(down < v || down == 0.0, "g={g} v={v} down={down}");
            v += 0.9;
        }
    }
}

#[test]
fn repeated_steps_walk_the_grid() {
    let g = snapping(10.0);
    let mut v = 13.0;
    v = g.next_line(v, Direction::Decrease);
    assert_eq!(v, 10.0);
    v = g.next_line(v, Direction::Decrease);
    assert_eq!(v, 0.0);
    v = g.next_line(v, Direction::Increase);
    assert_eq!(v, 10.0);
}

// =============================================================
// nudge
// =============================================================

#[test]
fn nudge_with_snap_ignores_step() {
    assert_eq!(nudge(16.0, Direction::Increase, &snapping(7.5), 10.0), 22.5);
}

#[test]
fn nudge_without_snap_uses_step() {
    assert_eq!(nudge(16.0, Direction::Increase, &free(), 1.0), 17.0);
    assert_eq!(nudge(16.0, Direction::Increase, &free(), 10.0), 26.0);
    assert_eq!(nudge(5.0, Direction::Decrease, &free(), 10.0), 0.0);
}

#[test]
fn direction_sign() {
    assert_eq!(Direction::Increase.sign(), 1.0);
    assert_eq!(Direction::Decrease.sign(), -1.0);
}
