#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_equality() {
    assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 3.0));
}

// --- round_half_up ---

#[test]
fn round_half_up_positive_halves_go_up() {
    assert_eq!(round_half_up(2.5), 3.0);
    assert_eq!(round_half_up(2.49), 2.0);
}

#[test]
fn round_half_up_negative_halves_go_toward_zero() {
    assert_eq!(round_half_up(-2.5), -2.0);
    assert_eq!(round_half_up(-2.51), -3.0);
}

// --- Camera defaults ---

#[test]
fn camera_default_scale_is_one() {
    let cam = Camera::default();
    assert_eq!(cam.scale, 1.0);
    assert_eq!(cam.page_height, 0.0);
}

// --- canvas_to_pdf ---

#[test]
fn canvas_to_pdf_flips_y_at_unit_scale() {
    let cam = Camera::new(1.0, 800.0);
    let pdf = cam.canvas_to_pdf(Point::new(100.0, 100.0));
    assert!(point_approx_eq(pdf, Point::new(100.0, 700.0)));
}

#[test]
fn canvas_to_pdf_top_left_is_page_top() {
    let cam = Camera::new(1.5, 792.0);
    let pdf = cam.canvas_to_pdf(Point::new(0.0, 0.0));
    assert!(point_approx_eq(pdf, Point::new(0.0, 792.0)));
}

#[test]
fn canvas_to_pdf_bottom_left_is_origin() {
    let cam = Camera::new(2.0, 792.0);
    let pdf = cam.canvas_to_pdf(Point::new(0.0, 1584.0));
    assert!(point_approx_eq(pdf, Point::new(0.0, 0.0)));
}

#[test]
fn canvas_to_pdf_divides_by_scale() {
    let cam = Camera::new(2.0, 800.0);
    let pdf = cam.canvas_to_pdf(Point::new(200.0, 400.0));
    assert!(point_approx_eq(pdf, Point::new(100.0, 600.0)));
}

#[test]
fn canvas_to_pdf_rounds_to_integral_points() {
    let cam = Camera::new(1.5, 800.0);
    // 100 / 1.5 = 66.67 -> 67; 800 - 50 / 1.5 = 766.67 -> 767
    let pdf = cam.canvas_to_pdf(Point::new(100.0, 50.0));
    assert_eq!(pdf, Point::new(67.0, 767.0));
}

#[test]
fn free_function_matches_method() {
    let cam = Camera::new(1.5, 842.0);
    let a = cam.canvas_to_pdf(Point::new(321.0, 123.0));
    let b = canvas_to_pdf(321.0, 123.0, 1.5, 842.0);
    assert_eq!(a, b);
}

// --- pdf_to_canvas ---

#[test]
fn pdf_to_canvas_flips_y() {
    let cam = Camera::new(1.0, 800.0);
    let canvas = cam.pdf_to_canvas(Point::new(100.0, 700.0));
    assert!(point_approx_eq(canvas, Point::new(100.0, 100.0)));
}

#[test]
fn pdf_to_canvas_does_not_round() {
    let cam = Camera::new(1.5, 800.0);
    let canvas = cam.pdf_to_canvas(Point::new(7.5, 792.5));
    assert!(point_approx_eq(canvas, Point::new(11.25, 11.25)));
}

#[test]
fn pdf_to_canvas_origin_is_bottom_left() {
    let cam = Camera::new(2.0, 792.0);
    let canvas = cam.pdf_to_canvas(Point::new(0.0, 0.0));
    assert!(point_approx_eq(canvas, Point::new(0.0, 1584.0)));
}

// --- inverse property ---

#[test]
fn canvas_to_pdf_inverts_pdf_to_canvas_for_integral_points() {
    for &scale in &[1.0, 1.5, 2.0, 0.75, 3.3] {
        let cam = Camera::new(scale, 842.0);
        for x in (0..600).step_by(37) {
            for y in (0..842).step_by(41) {
                let pdf = Point::new(f64::from(x), f64::from(y));
                let back = cam.canvas_to_pdf(cam.pdf_to_canvas(pdf));
                assert_eq!(back, pdf, "scale {scale} point {pdf:?}");
            }
        }
    }
}

// --- distances ---

#[test]
fn distance_conversions_are_inverse() {
    let cam = Camera::new(1.5, 800.0);
    assert!(approx_eq(cam.canvas_dist_to_pdf(30.0), 20.0));
    assert!(approx_eq(cam.pdf_dist_to_canvas(20.0), 30.0));
}
