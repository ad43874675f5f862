#![allow(clippy::float_cmp)]

use super::*;

const TOL: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

fn viewport(image: (u32, u32), canvas: (f64, f64)) -> ViewportState {
    let mut vp = ViewportState::new();
    vp.set_canvas_size(canvas.0, canvas.1);
    vp.set_image(image.0, image.1);
    vp
}

/// Canvas pixels of the displayed image that fall inside the canvas, per axis.
fn visible_extent(vp: &ViewportState) -> (f64, f64) {
    let b = vp.image_bounds_in_canvas();
    let (cw, ch) = vp.canvas_size();
    let vis_w = b.right().min(cw) - b.x.max(0.0);
    let vis_h = b.bottom().min(ch) - b.y.max(0.0);
    (vis_w, vis_h)
}

fn assert_visibility_floor(vp: &ViewportState) {
    let b = vp.image_bounds_in_canvas();
    let (cw, ch) = vp.canvas_size();
    let (vis_w, vis_h) = visible_extent(vp);
    let need_w = (b.width * 0.2).min(cw);
    let need_h = (b.height * 0.2).min(ch);
    assert!(vis_w >= need_w - TOL, "visible width {vis_w} < {need_w}");
    assert!(vis_h >= need_h - TOL, "visible height {vis_h} < {need_h}");
}

// =============================================================
// Defaults and degenerate state
// =============================================================

#[test]
fn new_viewport_is_degenerate_identity() {
    let vp = ViewportState::new();
    assert!(vp.is_degenerate());
    assert!(!vp.has_image());
    assert_eq!(vp.fit_scale(), 1.0);
    assert_eq!(vp.fit_offset(), Point::ZERO);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::ZERO);
    assert_eq!(vp.display_size(), (0, 0));
    assert_eq!(vp.zoom_limits(), (0.2, 6.0));
}

#[test]
fn canvas_without_image_keeps_safe_defaults() {
    let vp = viewport((0, 0), (800.0, 600.0));
    assert_eq!(vp.fit_scale(), 1.0);
    assert_eq!(vp.fit_offset(), Point::ZERO);
    assert_eq!(vp.display_size(), (0, 0));
    assert_eq!(vp.effective_offset(), Point::ZERO);
    assert_eq!(vp.image_bounds_in_canvas(), Rect::default());
}

#[test]
fn image_without_canvas_keeps_safe_defaults() {
    let vp = viewport((640, 480), (0.0, 0.0));
    assert!(vp.is_degenerate());
    assert_eq!(vp.fit_scale(), 1.0);
    assert_eq!(vp.fit_offset(), Point::ZERO);
    assert_eq!(vp.display_size(), (0, 0));
}

#[test]
fn zero_width_image_is_degenerate() {
    let vp = viewport((0, 480), (800.0, 600.0));
    assert!(vp.is_degenerate());
    assert_eq!(vp.fit_scale(), 1.0);
}

#[test]
fn negative_or_nan_canvas_is_treated_as_zero() {
    let mut vp = viewport((100, 100), (200.0, 200.0));
    vp.set_canvas_size(-5.0, f64::NAN);
    assert_eq!(vp.canvas_size(), (0.0, 0.0));
    assert!(vp.is_degenerate());
    assert_eq!(vp.fit_scale(), 1.0);
}

// =============================================================
// Fit
// =============================================================

#[test]
fn fit_scale_upscales_small_square_image() {
    let vp = viewport((200, 200), (400.0, 400.0));
    assert_eq!(vp.fit_scale(), 2.0);
    assert_eq!(vp.display_size(), (400, 400));
    assert_eq!(vp.fit_offset(), Point::ZERO);
}

#[test]
fn fit_scale_downscales_large_square_image() {
    let vp = viewport((400, 400), (200.0, 200.0));
    assert_eq!(vp.fit_scale(), 0.5);
    assert_eq!(vp.display_size(), (200, 200));
}

#[test]
fn fit_letterboxes_wide_image() {
    let vp = viewport((200, 100), (400.0, 400.0));
    assert_eq!(vp.fit_scale(), 2.0);
    assert_eq!(vp.display_size(), (400, 200));
    assert_eq!(vp.fit_offset(), Point::new(0.0, 100.0));
}

#[test]
fn fit_pillarboxes_tall_image() {
    let vp = viewport((100, 400), (800.0, 400.0));
    assert_eq!(vp.fit_scale(), 1.0);
    assert_eq!(vp.display_size(), (100, 400));
    assert_eq!(vp.fit_offset(), Point::new(350.0, 0.0));
}

#[test]
fn fit_scale_is_min_of_axis_ratios() {
    let cases = [((640, 480), (1024.0, 300.0)), ((33, 77), (500.0, 500.0)), ((1920, 1080), (320.0, 240.0))];
    for ((iw, ih), (cw, ch)) in cases {
        let vp = viewport((iw, ih), (cw, ch));
        let expected = (cw / f64::from(iw)).min(ch / f64::from(ih));
        assert!(approx_eq(vp.fit_scale(), expected));
    }
}

#[test]
fn fitted_image_is_fully_visible_at_zoom_one() {
    let vp = viewport((333, 129), (640.0, 480.0));
    let b = vp.image_bounds_in_canvas();
    assert!(b.x >= -TOL && b.y >= -TOL);
    assert!(b.right() <= 640.0 + 1.0);
    assert!(b.bottom() <= 480.0 + 1.0);
}

// =============================================================
// set_image / set_canvas_size
// =============================================================

#[test]
fn set_image_same_dimensions_is_noop() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(2.0, Point::new(400.0, 300.0));
    vp.pan_by(Point::new(30.0, -20.0));
    let pan = vp.pan();

    assert!(!vp.set_image(400, 300));
    assert_eq!(vp.zoom(), 2.0);
    assert_eq!(vp.pan(), pan);
}

#[test]
fn set_image_new_dimensions_resets_view() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(2.0, Point::new(100.0, 100.0));
    vp.pan_by(Point::new(30.0, -20.0));

    assert!(vp.set_image(800, 600));
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::ZERO);
    assert_eq!(vp.fit_scale(), 1.0);
}

#[test]
fn set_canvas_size_keeps_zoom() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(2.0, Point::new(400.0, 300.0));

    assert!(vp.set_canvas_size(1600.0, 1200.0));
    assert_eq!(vp.zoom(), 2.0);
    assert_eq!(vp.fit_scale(), 4.0);
}

#[test]
fn set_canvas_size_same_is_noop() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    assert!(!vp.set_canvas_size(800.0, 600.0));
}

#[test]
fn shrinking_canvas_reclamps_pan() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.pan_by(Point::new(600.0, 0.0));
    vp.set_canvas_size(400.0, 300.0);
    assert_visibility_floor(&vp);
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_is_clamped_to_range() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(100.0, Point::new(400.0, 300.0));
    assert_eq!(vp.zoom(), 6.0);
    vp.set_zoom(0.001, Point::new(400.0, 300.0));
    assert_eq!(vp.zoom(), 0.2);
}

#[test]
fn zoom_by_rejects_invalid_factor() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    assert!(!vp.zoom_by(0.0, Point::ZERO));
    assert!(!vp.zoom_by(-2.0, Point::ZERO));
    assert!(!vp.zoom_by(f64::NAN, Point::ZERO));
    assert_eq!(vp.zoom(), 1.0);
}

#[test]
fn zoom_at_limit_reports_no_change() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(6.0, Point::new(400.0, 300.0));
    assert!(!vp.zoom_by(2.0, Point::new(400.0, 300.0)));
}

#[test]
fn zoom_in_then_out_restores_zoom() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    let focal = Point::new(400.0, 300.0);
    vp.zoom_in(focal);
    assert!(vp.zoom() > 1.0);
    vp.zoom_out(focal);
    assert!(approx_eq(vp.zoom(), 1.0));
}

#[test]
fn zoom_about_center_keeps_pan_zero() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.zoom_by(2.0, Point::new(400.0, 300.0));
    assert!(vp.pan().approx_eq(Point::ZERO, TOL));
}

#[test]
fn zoom_keeps_focal_image_point_stationary() {
    let focals = [Point::new(300.0, 200.0), Point::new(400.0, 300.0), Point::new(500.0, 450.0)];
    let factors = [0.5, 0.8, 1.5, 2.0, 3.0, 6.0];
    for focal in focals {
        for k in factors {
            let mut vp = viewport((400, 300), (800.0, 600.0));
            let before = vp.transformer().canvas_to_image(focal);
            vp.zoom_by(k, focal);
            let after = vp.transformer().canvas_to_image(focal);
            assert!(before.approx_eq(after, TOL), "focal {focal:?} k {k}: {before:?} != {after:?}");
        }
    }
}

#[test]
fn chained_zooms_keep_focal_point_stationary() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.zoom_by(2.0, Point::new(400.0, 300.0));

    let focal = Point::new(100.0, 100.0);
    let before = vp.transformer().canvas_to_image(focal);
    vp.zoom_by(1.5, focal);
    let after = vp.transformer().canvas_to_image(focal);
    assert!(before.approx_eq(after, TOL));
    assert!(approx_eq(vp.zoom(), 3.0));
}

#[test]
fn non_finite_focal_uses_canvas_center() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(2.0, Point::new(f64::NAN, 0.0));
    assert!(vp.pan().approx_eq(Point::ZERO, TOL));
    assert_eq!(vp.zoom(), 2.0);
}

#[test]
fn zoom_on_degenerate_viewport_sets_value_only() {
    let mut vp = ViewportState::new();
    assert!(vp.set_zoom(3.0, Point::new(10.0, 10.0)));
    assert_eq!(vp.zoom(), 3.0);
    assert_eq!(vp.pan(), Point::ZERO);
}

#[test]
fn set_zoom_limits_clamps_current_zoom() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(5.0, Point::new(400.0, 300.0));
    vp.set_zoom_limits(0.5, 2.0).unwrap();
    assert_eq!(vp.zoom(), 2.0);
    assert_eq!(vp.zoom_limits(), (0.5, 2.0));
}

#[test]
fn set_zoom_limits_rejects_inverted_range() {
    let mut vp = ViewportState::new();
    let err = vp.set_zoom_limits(3.0, 1.0).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidZoomRange { .. }));
    assert_eq!(vp.zoom_limits(), (0.2, 6.0));
}

#[test]
fn from_config_uses_configured_limits() {
    let cfg = CanvasConfig { min_zoom: 0.5, max_zoom: 3.0, ..CanvasConfig::default() };
    let mut vp = ViewportState::from_config(&cfg);
    vp.set_zoom(10.0, Point::ZERO);
    assert_eq!(vp.zoom(), 3.0);
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_by_moves_image() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.zoom_by(2.0, Point::new(400.0, 300.0));
    let before = vp.image_bounds_in_canvas();
    assert!(vp.pan_by(Point::new(50.0, -40.0)));
    let after = vp.image_bounds_in_canvas();
    assert!(approx_eq(after.x - before.x, 50.0));
    assert!(approx_eq(after.y - before.y, -40.0));
}

#[test]
fn pan_far_right_keeps_visibility_floor() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.pan_by(Point::new(10_000.0, 0.0));
    let b = vp.image_bounds_in_canvas();
    // 20% of the 800px displayed width must remain: left edge stops at 640.
    assert!(approx_eq(b.x, 640.0));
    assert_visibility_floor(&vp);
}

#[test]
fn pan_far_up_left_keeps_visibility_floor() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.pan_by(Point::new(-10_000.0, -10_000.0));
    let b = vp.image_bounds_in_canvas();
    assert!(approx_eq(b.right(), 160.0));
    assert!(approx_eq(b.bottom(), 120.0));
}

#[test]
fn pan_sequences_never_lose_the_image() {
    let deltas = [
        Point::new(5_000.0, 0.0),
        Point::new(-12_000.0, 300.0),
        Point::new(40.0, -9_000.0),
        Point::new(777.0, 777.0),
        Point::new(-1.0, 20_000.0),
    ];
    for zoom in [0.5, 1.0, 2.0, 4.0] {
        let mut vp = viewport((400, 300), (800.0, 600.0));
        vp.set_zoom(zoom, Point::new(400.0, 300.0));
        for d in deltas {
            vp.pan_by(d);
            assert_visibility_floor(&vp);
        }
    }
}

#[test]
fn pan_blocked_at_floor_reports_no_change() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.pan_by(Point::new(10_000.0, 0.0));
    assert!(!vp.pan_by(Point::new(100.0, 0.0)));
}

#[test]
fn pan_rejects_non_finite_delta() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    assert!(!vp.pan_by(Point::new(f64::INFINITY, 0.0)));
    assert_eq!(vp.pan(), Point::ZERO);
}

#[test]
fn zoom_out_at_edge_keeps_visibility_floor() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(4.0, Point::new(0.0, 0.0));
    vp.pan_by(Point::new(-10_000.0, -10_000.0));
    vp.zoom_by(0.1, Point::new(0.0, 0.0));
    assert_visibility_floor(&vp);
}

#[test]
fn reset_view_restores_identity() {
    let mut vp = viewport((400, 300), (800.0, 600.0));
    vp.set_zoom(2.5, Point::new(10.0, 10.0));
    vp.pan_by(Point::new(20.0, 20.0));
    assert!(vp.reset_view());
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::ZERO);
    assert!(!vp.reset_view());
}

// =============================================================
// Shared offset formula
// =============================================================

#[test]
fn bounds_zoom_and_transform_share_one_offset() {
    let mut vp = viewport((640, 480), (1000.0, 700.0));
    let steps: [(f64, Point, Point); 4] = [
        (1.0, Point::new(500.0, 350.0), Point::ZERO),
        (2.0, Point::new(120.0, 600.0), Point::new(-35.0, 12.0)),
        (0.5, Point::new(900.0, 10.0), Point::new(400.0, -250.0)),
        (3.7, Point::new(333.0, 444.0), Point::new(-90.0, 60.0)),
    ];
    for (zoom, focal, pan) in steps {
        vp.set_zoom(zoom, focal);
        vp.pan_by(pan);
        let tf = vp.transformer();
        let bounds = vp.image_bounds_in_canvas();
        let full = tf.image_rect_to_canvas(Rect::new(0.0, 0.0, 640.0, 480.0));
        assert!(bounds.approx_eq(&full, TOL));
        assert!(tf.image_to_canvas(Point::ZERO).approx_eq(vp.effective_offset(), TOL));
        assert!(bounds.origin().approx_eq(vp.effective_offset(), TOL));
    }
}
