//! Viewport state: how the loaded image sits inside the canvas.
//!
//! DESIGN
//! ======
//! The image is first fitted into the canvas (aspect-preserving, centered),
//! then zoomed about the canvas center and finally translated by `pan`.
//! Every mapping from image space to canvas space therefore has the form
//! `p * fit_scale * zoom + effective_offset()`, and `effective_offset` is the
//! single place that combines fit offset, zoom-about-center and pan. The
//! transformer, the zoom-about-focal-point solver, the pan clamp and the
//! on-canvas image bounds all go through it.
//!
//! Degenerate inputs (no image, zero-area canvas) never divide: fit scale is
//! pinned to 1, fit offset to the origin, and display size to zero.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::config::{CanvasConfig, ConfigError};
use crate::consts::{EPSILON, ZOOM_STEP};
use crate::geometry::{Point, Rect};
use crate::transform::Transformer;

/// Fit, zoom and pan state for one canvas instance.
#[derive(Debug, Clone)]
pub struct ViewportState {
    image_width: u32,
    image_height: u32,
    canvas_width: f64,
    canvas_height: f64,
    fit_scale: f64,
    fit_offset: Point,
    zoom: f64,
    pan: Point,
    min_zoom: f64,
    max_zoom: f64,
    min_visible_fraction: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl ViewportState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport using the zoom range and visibility floor from `config`.
    ///
    /// The config is assumed validated; see [`CanvasConfig::validate`].
    #[must_use]
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            image_width: 0,
            image_height: 0,
            canvas_width: 0.0,
            canvas_height: 0.0,
            fit_scale: 1.0,
            fit_offset: Point::ZERO,
            zoom: 1.0,
            pan: Point::ZERO,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            min_visible_fraction: config.min_visible_fraction,
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    #[must_use]
    pub fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    #[must_use]
    pub fn fit_offset(&self) -> Point {
        self.fit_offset
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    #[must_use]
    pub fn min_visible_fraction(&self) -> f64 {
        self.min_visible_fraction
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_width > 0 && self.image_height > 0
    }

    /// True when either the image or the canvas has zero area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.has_image() || self.canvas_width <= 0.0 || self.canvas_height <= 0.0
    }

    /// Combined image-to-canvas scale factor (`fit_scale * zoom`).
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.fit_scale * self.zoom
    }

    #[must_use]
    pub fn canvas_center(&self) -> Point {
        Point::new(self.canvas_width * 0.5, self.canvas_height * 0.5)
    }

    /// Fitted image size at zoom 1, rounded to whole pixels for layout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_size(&self) -> (u32, u32) {
        if self.is_degenerate() {
            return (0, 0);
        }
        let w = (f64::from(self.image_width) * self.fit_scale).round().max(0.0);
        let h = (f64::from(self.image_height) * self.fit_scale).round().max(0.0);
        (w as u32, h as u32)
    }

    /// Canvas position of image pixel (0, 0) under the current fit, zoom and pan.
    ///
    /// The fitted image is scaled by `zoom` about the canvas center, so the
    /// fit offset moves toward or away from the center by the same factor:
    /// `center + (fit_offset - center) * zoom + pan`.
    #[must_use]
    pub fn effective_offset(&self) -> Point {
        if self.is_degenerate() {
            return Point::ZERO;
        }
        let center = self.canvas_center();
        center + (self.fit_offset - center) * self.zoom + self.pan
    }

    /// Snapshot transformer for the current state.
    #[must_use]
    pub fn transformer(&self) -> Transformer {
        Transformer::new(self)
    }

    /// The displayed rectangle of the whole image, in canvas space.
    #[must_use]
    pub fn image_bounds_in_canvas(&self) -> Rect {
        self.transformer().image_bounds_in_canvas()
    }

    // --- Mutations ---

    /// Replace the image dimensions.
    ///
    /// Loading an image with different dimensions resets zoom and pan; loading
    /// one with identical dimensions leaves the view untouched. Returns
    /// whether anything changed.
    pub fn set_image(&mut self, width: u32, height: u32) -> bool {
        if (self.image_width, self.image_height) == (width, height) {
            return false;
        }
        self.image_width = width;
        self.image_height = height;
        self.zoom = 1.0;
        self.pan = Point::ZERO;
        self.recompute_fit();
        tracing::debug!(width, height, fit_scale = self.fit_scale, "image dimensions changed");
        true
    }

    /// Replace the canvas dimensions. Zoom and pan are kept; pan is re-clamped.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> bool {
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        if (self.canvas_width - width).abs() < EPSILON && (self.canvas_height - height).abs() < EPSILON {
            return false;
        }
        self.canvas_width = width;
        self.canvas_height = height;
        self.recompute_fit();
        self.clamp_pan();
        tracing::debug!(width, height, fit_scale = self.fit_scale, "canvas resized");
        true
    }

    /// Multiply the zoom level, keeping the image pixel under `focal` stationary.
    pub fn zoom_by(&mut self, factor: f64, focal: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.set_zoom(self.zoom * factor, focal)
    }

    /// Set the zoom level, keeping the image pixel under `focal` stationary.
    ///
    /// The value is clamped to the configured zoom range. A non-finite focal
    /// point falls back to the canvas center.
    pub fn set_zoom(&mut self, value: f64, focal: Point) -> bool {
        if !value.is_finite() {
            return false;
        }
        let new_zoom = value.max(self.min_zoom).min(self.max_zoom);
        if (new_zoom - self.zoom).abs() < EPSILON {
            return false;
        }

        if self.is_degenerate() {
            self.zoom = new_zoom;
            return true;
        }

        let focal = if focal.x.is_finite() && focal.y.is_finite() { focal } else { self.canvas_center() };
        let anchor = self.transformer().canvas_to_image(focal);

        self.zoom = new_zoom;

        // Solve focal = anchor * scale + center + (fit_offset - center) * zoom + pan for pan.
        let center = self.canvas_center();
        let without_pan = anchor * self.scale() + center + (self.fit_offset - center) * self.zoom;
        self.pan = focal - without_pan;
        self.clamp_pan();

        tracing::debug!(zoom = self.zoom, pan_x = self.pan.x, pan_y = self.pan.y, "zoom changed");
        true
    }

    pub fn zoom_in(&mut self, focal: Point) -> bool {
        self.zoom_by(ZOOM_STEP, focal)
    }

    pub fn zoom_out(&mut self, focal: Point) -> bool {
        self.zoom_by(1.0 / ZOOM_STEP, focal)
    }

    /// Translate the displayed image by a canvas-space delta, then re-clamp.
    pub fn pan_by(&mut self, delta: Point) -> bool {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return false;
        }
        let before = self.pan;
        self.pan += delta;
        self.clamp_pan();
        !self.pan.approx_eq(before, EPSILON)
    }

    /// Return to zoom 1 with no pan.
    pub fn reset_view(&mut self) -> bool {
        let changed = (self.zoom - 1.0).abs() > EPSILON || !self.pan.approx_eq(Point::ZERO, EPSILON);
        self.zoom = 1.0;
        self.pan = Point::ZERO;
        changed
    }

    /// Change the allowed zoom range and pull the current zoom inside it.
    ///
    /// # Errors
    ///
    /// Returns `Err` unless `0 < min <= max` and both are finite.
    pub fn set_zoom_limits(&mut self, min: f64, max: f64) -> Result<(), ConfigError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidZoomRange { min, max });
        }
        self.min_zoom = min;
        self.max_zoom = max;
        let clamped = self.zoom.max(min).min(max);
        if (clamped - self.zoom).abs() > EPSILON {
            let center = self.canvas_center();
            self.set_zoom(clamped, center);
        }
        Ok(())
    }

    // --- Internals ---

    fn recompute_fit(&mut self) {
        if self.is_degenerate() {
            self.fit_scale = 1.0;
            self.fit_offset = Point::ZERO;
            return;
        }
        let image_w = f64::from(self.image_width);
        let image_h = f64::from(self.image_height);
        self.fit_scale = (self.canvas_width / image_w).min(self.canvas_height / image_h);

        let (display_w, display_h) = self.display_size();
        self.fit_offset = Point::new(
            (self.canvas_width - f64::from(display_w)) * 0.5,
            (self.canvas_height - f64::from(display_h)) * 0.5,
        );
    }

    /// Shift `pan` so at least `min_visible_fraction` of the displayed image
    /// stays inside the canvas on each axis.
    ///
    /// When that fraction is wider than the canvas itself, the requirement
    /// becomes "the image covers the whole canvas axis".
    fn clamp_pan(&mut self) {
        if self.is_degenerate() {
            return;
        }
        let bounds = self.image_bounds_in_canvas();
        let fraction = self.min_visible_fraction;
        let x = clamp_axis(bounds.x, bounds.width, self.canvas_width, fraction);
        let y = clamp_axis(bounds.y, bounds.height, self.canvas_height, fraction);
        let correction = Point::new(x - bounds.x, y - bounds.y);
        if !correction.approx_eq(Point::ZERO, EPSILON) {
            tracing::debug!(dx = correction.x, dy = correction.y, "pan clamped");
            self.pan += correction;
        }
    }
}

/// Clamp the leading edge of a displayed span so `keep` pixels stay on-canvas.
fn clamp_axis(start: f64, displayed: f64, canvas: f64, fraction: f64) -> f64 {
    let keep = (displayed * fraction).min(canvas);
    let lowest = keep - displayed;
    let highest = canvas - keep;
    start.max(lowest).min(highest)
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
