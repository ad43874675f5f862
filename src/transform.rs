//! Image-space / canvas-space conversions.
//!
//! A [`Transformer`] is a `Copy` snapshot of one [`ViewportState`]; build a
//! fresh one after every viewport mutation. All offsets come from
//! [`ViewportState::effective_offset`] so the conversions here agree exactly
//! with the viewport's own zoom and pan math.
//!
//! On a degenerate viewport (no image, or a zero-area canvas) every point
//! conversion returns the origin and every distance conversion returns zero.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::EPSILON;
use crate::geometry::{Point, Rect};
use crate::viewport::ViewportState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    scale: f64,
    offset: Point,
    image_width: f64,
    image_height: f64,
    active: bool,
}

impl Transformer {
    #[must_use]
    pub fn new(viewport: &ViewportState) -> Self {
        let (w, h) = viewport.image_size();
        let scale = viewport.scale();
        Self {
            scale,
            offset: viewport.effective_offset(),
            image_width: f64::from(w),
            image_height: f64::from(h),
            active: !viewport.is_degenerate() && scale.is_finite() && scale > EPSILON,
        }
    }

    /// Combined `fit_scale * zoom` factor; zero when inactive.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.active { self.scale } else { 0.0 }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    // --- Points ---

    #[must_use]
    pub fn image_to_canvas(&self, p: Point) -> Point {
        if !self.active {
            return Point::ZERO;
        }
        p * self.scale + self.offset
    }

    #[must_use]
    pub fn canvas_to_image(&self, p: Point) -> Point {
        if !self.active {
            return Point::ZERO;
        }
        (p - self.offset) * (1.0 / self.scale)
    }

    // --- Rectangles ---

    #[must_use]
    pub fn image_rect_to_canvas(&self, r: Rect) -> Rect {
        Rect::from_corners(self.image_to_canvas(r.origin()), self.image_to_canvas(r.bottom_right()))
    }

    #[must_use]
    pub fn canvas_rect_to_image(&self, r: Rect) -> Rect {
        Rect::from_corners(self.canvas_to_image(r.origin()), self.canvas_to_image(r.bottom_right()))
    }

    // --- Distances ---

    #[must_use]
    pub fn image_distance_to_canvas(&self, d: f64) -> f64 {
        if !self.active {
            return 0.0;
        }
        d * self.scale
    }

    #[must_use]
    pub fn canvas_distance_to_image(&self, d: f64) -> f64 {
        if !self.active {
            return 0.0;
        }
        d / self.scale
    }

    /// Convert a canvas-space displacement (no translation) to image space.
    #[must_use]
    pub fn canvas_delta_to_image(&self, delta: Point) -> Point {
        if !self.active {
            return Point::ZERO;
        }
        delta * (1.0 / self.scale)
    }

    // --- Bounds ---

    #[must_use]
    pub fn is_point_in_image_bounds(&self, p: Point) -> bool {
        self.active && p.x >= 0.0 && p.y >= 0.0 && p.x <= self.image_width && p.y <= self.image_height
    }

    #[must_use]
    pub fn is_rect_in_image_bounds(&self, r: Rect) -> bool {
        self.active
            && r.x >= -EPSILON
            && r.y >= -EPSILON
            && r.right() <= self.image_width + EPSILON
            && r.bottom() <= self.image_height + EPSILON
    }

    #[must_use]
    pub fn clamp_point_to_image_bounds(&self, p: Point) -> Point {
        if !self.active {
            return Point::ZERO;
        }
        Point::new(p.x.max(0.0).min(self.image_width), p.y.max(0.0).min(self.image_height))
    }

    /// The displayed rectangle of the whole image in canvas space.
    #[must_use]
    pub fn image_bounds_in_canvas(&self) -> Rect {
        if !self.active {
            return Rect::default();
        }
        Rect::new(self.offset.x, self.offset.y, self.image_width * self.scale, self.image_height * self.scale)
    }
}
