//! Block geometry in image space: position, shape, limits and bounds clamping.
//!
//! A block may transiently violate its invariants (a host can construct any
//! rectangle); [`BlockPosition::clamped`] restores them:
//! `width, height >= min_size`, `x, y >= 0`, and the far edges inside the image.

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::consts::{EPSILON, HANDLE_SIZE_PX, MIN_BLOCK_SIZE};
use crate::geometry::{Point, Rect};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BlockError {
    #[error("minimum block size must be positive and finite, got {0}")]
    InvalidMinimumSize(f64),
    #[error("handle size must be positive and finite, got {0}")]
    InvalidHandleSize(f64),
}

/// Outline drawn for a block and used for body hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockShape {
    /// Axis-aligned rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Oval,
}

/// Geometry of one block, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub shape: BlockShape,
}

impl BlockPosition {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, shape: BlockShape) -> Self {
        Self { x, y, width, height, shape }
    }

    #[must_use]
    pub fn from_rect(rect: Rect, shape: BlockShape) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height, shape)
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `p` lies inside the block's outline (ellipse equation for ovals).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self.shape {
            BlockShape::Rectangle => self.rect().contains(p),
            BlockShape::Oval => {
                let rx = self.width * 0.5;
                let ry = self.height * 0.5;
                if rx <= EPSILON || ry <= EPSILON {
                    return false;
                }
                let c = self.center();
                let nx = (p.x - c.x) / rx;
                let ny = (p.y - c.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
        }
    }

    /// Restore the block invariants against an image of the given size.
    ///
    /// Size is raised to `min_size` first, then the origin is pulled to the
    /// image origin and the far edges are trimmed to the image edges. Trimming
    /// never takes a dimension below `min_size`; if the image itself is smaller
    /// than that, the block is pinned to the origin instead. Non-positive image
    /// extents mean "no image" and skip the bounds step.
    #[must_use]
    pub fn clamped(&self, image_width: f64, image_height: f64, min_size: f64) -> Self {
        let (x, width) = clamp_span(self.x, self.width, image_width, min_size);
        let (y, height) = clamp_span(self.y, self.height, image_height, min_size);
        Self { x, y, width, height, shape: self.shape }
    }

    /// Whether the invariants hold within tolerance.
    #[must_use]
    pub fn is_within(&self, image_width: f64, image_height: f64, min_size: f64) -> bool {
        self.width >= min_size - EPSILON
            && self.height >= min_size - EPSILON
            && self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.right() <= image_width + EPSILON
            && self.bottom() <= image_height + EPSILON
    }
}

fn clamp_span(start: f64, len: f64, extent: f64, min_size: f64) -> (f64, f64) {
    let mut len = if len.is_finite() { len.max(min_size) } else { min_size };
    let mut start = if start.is_finite() { start } else { 0.0 };
    if extent <= 0.0 {
        return (start, len);
    }
    start = start.max(0.0);
    if start + len > extent {
        len = (extent - start).max(min_size);
        if start + len > extent {
            start = (extent - len).max(0.0);
        }
    }
    (start, len)
}

/// Size limits applied to every block mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLimits {
    min_size: f64,
    handle_size_px: f64,
}

impl Default for BlockLimits {
    fn default() -> Self {
        Self { min_size: MIN_BLOCK_SIZE, handle_size_px: HANDLE_SIZE_PX }
    }
}

impl BlockLimits {
    /// `min_size` is in image pixels, `handle_size_px` in canvas pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either value is non-positive or non-finite.
    pub fn new(min_size: f64, handle_size_px: f64) -> Result<Self, BlockError> {
        if !(min_size.is_finite() && min_size > 0.0) {
            return Err(BlockError::InvalidMinimumSize(min_size));
        }
        if !(handle_size_px.is_finite() && handle_size_px > 0.0) {
            return Err(BlockError::InvalidHandleSize(handle_size_px));
        }
        Ok(Self { min_size, handle_size_px })
    }

    /// # Errors
    ///
    /// Same as [`BlockLimits::new`].
    pub fn from_config(config: &CanvasConfig) -> Result<Self, BlockError> {
        Self::new(config.min_block_size, config.handle_size_px)
    }

    #[must_use]
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    #[must_use]
    pub fn handle_size_px(&self) -> f64 {
        self.handle_size_px
    }
}
