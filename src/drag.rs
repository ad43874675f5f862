//! Drag / resize gesture sessions.
//!
//! DESIGN
//! ======
//! A [`DragSession`] is created at pointer-down and consumed at pointer-up.
//! It holds the block's geometry as it was when the gesture started plus the
//! total image-space movement since then. Every update recomputes the working
//! rectangle from that origin, so dragging past a boundary and back returns
//! the block to exactly where the pointer says it should be.
//!
//! The stored block is never touched while a session is live. The host reads
//! [`DragSession::current`] for drawing and commits the [`DragOutcome`]
//! returned by [`DragSession::finish`].

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::block::{BlockLimits, BlockPosition};
use crate::consts::EPSILON;
use crate::doc::{Block, BlockId};
use crate::geometry::Point;
use crate::hit::{HandleZone, classify};

/// One in-flight drag or resize of a single block.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    block_id: BlockId,
    zone: HandleZone,
    origin: BlockPosition,
    current: BlockPosition,
    accumulated: Point,
    image_width: f64,
    image_height: f64,
    min_size: f64,
}

/// Final geometry of a finished gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub block_id: BlockId,
    pub position: BlockPosition,
    /// False when the block ended where it started.
    pub changed: bool,
}

impl DragSession {
    /// Start a gesture on `block` in an already-known zone.
    #[must_use]
    pub fn new(block: &Block, zone: HandleZone, image_size: (u32, u32), limits: &BlockLimits) -> Self {
        let (w, h) = image_size;
        tracing::debug!(block_id = %block.id, ?zone, "drag session started");
        Self {
            block_id: block.id.clone(),
            zone,
            origin: block.position,
            current: block.position,
            accumulated: Point::ZERO,
            image_width: f64::from(w),
            image_height: f64::from(h),
            min_size: limits.min_size(),
        }
    }

    /// Classify `pointer` against `block` and start a gesture if it lands on
    /// the block or one of its handles. `handle` is in image units.
    #[must_use]
    pub fn begin(
        block: &Block,
        pointer: Point,
        handle: f64,
        image_size: (u32, u32),
        limits: &BlockLimits,
    ) -> Option<Self> {
        let zone = classify(&block.position, pointer, handle)?;
        Some(Self::new(block, zone, image_size, limits))
    }

    /// Apply one movement event (image-space delta) and return the new
    /// working geometry.
    pub fn update(&mut self, delta: Point) -> BlockPosition {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.accumulated += delta;
        }
        self.current = apply_drag(
            &self.origin,
            self.zone,
            self.accumulated,
            self.image_width,
            self.image_height,
            self.min_size,
        );
        self.current
    }

    /// End the gesture.
    #[must_use]
    pub fn finish(self) -> DragOutcome {
        let changed = !self.origin.rect().approx_eq(&self.current.rect(), EPSILON);
        DragOutcome { block_id: self.block_id, position: self.current, changed }
    }

    #[must_use]
    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    #[must_use]
    pub fn zone(&self) -> HandleZone {
        self.zone
    }

    /// Geometry at pointer-down.
    #[must_use]
    pub fn origin(&self) -> BlockPosition {
        self.origin
    }

    /// Working geometry after the latest update.
    #[must_use]
    pub fn current(&self) -> BlockPosition {
        self.current
    }

    #[must_use]
    pub fn accumulated(&self) -> Point {
        self.accumulated
    }
}

/// Move `origin` by `delta` according to `zone`, then restore the block
/// invariants.
///
/// Resizing keeps the opposite edge fixed and stops the moving edge at the
/// image edge or `min_size` away from the fixed edge, whichever comes first.
/// Body drags keep the size and slide the block along the image edges.
#[must_use]
pub fn apply_drag(
    origin: &BlockPosition,
    zone: HandleZone,
    delta: Point,
    image_width: f64,
    image_height: f64,
    min_size: f64,
) -> BlockPosition {
    let dx = if delta.x.is_finite() { delta.x } else { 0.0 };
    let dy = if delta.y.is_finite() { delta.y } else { 0.0 };

    let moved = if zone == HandleZone::Body {
        BlockPosition {
            x: translate_span(origin.x, origin.width, dx, image_width),
            y: translate_span(origin.y, origin.height, dy, image_height),
            ..*origin
        }
    } else {
        let (x, width) =
            resize_span(origin.x, origin.right(), dx, (zone.moves_left(), zone.moves_right()), image_width, min_size);
        let (y, height) =
            resize_span(origin.y, origin.bottom(), dy, (zone.moves_top(), zone.moves_bottom()), image_height, min_size);
        BlockPosition { x, y, width, height, shape: origin.shape }
    };

    moved.clamped(image_width, image_height, min_size)
}

fn translate_span(start: f64, len: f64, delta: f64, extent: f64) -> f64 {
    let moved = start + delta;
    if extent <= 0.0 {
        return moved;
    }
    moved.min(extent - len).max(0.0)
}

fn resize_span(start: f64, end: f64, delta: f64, moves: (bool, bool), extent: f64, min_size: f64) -> (f64, f64) {
    let (moves_start, moves_end) = moves;
    let bounded = extent > 0.0;
    let mut start = start;
    let mut end = end;

    if moves_start {
        start += delta;
        if bounded {
            start = start.max(0.0);
        }
        start = start.min(end - min_size);
    }
    if moves_end {
        end += delta;
        if bounded {
            end = end.min(extent);
        }
        end = end.max(start + min_size);
    }
    (start, end - start)
}
