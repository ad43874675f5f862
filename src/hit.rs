//! Handle-zone classification for a single block, and top-most hit-testing
//! across the block store.
//!
//! Zones are checked in a fixed order: corners, then single edges, then the
//! body. A pointer inside the handle band of two perpendicular edges is
//! therefore always a corner. On blocks narrower than two handle widths both
//! opposite edges can be in range; the nearer one wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::block::BlockPosition;
use crate::doc::{BlockId, BlockStore};
use crate::geometry::Point;

/// Which part of a block the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleZone {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Left,
    Right,
    Bottom,
    Body,
}

impl HandleZone {
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft | Self::Left)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight | Self::Right)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::Top)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight | Self::Bottom)
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight)
    }

    /// CSS cursor name for hovering or dragging this zone.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft | Self::BottomRight => "nwse-resize",
            Self::TopRight | Self::BottomLeft => "nesw-resize",
            Self::Top | Self::Bottom => "ns-resize",
            Self::Left | Self::Right => "ew-resize",
            Self::Body => "move",
        }
    }
}

/// Classify `pointer` (image space) against `block`.
///
/// `handle` is the hit slop in image units, normally
/// `Transformer::canvas_distance_to_image(handle_size_px)`. Returns `None`
/// when the pointer is outside both the block and its handle band.
#[must_use]
pub fn classify(block: &BlockPosition, pointer: Point, handle: f64) -> Option<HandleZone> {
    let handle = if handle.is_finite() { handle.max(0.0) } else { 0.0 };
    let rx = pointer.x - block.x;
    let ry = pointer.y - block.y;
    let (w, h) = (block.width, block.height);

    let in_band_x = rx >= -handle && rx <= w + handle;
    let in_band_y = ry >= -handle && ry <= h + handle;
    if !(in_band_x && in_band_y) {
        return None;
    }

    let (left, right) = nearer_edges(rx, w, handle);
    let (top, bottom) = nearer_edges(ry, h, handle);

    let zone = match (top, bottom, left, right) {
        (true, _, true, _) => HandleZone::TopLeft,
        (true, _, _, true) => HandleZone::TopRight,
        (_, true, true, _) => HandleZone::BottomLeft,
        (_, true, _, true) => HandleZone::BottomRight,
        (true, ..) => HandleZone::Top,
        (_, true, ..) => HandleZone::Bottom,
        (_, _, true, _) => HandleZone::Left,
        (_, _, _, true) => HandleZone::Right,
        _ if block.contains(pointer) => HandleZone::Body,
        _ => return None,
    };
    Some(zone)
}

/// Near-start / near-end flags along one axis, keeping at most one of them.
fn nearer_edges(rel: f64, len: f64, handle: f64) -> (bool, bool) {
    let d_start = rel.abs();
    let d_end = (rel - len).abs();
    match (d_start <= handle, d_end <= handle) {
        (true, true) => (d_start <= d_end, d_start > d_end),
        flags => flags,
    }
}

/// Result of a hit test against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub block_id: BlockId,
    pub zone: HandleZone,
}

/// Find the block under `pointer` (image space).
///
/// The selected block is tested first so its handles win over overlapping
/// neighbors; the rest are tested top-most first. Hidden blocks are skipped.
#[must_use]
pub fn hit_test(pointer: Point, store: &BlockStore, handle: f64, selected: Option<&str>) -> Option<Hit> {
    if let Some(block) = selected.and_then(|id| store.get(id)) {
        if block.visible {
            if let Some(zone) = classify(&block.position, pointer, handle) {
                return Some(Hit { block_id: block.id.clone(), zone });
            }
        }
    }

    store
        .sorted_blocks()
        .into_iter()
        .rev()
        .filter(|b| b.visible && Some(b.id.as_str()) != selected)
        .find_map(|b| classify(&b.position, pointer, handle).map(|zone| Hit { block_id: b.id.clone(), zone }))
}
