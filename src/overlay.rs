//! Drawable overlays and the ordered set that holds them.
//!
//! DESIGN
//! ======
//! An [`Overlay`] is a closed set of drawable kinds sharing one capability
//! set: `id`, `is_visible`, `render_order` and `render`. Adding a kind means
//! adding a variant.
//!
//! [`OverlaySet`] is an ordered map keyed by `(kind, id)`, so a block's
//! outline and its label share the block id without colliding with any other
//! block's overlays. It keeps insertion order;
//! replacing an entry keeps its slot, so ties in render order always resolve
//! to first-inserted-first-drawn. It does no geometry. Overlays are transient
//! views rebuilt from the [`BlockStore`] whenever blocks or selection change.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::block::BlockPosition;
use crate::consts::LABEL_GAP_PX;
use crate::doc::{Block, BlockId, BlockStore};
use crate::geometry::Point;
use crate::render::{self, DrawCommand};
use crate::transform::Transformer;
use crate::viewport::ViewportState;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("{kind:?} overlay id already present: {id}")]
    DuplicateId { kind: OverlayKind, id: String },
}

/// Variant tag; half of an overlay's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Block,
    Label,
}

/// Outline (and handles, when selected) for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockOverlay {
    pub id: BlockId,
    pub position: BlockPosition,
    pub render_order: i64,
    pub visible: bool,
    pub selected: bool,
}

/// Text drawn just above a block's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOverlay {
    /// Id of the labelled block.
    pub id: BlockId,
    /// Block top-left in image space.
    pub anchor: Point,
    /// Text box width in image space; follows the block width.
    pub max_width: f64,
    pub text: String,
    pub render_order: i64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Block(BlockOverlay),
    Label(LabelOverlay),
}

impl Overlay {
    #[must_use]
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Block(_) => OverlayKind::Block,
            Self::Label(_) => OverlayKind::Label,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Block(b) => &b.id,
            Self::Label(l) => &l.id,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Block(b) => b.visible,
            Self::Label(l) => l.visible,
        }
    }

    #[must_use]
    pub fn render_order(&self) -> i64 {
        match self {
            Self::Block(b) => b.render_order,
            Self::Label(l) => l.render_order,
        }
    }

    /// Canvas-space draw commands for this overlay. Empty on a degenerate
    /// viewport.
    #[must_use]
    pub fn render(&self, viewport: &ViewportState, transformer: &Transformer) -> Vec<DrawCommand> {
        if viewport.is_degenerate() || !transformer.is_active() {
            return Vec::new();
        }
        match self {
            Self::Block(b) => {
                let bounds = transformer.image_rect_to_canvas(b.position.rect());
                render::block_commands(bounds, b.position.shape, b.selected)
            }
            Self::Label(l) => {
                let anchor = transformer.image_to_canvas(l.anchor) - Point::new(0.0, LABEL_GAP_PX);
                let max_width = transformer.image_distance_to_canvas(l.max_width);
                vec![render::label_command(anchor, max_width, &l.text)]
            }
        }
    }
}

/// Ordered overlay collection keyed by `(kind, id)`.
#[derive(Debug, Clone, Default)]
pub struct OverlaySet {
    entries: Vec<Overlay>,
}

impl OverlaySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays for every block in the store, bottom first, with the
    /// selected block flagged.
    #[must_use]
    pub fn from_blocks(store: &BlockStore, selected: Option<&str>) -> Self {
        let mut set = Self::new();
        for block in store.sorted_blocks() {
            set.sync_block(block, selected == Some(block.id.as_str()));
        }
        set
    }

    /// Upsert the overlays derived from one block: its outline, and its label
    /// when it has one. A block without a label loses any stale label overlay.
    pub fn sync_block(&mut self, block: &Block, selected: bool) {
        self.upsert(Overlay::Block(BlockOverlay {
            id: block.id.clone(),
            position: block.position,
            render_order: block.z_index,
            visible: block.visible,
            selected,
        }));
        match &block.label {
            Some(text) => {
                self.upsert(Overlay::Label(LabelOverlay {
                    id: block.id.clone(),
                    anchor: Point::new(block.position.x, block.position.y),
                    max_width: block.position.width,
                    text: text.clone(),
                    render_order: block.z_index,
                    visible: block.visible,
                }));
            }
            None => {
                self.remove(OverlayKind::Label, &block.id);
            }
        }
    }

    /// Insert or replace by key. A replaced entry keeps its slot.
    pub fn upsert(&mut self, entry: Overlay) -> Option<Overlay> {
        match self.position_of(entry.kind(), entry.id()) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Insert a new entry, refusing keys that are already present.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::DuplicateId`] if an overlay of the same kind
    /// already uses the id.
    pub fn insert(&mut self, entry: Overlay) -> Result<(), OverlayError> {
        if self.position_of(entry.kind(), entry.id()).is_some() {
            return Err(OverlayError::DuplicateId { kind: entry.kind(), id: entry.id().to_owned() });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn remove(&mut self, kind: OverlayKind, id: &str) -> Option<Overlay> {
        self.position_of(kind, id).map(|i| self.entries.remove(i))
    }

    /// Remove every entry matching `pred`; returns how many were removed.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&Overlay) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(e));
        before - self.entries.len()
    }

    #[must_use]
    pub fn get(&self, kind: OverlayKind, id: &str) -> Option<&Overlay> {
        self.position_of(kind, id).map(|i| &self.entries[i])
    }

    /// Entries matching `pred`, in insertion order.
    pub fn filter<F>(&self, pred: F) -> Vec<&Overlay>
    where
        F: Fn(&Overlay) -> bool,
    {
        self.entries.iter().filter(|&e| pred(e)).collect()
    }

    #[must_use]
    pub fn visible_entries(&self) -> Vec<&Overlay> {
        self.filter(Overlay::is_visible)
    }

    /// All entries sorted by render order, lowest first. Stable: equal orders
    /// keep insertion order.
    #[must_use]
    pub fn all_sorted_by_render_order(&self) -> Vec<&Overlay> {
        let mut sorted: Vec<&Overlay> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.render_order());
        sorted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the whole set. Later duplicates replace earlier ones in place.
    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Overlay>,
    {
        self.entries.clear();
        for entry in entries {
            self.upsert(entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position_of(&self, kind: OverlayKind, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.kind() == kind && e.id() == id)
    }
}
