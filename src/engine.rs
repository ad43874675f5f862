//! Host-facing engine: wires pointer input, the viewport and the block store
//! together and reports every observable change as an [`Action`].
//!
//! DESIGN
//! ======
//! The engine is the on-change contract between the geometry core and the
//! presentation layer. Every mutator returns `Vec<Action>`; the host applies
//! them (persist a block, swap the cursor, schedule a redraw) and never reads
//! engine internals to discover what changed.
//!
//! During a drag the stored block is untouched. The overlay for that block
//! shows the session's working copy, and the store is written once, at
//! pointer-up, together with the single [`Action::BlockGeometryFinalized`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::block::{BlockError, BlockLimits, BlockPosition, BlockShape};
use crate::config::{CanvasConfig, ConfigError};
use crate::consts::{EPSILON, ZOOM_STEP};
use crate::doc::{Block, BlockId, BlockStore};
use crate::drag::DragSession;
use crate::geometry::{Point, Rect};
use crate::hit::hit_test;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::overlay::OverlaySet;
use crate::render::{self, DrawCommand};
use crate::transform::Transformer;
use crate::viewport::ViewportState;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_GRABBING: &str = "grabbing";
const CURSOR_CROSSHAIR: &str = "crosshair";

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Something visible changed; redraw from [`EngineCore::scene`].
    RenderNeeded,
    /// Zoom, pan or fit changed.
    ViewChanged { zoom: f64, pan: Point },
    SelectionChanged(Option<BlockId>),
    BlockCreated(Block),
    /// A drag or resize finished with new geometry. Emitted once per gesture.
    BlockGeometryFinalized { id: BlockId, position: BlockPosition },
    BlockRemoved { id: BlockId },
    SetCursor(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// Engine state for one canvas.
#[derive(Debug, Clone)]
pub struct EngineCore {
    viewport: ViewportState,
    doc: BlockStore,
    overlays: OverlaySet,
    ui: UiState,
    input: InputState,
    limits: BlockLimits,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            viewport: ViewportState::new(),
            doc: BlockStore::new(),
            overlays: OverlaySet::new(),
            ui: UiState::default(),
            input: InputState::default(),
            limits: BlockLimits::default(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a host config.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the config fails validation.
    pub fn with_config(config: &CanvasConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let limits = BlockLimits::from_config(config)?;
        Ok(Self { viewport: ViewportState::from_config(config), limits, ..Self::default() })
    }

    // --- Viewport ---

    /// A new image was decoded. Drops any gesture and re-clamps blocks to the
    /// new bounds when the dimensions actually changed.
    pub fn set_image(&mut self, width: u32, height: u32) -> Vec<Action> {
        if !self.viewport.set_image(width, height) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        let blocks: Vec<Block> = self.doc.sorted_blocks().into_iter().cloned().collect();
        for block in blocks {
            let clamped = self.clamp_to_image(block.position);
            self.doc.set_position(&block.id, clamped);
        }
        self.refresh_overlays();
        view_actions(&self.viewport, true)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        let changed = self.viewport.set_canvas_size(width, height);
        view_actions(&self.viewport, changed)
    }

    pub fn zoom_by(&mut self, factor: f64, focal: Point) -> Vec<Action> {
        let changed = self.viewport.zoom_by(factor, focal);
        view_actions(&self.viewport, changed)
    }

    pub fn set_zoom(&mut self, value: f64, focal: Point) -> Vec<Action> {
        let changed = self.viewport.set_zoom(value, focal);
        view_actions(&self.viewport, changed)
    }

    pub fn pan_by(&mut self, delta: Point) -> Vec<Action> {
        let changed = self.viewport.pan_by(delta);
        view_actions(&self.viewport, changed)
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        let changed = self.viewport.reset_view();
        view_actions(&self.viewport, changed)
    }

    // --- Blocks ---

    /// Replace every block with a host snapshot. Selection and an in-flight
    /// drag survive only if their block is still present.
    pub fn load_blocks(&mut self, blocks: Vec<Block>) -> Vec<Action> {
        let blocks: Vec<Block> = blocks
            .into_iter()
            .map(|b| Block { position: self.clamp_to_image(b.position), ..b })
            .collect();
        self.doc.load_snapshot(blocks);

        let mut actions = Vec::new();
        self.drop_stale_gesture();
        if let Some(id) = &self.ui.selected_id {
            if self.doc.get(id).is_none() {
                self.ui.selected_id = None;
                actions.push(Action::SelectionChanged(None));
            }
        }
        self.refresh_overlays();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Insert or replace one block, clamped to the image.
    pub fn upsert_block(&mut self, block: Block) -> Vec<Action> {
        let position = self.clamp_to_image(block.position);
        self.doc.insert(Block { position, ..block });
        self.refresh_overlays();
        vec![Action::RenderNeeded]
    }

    pub fn remove_block(&mut self, id: &str) -> Vec<Action> {
        let Some(removed) = self.doc.remove(id) else {
            return Vec::new();
        };
        tracing::debug!(block_id = %removed.id, "block removed");
        let mut actions = vec![Action::BlockRemoved { id: removed.id }];
        if self.ui.selected_id.as_deref() == Some(id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        self.drop_stale_gesture();
        self.refresh_overlays();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Create a block from a canvas-space rectangle, select it and place it
    /// above every existing block. Does nothing without an image.
    pub fn create_block(&mut self, shape: BlockShape, canvas_rect: Rect) -> Vec<Action> {
        let transformer = self.viewport.transformer();
        if !transformer.is_active() {
            return Vec::new();
        }
        self.insert_new_block(shape, transformer.canvas_rect_to_image(canvas_rect))
    }

    /// Select a block by id, or clear the selection with `None`. Unknown ids
    /// are ignored.
    pub fn select(&mut self, id: Option<&str>) -> Vec<Action> {
        if id.is_some_and(|id| self.doc.get(id).is_none()) {
            return Vec::new();
        }
        if self.ui.selected_id.as_deref() == id {
            return Vec::new();
        }
        self.ui.selected_id = id.map(str::to_owned);
        self.refresh_overlays();
        vec![Action::SelectionChanged(self.ui.selected_id.clone()), Action::RenderNeeded]
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, canvas_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => {
                self.input = InputState::Panning { button, last_canvas: canvas_pt };
                vec![Action::SetCursor(CURSOR_GRABBING)]
            }
            Button::Primary => match self.ui.tool.shape() {
                Some(shape) => self.begin_drawing(shape, canvas_pt),
                None => self.begin_select(canvas_pt),
            },
        }
    }

    pub fn on_pointer_move(&mut self, canvas_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return vec![Action::SetCursor(self.hover_cursor(canvas_pt))];
        }
        let transformer = self.viewport.transformer();
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_canvas, .. } => {
                let delta = canvas_pt - *last_canvas;
                *last_canvas = canvas_pt;
                let changed = self.viewport.pan_by(delta);
                view_actions(&self.viewport, changed)
            }
            InputState::Dragging { session, last_canvas } => {
                let delta = transformer.canvas_delta_to_image(canvas_pt - *last_canvas);
                *last_canvas = canvas_pt;
                let position = session.update(delta);
                if let Some(block) = self.doc.get(session.block_id()) {
                    self.overlays.sync_block(&Block { position, ..block.clone() }, true);
                }
                vec![Action::RenderNeeded]
            }
            InputState::DrawingBlock { current_image, .. } => {
                *current_image = transformer.clamp_point_to_image_bounds(transformer.canvas_to_image(canvas_pt));
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Ends the gesture when the button that started it is released; other
    /// releases are ignored.
    pub fn on_pointer_up(&mut self, canvas_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.button() != Some(button) {
            return Vec::new();
        }
        let transformer = self.viewport.transformer();
        let mut actions = match std::mem::take(&mut self.input) {
            InputState::Idle => return Vec::new(),
            InputState::Panning { .. } => Vec::new(),
            InputState::Dragging { mut session, last_canvas } => {
                session.update(transformer.canvas_delta_to_image(canvas_pt - last_canvas));
                self.commit_drag(session)
            }
            InputState::DrawingBlock { shape, anchor_image, .. } => {
                let current = transformer.clamp_point_to_image_bounds(transformer.canvas_to_image(canvas_pt));
                let rect = Rect::from_corners(anchor_image, current);
                if rect.width <= EPSILON || rect.height <= EPSILON {
                    vec![Action::RenderNeeded]
                } else {
                    self.insert_new_block(shape, rect)
                }
            }
        };
        actions.push(Action::SetCursor(self.hover_cursor(canvas_pt)));
        actions
    }

    /// Abandon the current gesture without committing anything. A drag
    /// snaps back to the stored geometry.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => vec![Action::SetCursor(CURSOR_DEFAULT)],
            InputState::Dragging { session, .. } => {
                tracing::debug!(block_id = %session.block_id(), "drag cancelled");
                self.refresh_overlays();
                vec![Action::RenderNeeded, Action::SetCursor(CURSOR_DEFAULT)]
            }
            InputState::DrawingBlock { .. } => vec![Action::RenderNeeded, Action::SetCursor(CURSOR_DEFAULT)],
        }
    }

    /// Wheel zooms about the pointer (`dy < 0` zooms in); with shift held it
    /// pans instead. Ignored while a block is being dragged.
    pub fn on_wheel(&mut self, canvas_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if matches!(self.input, InputState::Dragging { .. }) {
            return Vec::new();
        }
        if modifiers.shift {
            return self.pan_by(Point::new(-delta.dx, -delta.dy));
        }
        if delta.dy < 0.0 {
            self.zoom_by(ZOOM_STEP, canvas_pt)
        } else if delta.dy > 0.0 {
            self.zoom_by(1.0 / ZOOM_STEP, canvas_pt)
        } else {
            Vec::new()
        }
    }

    /// `Escape` cancels the gesture (or clears the selection when idle);
    /// `Delete` / `Backspace` remove the selected block.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            if self.input.is_idle() {
                return self.select(None);
            }
            return self.cancel_gesture();
        }
        if key.is("Delete") || key.is("Backspace") {
            if !self.input.is_idle() {
                return Vec::new();
            }
            if let Some(id) = self.ui.selected_id.clone() {
                return self.remove_block(&id);
            }
        }
        Vec::new()
    }

    // --- Render ---

    /// Display list for the current state, including the outline of a block
    /// being drawn.
    #[must_use]
    pub fn scene(&self) -> Vec<DrawCommand> {
        let mut commands = render::scene(&self.viewport, &self.overlays);
        if commands.is_empty() {
            return commands;
        }
        if let (Some(rect), InputState::DrawingBlock { shape, .. }) = (self.input.drawing_rect(), &self.input) {
            let bounds = self.viewport.transformer().image_rect_to_canvas(rect);
            commands.extend(render::block_commands(bounds, *shape, false));
        }
        commands
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    #[must_use]
    pub fn transformer(&self) -> Transformer {
        self.viewport.transformer()
    }

    #[must_use]
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn blocks(&self) -> &BlockStore {
        &self.doc
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn limits(&self) -> BlockLimits {
        self.limits
    }

    // --- Internals ---

    fn begin_select(&mut self, canvas_pt: Point) -> Vec<Action> {
        let transformer = self.viewport.transformer();
        let hit = if transformer.is_active() {
            let handle = transformer.canvas_distance_to_image(self.limits.handle_size_px());
            hit_test(transformer.canvas_to_image(canvas_pt), &self.doc, handle, self.ui.selected_id.as_deref())
        } else {
            None
        };

        let Some(hit) = hit else {
            let mut actions = self.select(None);
            self.input = InputState::Panning { button: Button::Primary, last_canvas: canvas_pt };
            actions.push(Action::SetCursor(CURSOR_GRABBING));
            return actions;
        };

        let mut actions = self.select(Some(hit.block_id.as_str()));
        if let Some(block) = self.doc.get(&hit.block_id) {
            let session = DragSession::new(block, hit.zone, self.viewport.image_size(), &self.limits);
            self.input = InputState::Dragging { session, last_canvas: canvas_pt };
            actions.push(Action::SetCursor(hit.zone.cursor()));
        }
        actions
    }

    fn begin_drawing(&mut self, shape: BlockShape, canvas_pt: Point) -> Vec<Action> {
        let transformer = self.viewport.transformer();
        let image_pt = transformer.canvas_to_image(canvas_pt);
        if !transformer.is_point_in_image_bounds(image_pt) {
            return Vec::new();
        }
        self.input = InputState::DrawingBlock { shape, anchor_image: image_pt, current_image: image_pt };
        vec![Action::SetCursor(CURSOR_CROSSHAIR)]
    }

    fn commit_drag(&mut self, session: DragSession) -> Vec<Action> {
        let outcome = session.finish();
        let mut actions = Vec::new();
        if outcome.changed && self.doc.set_position(&outcome.block_id, outcome.position) {
            let p = outcome.position;
            tracing::info!(
                block_id = %outcome.block_id,
                x = p.x,
                y = p.y,
                width = p.width,
                height = p.height,
                "block geometry finalized"
            );
            actions.push(Action::BlockGeometryFinalized { id: outcome.block_id, position: p });
        }
        self.refresh_overlays();
        actions.push(Action::RenderNeeded);
        actions
    }

    fn insert_new_block(&mut self, shape: BlockShape, image_rect: Rect) -> Vec<Action> {
        let position = self.clamp_to_image(BlockPosition::from_rect(image_rect, shape));
        let block = Block { z_index: self.doc.next_z_index(), ..Block::new(position) };
        tracing::debug!(block_id = %block.id, ?shape, "block created");
        self.doc.insert(block.clone());
        self.ui.selected_id = Some(block.id.clone());
        self.refresh_overlays();
        vec![
            Action::SelectionChanged(Some(block.id.clone())),
            Action::BlockCreated(block),
            Action::RenderNeeded,
        ]
    }

    fn clamp_to_image(&self, position: BlockPosition) -> BlockPosition {
        let (w, h) = self.viewport.image_size();
        position.clamped(f64::from(w), f64::from(h), self.limits.min_size())
    }

    fn hover_cursor(&self, canvas_pt: Point) -> &'static str {
        if self.ui.tool.shape().is_some() {
            return CURSOR_CROSSHAIR;
        }
        let transformer = self.viewport.transformer();
        if !transformer.is_active() {
            return CURSOR_DEFAULT;
        }
        let handle = transformer.canvas_distance_to_image(self.limits.handle_size_px());
        hit_test(transformer.canvas_to_image(canvas_pt), &self.doc, handle, self.ui.selected_id.as_deref())
            .map_or(CURSOR_DEFAULT, |hit| hit.zone.cursor())
    }

    /// End a drag whose block no longer exists.
    fn drop_stale_gesture(&mut self) {
        if let InputState::Dragging { session, .. } = &self.input {
            if self.doc.get(session.block_id()).is_none() {
                self.input = InputState::Idle;
            }
        }
    }

    /// Rebuild overlays from the store, keeping a live drag's working copy.
    fn refresh_overlays(&mut self) {
        self.overlays = OverlaySet::from_blocks(&self.doc, self.ui.selected_id.as_deref());
        if let InputState::Dragging { session, .. } = &self.input {
            if let Some(block) = self.doc.get(session.block_id()) {
                let selected = self.ui.selected_id.as_deref() == Some(session.block_id());
                self.overlays.sync_block(&Block { position: session.current(), ..block.clone() }, selected);
            }
        }
    }
}

fn view_actions(viewport: &ViewportState, changed: bool) -> Vec<Action> {
    if !changed {
        return Vec::new();
    }
    vec![Action::ViewChanged { zoom: viewport.zoom(), pan: viewport.pan() }, Action::RenderNeeded]
}
