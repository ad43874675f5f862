//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up; each active variant carries what the engine needs to compute
//! incremental deltas and emit the final action on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::block::BlockShape;
use crate::doc::BlockId;
use crate::drag::DragSession;
use crate::geometry::{Point, Rect};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move and resize existing blocks; drag empty space to pan.
    #[default]
    Select,
    /// Draw a rectangular block.
    Rectangle,
    /// Draw an oval block.
    Oval,
}

impl Tool {
    /// Shape of the block this tool draws, if it draws one.
    #[must_use]
    pub fn shape(self) -> Option<BlockShape> {
        match self {
            Self::Select => None,
            Self::Rectangle => Some(BlockShape::Rectangle),
            Self::Oval => Some(BlockShape::Oval),
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    /// Right mouse button; ignored by the canvas.
    Secondary,
}

/// A keyboard key, named as the host reports it (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

/// Wheel / trackpad scroll delta in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down.
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tool: Tool,
    pub selected_id: Option<BlockId>,
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the view itself.
    Panning {
        /// Button that started the pan; only its release ends it.
        button: Button,
        /// Canvas-space pointer position at the previous event.
        last_canvas: Point,
    },
    /// Moving or resizing a block.
    Dragging {
        session: DragSession,
        /// Canvas-space pointer position at the previous event.
        last_canvas: Point,
    },
    /// Sizing a new block from an anchor corner.
    DrawingBlock {
        shape: BlockShape,
        /// Image-space corner where the drag started.
        anchor_image: Point,
        /// Image-space pointer position at the latest event.
        current_image: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Button holding the current gesture. Block drags and drawing always
    /// start from the primary button.
    #[must_use]
    pub fn button(&self) -> Option<Button> {
        match self {
            Self::Idle => None,
            Self::Panning { button, .. } => Some(*button),
            Self::Dragging { .. } | Self::DrawingBlock { .. } => Some(Button::Primary),
        }
    }

    /// Image-space rectangle of a block being drawn.
    #[must_use]
    pub fn drawing_rect(&self) -> Option<Rect> {
        match self {
            Self::DrawingBlock { anchor_image, current_image, .. } => {
                Some(Rect::from_corners(*anchor_image, *current_image))
            }
            _ => None,
        }
    }
}
