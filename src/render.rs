//! Rendering: turns viewport and overlay state into a canvas-space display
//! list.
//!
//! Nothing here touches pixels. The host walks the returned
//! [`DrawCommand`]s in order (bottom first) and issues the matching calls on
//! whatever 2D surface it owns. Commands that fall entirely outside the
//! canvas are culled.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::block::BlockShape;
use crate::consts::{HANDLE_DRAW_SIZE_PX, LABEL_FONT_PX};
use crate::geometry::{Point, Rect};
use crate::hit::HandleZone;
use crate::overlay::OverlaySet;
use crate::viewport::ViewportState;

/// One drawing instruction, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Place the loaded bitmap so that it fills `bounds`.
    Image { bounds: Rect },
    /// Rectangular block outline.
    Rect { bounds: Rect, selected: bool },
    /// Oval block outline inscribed in `bounds`.
    Ellipse { bounds: Rect, selected: bool },
    /// A filled resize handle square.
    Handle { bounds: Rect },
    /// Single line of text; `anchor` is the left end of the baseline.
    Text { anchor: Point, max_width: f64, font_px: f64, text: String },
}

impl DrawCommand {
    /// Approximate canvas area covered by the command.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Image { bounds } | Self::Rect { bounds, .. } | Self::Ellipse { bounds, .. } | Self::Handle { bounds } => {
                *bounds
            }
            Self::Text { anchor, max_width, font_px, .. } => {
                Rect::new(anchor.x, anchor.y - font_px, *max_width, *font_px)
            }
        }
    }

    fn touches(&self, canvas: &Rect) -> bool {
        let b = self.bounds();
        b.x <= canvas.right() && b.right() >= canvas.x && b.y <= canvas.bottom() && b.bottom() >= canvas.y
    }
}

/// Full display list: the image first, then every visible overlay in render
/// order. Empty when the viewport has no image or no canvas area.
#[must_use]
pub fn scene(viewport: &ViewportState, overlays: &OverlaySet) -> Vec<DrawCommand> {
    if viewport.is_degenerate() {
        return Vec::new();
    }
    let transformer = viewport.transformer();
    let (cw, ch) = viewport.canvas_size();
    let canvas = Rect::new(0.0, 0.0, cw, ch);

    let mut commands = vec![DrawCommand::Image { bounds: transformer.image_bounds_in_canvas() }];
    for overlay in overlays.all_sorted_by_render_order() {
        if !overlay.is_visible() {
            continue;
        }
        commands.extend(overlay.render(viewport, &transformer).into_iter().filter(|c| c.touches(&canvas)));
    }
    commands
}

/// Outline for one block already converted to canvas space, followed by its
/// eight handles when selected.
#[must_use]
pub fn block_commands(bounds: Rect, shape: BlockShape, selected: bool) -> Vec<DrawCommand> {
    let outline = match shape {
        BlockShape::Rectangle => DrawCommand::Rect { bounds, selected },
        BlockShape::Oval => DrawCommand::Ellipse { bounds, selected },
    };
    let mut commands = vec![outline];
    if selected {
        commands.extend(handle_points(bounds).into_iter().map(|(_, p)| DrawCommand::Handle { bounds: handle_rect(p) }));
    }
    commands
}

/// Handle centers for a canvas-space rectangle: four corners, then four edge
/// midpoints.
#[must_use]
pub fn handle_points(bounds: Rect) -> [(HandleZone, Point); 8] {
    let Rect { x, y, .. } = bounds;
    let (r, b) = (bounds.right(), bounds.bottom());
    let c = bounds.center();
    [
        (HandleZone::TopLeft, Point::new(x, y)),
        (HandleZone::TopRight, Point::new(r, y)),
        (HandleZone::BottomLeft, Point::new(x, b)),
        (HandleZone::BottomRight, Point::new(r, b)),
        (HandleZone::Top, Point::new(c.x, y)),
        (HandleZone::Left, Point::new(x, c.y)),
        (HandleZone::Right, Point::new(r, c.y)),
        (HandleZone::Bottom, Point::new(c.x, b)),
    ]
}

/// Square drawn for a handle centered on `center`.
#[must_use]
pub fn handle_rect(center: Point) -> Rect {
    let half = HANDLE_DRAW_SIZE_PX * 0.5;
    Rect::new(center.x - half, center.y - half, HANDLE_DRAW_SIZE_PX, HANDLE_DRAW_SIZE_PX)
}

/// Label text above a block's canvas-space top-left corner.
#[must_use]
pub fn label_command(anchor: Point, max_width: f64, text: &str) -> DrawCommand {
    DrawCommand::Text { anchor, max_width, font_px: LABEL_FONT_PX, text: text.to_owned() }
}
