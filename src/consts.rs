//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower bound for the interactive zoom factor.
pub const DEFAULT_MIN_ZOOM: f64 = 0.2;

/// Upper bound for the interactive zoom factor.
pub const DEFAULT_MAX_ZOOM: f64 = 6.0;

/// Multiplicative step used by `zoom_in` / `zoom_out` and one wheel notch.
pub const ZOOM_STEP: f64 = 1.2;

// ── Pan ─────────────────────────────────────────────────────────

/// Fraction of the displayed image that must stay inside the canvas on each axis.
pub const DEFAULT_MIN_VISIBLE_FRACTION: f64 = 0.2;

// ── Blocks ──────────────────────────────────────────────────────

/// Smallest width or height a block may have, in image pixels.
pub const MIN_BLOCK_SIZE: f64 = 10.0;

/// Canvas-space hit slop in pixels for block edges and corners.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Side length of the square drawn at each handle, in canvas pixels.
pub const HANDLE_DRAW_SIZE_PX: f64 = 6.0;

// ── Labels ──────────────────────────────────────────────────────

/// Font size for block labels, in canvas pixels. Labels do not scale with zoom.
pub const LABEL_FONT_PX: f64 = 14.0;

/// Gap between a label's baseline and the top edge of its block, in canvas pixels.
pub const LABEL_GAP_PX: f64 = 4.0;

// ── Numerics ────────────────────────────────────────────────────

/// Tolerance for floating-point comparisons in geometry checks.
pub const EPSILON: f64 = 1e-9;
