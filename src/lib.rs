//! Coordinate and interactive-geometry engine for an image-annotation canvas.
//!
//! The crate owns everything between raw pointer positions and block
//! geometry: fitting a raster image into a resizable canvas, zooming about a
//! focal point, clamping pan so the image cannot be lost off-screen,
//! converting between image space and canvas space, and dragging/resizing
//! rectangular or oval blocks on top of the image. It never decodes images,
//! draws pixels, or persists anything; the host feeds it dimensions and
//! pointer events and consumes the resulting [`engine::Action`]s and
//! [`render::DrawCommand`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing [`engine::EngineCore`] wiring input to geometry |
//! | [`viewport`] | Fit, zoom and pan state for one canvas |
//! | [`transform`] | Image-space / canvas-space conversions |
//! | [`block`] | Block geometry, limits and bounds clamping |
//! | [`hit`] | Handle-zone classification and store hit-testing |
//! | [`drag`] | Per-gesture drag/resize session |
//! | [`doc`] | Block records and the in-memory block store |
//! | [`overlay`] | Drawable overlay variants and the ordered overlay set |
//! | [`render`] | Display-list generation in canvas space |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`config`] | Tunable limits with env and serde loading |
//! | [`geometry`] | `Point` and `Rect` value types |
//! | [`consts`] | Shared numeric constants |

pub mod block;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod render;
pub mod transform;
pub mod viewport;
