//! Retained scene geometry.
//!
//! Responsibilities:
//! - hold per-vertex attribute data with a dirty flag so renderers re-upload
//!   GPU buffers only when a value actually changed
//! - implement the per-frame target synchronizers for the oriented sprite
//!   and the tracking line (shadow-copy compare, exact equality, no events)
//!
//! Everything here is plain CPU state; renderers under `render::primitives`
//! own the GPU side.

mod attribute;
mod axes;
mod bounds;
mod line;
mod sprite;

pub use attribute::Attribute3;
pub use axes::{Axes, Segment};
pub use bounds::Bounds;
pub use line::TrackingLine;
pub use sprite::{OrientedSprite, SpriteStyle};
