//! GPU rendering subsystem.
//!
//! Renderers consume retained `scene` geometry and issue GPU commands via
//! wgpu. Each renderer is responsible for its own GPU resources (pipelines,
//! buffers) and re-uploads vertex data only when the corresponding scene
//! attribute is marked dirty.
//!
//! Convention:
//! - CPU geometry is in world units (right-handed, +Y up).
//! - The vertex shader transforms to clip space with the camera's
//!   view-projection uniform; screen-space quantities (sprite size, aspect)
//!   come from the viewport part of the same uniform.

mod ctx;
mod texture;

pub mod primitives;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use texture::Texture2d;
