//! GPU rendering subsystem.
//!
//! The sprite renderer consumes `SpriteBatch` draw streams and issues GPU
//! commands via wgpu. It owns its own GPU resources (pipelines, buffers,
//! bind groups).
//!
//! Convention:
//! - CPU geometry is in physical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::{BlendMode, DrawParams, Flip, SpriteBatch, SpriteRenderer};
pub(crate) use sprite::SpriteDraw;
