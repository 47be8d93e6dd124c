//! Coordinate and geometry types shared across the engine.
//!
//! Canonical CPU space:
//! - Physical pixels (matches the surface size textures are drawn into)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The sprite renderer converts to NDC in the shader using a viewport uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
