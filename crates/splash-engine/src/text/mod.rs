//! Font loading and CPU text rasterization.
//!
//! Fonts live in a [`FontSystem`] owned by the application. Rasterization
//! produces a tight RGBA8 bitmap for a whole string; the texture resource
//! uploads that bitmap as a regular texture, so drawn text goes through the
//! same sprite path as images.

mod font_system;
mod raster;

pub use font_system::{FontId, FontLoadError, FontSystem};
pub use raster::{render_text, RenderedText};
