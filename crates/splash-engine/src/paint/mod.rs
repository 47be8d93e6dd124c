//! Color model shared between texture loading and rendering.
//!
//! Colors are straight-alpha RGBA. Texture pixels are stored straight and the
//! sprite blend states are written for straight-alpha sources, so there is no
//! premultiplication step anywhere in the pipeline.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
