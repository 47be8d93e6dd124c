//! Splash engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo binary:
//! the window runtime, the device/surface layer, the texture resource, and
//! the sprite renderer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod text;
pub mod texture;
