//! Texture resource.
//!
//! [`Texture`] wraps at most one GPU texture handle together with its draw
//! state (blend mode, color/alpha modulation) and optional CPU-side pixel
//! storage. All operations take the device layer explicitly; nothing here is
//! global.

mod error;
mod pixels;
mod resource;

pub use error::TextureError;
pub use pixels::PixelBuffer;
pub use resource::{LockedPixels, Texture, TextureAccess, TextureId};
