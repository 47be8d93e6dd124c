use std::fmt;

/// Errors produced by texture load, create, and pixel-access operations.
///
/// Subsystem initialization failures are not represented here; those surface
/// as `anyhow` chains from the device layer during startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The asset path did not resolve to a readable file.
    AssetNotFound(String),
    /// The asset was read but produced no usable pixels (bad image data, or
    /// text that rasterized to nothing).
    DecodeFailed(String),
    /// The GPU handle could not be created.
    HandleCreationFailed(String),
    /// `lock` was called while a lock was already held.
    AlreadyLocked,
    /// `unlock` was called without a prior `lock`.
    NotLocked,
    /// `lock` requires a loaded streaming-access handle.
    UnsupportedAccessForLock,
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::AssetNotFound(path) => write!(f, "asset not found: {path}"),
            TextureError::DecodeFailed(msg) => write!(f, "decode failed: {msg}"),
            TextureError::HandleCreationFailed(msg) => {
                write!(f, "handle creation failed: {msg}")
            }
            TextureError::AlreadyLocked => write!(f, "texture is already locked"),
            TextureError::NotLocked => write!(f, "texture is not locked"),
            TextureError::UnsupportedAccessForLock => {
                write!(f, "texture does not support streaming access")
            }
        }
    }
}

impl std::error::Error for TextureError {}
