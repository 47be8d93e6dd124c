use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Vec2;
use crate::device::Gpu;
use crate::paint::Color;
use crate::render::{BlendMode, DrawParams, SpriteBatch, SpriteDraw};
use crate::text::{self, FontId, FontSystem};

use super::pixels::decode_image;
use super::{PixelBuffer, TextureError};

/// Identity of a loaded texture generation.
///
/// A fresh id is assigned on every successful load or create, so renderer-side
/// caches keyed by id never confuse reloaded contents with a stale binding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

impl TextureId {
    fn next() -> Self {
        TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Access pattern requested for a texture handle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureAccess {
    /// Upload-once contents. File and text loads use this.
    #[default]
    Static,
    /// CPU-updatable through `lock`/`unlock`.
    Streaming,
    /// Usable as a render attachment.
    Target,
}

impl TextureAccess {
    fn usages(self) -> wgpu::TextureUsages {
        match self {
            TextureAccess::Static | TextureAccess::Streaming => {
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST
            }
            TextureAccess::Target => {
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::RENDER_ATTACHMENT
            }
        }
    }
}

/// CPU staging buffer held between `lock` and `unlock`.
///
/// Rows are tightly packed at `width * 4` bytes.
#[derive(Debug)]
pub struct LockedPixels {
    stride: usize,
    data: Vec<u8>,
}

impl LockedPixels {
    fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * 4;
        Self {
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copies raw RGBA bytes in. Shorter input fills only the leading bytes;
    /// longer input is truncated to the buffer size.
    pub fn copy_from(&mut self, src: &[u8]) {
        let n = src.len().min(self.data.len());
        self.data[..n].copy_from_slice(&src[..n]);
    }
}

/// A drawable texture resource.
///
/// Owns at most one GPU texture at a time. Loading over an existing handle
/// releases it first, and failures leave the resource empty rather than
/// keeping a stale handle; dropping the resource releases everything.
pub struct Texture {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    id: TextureId,
    width: u32,
    height: u32,
    access: TextureAccess,
    blend: BlendMode,
    color_mod: [u8; 3],
    alpha_mod: u8,
    locked: Option<LockedPixels>,
    pixels: Option<PixelBuffer>,
}

impl Texture {
    pub fn new() -> Self {
        Self {
            texture: None,
            view: None,
            id: TextureId::next(),
            width: 0,
            height: 0,
            access: TextureAccess::Static,
            blend: BlendMode::Alpha,
            color_mod: [255; 3],
            alpha_mod: 255,
            locked: None,
            pixels: None,
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    /// Width of the loaded handle in pixels, 0 when empty.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the loaded handle in pixels, 0 when empty.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn access(&self) -> TextureAccess {
        self.access
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    pub fn color_mod(&self) -> [u8; 3] {
        self.color_mod
    }

    pub fn alpha_mod(&self) -> u8 {
        self.alpha_mod
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Releases the GPU handle and all CPU-side buffers.
    ///
    /// Idempotent; safe on an empty resource. Dimensions reset to zero and
    /// draw state returns to its defaults. Runs implicitly before every load
    /// and when the resource is dropped.
    pub fn release(&mut self) {
        self.texture = None;
        self.view = None;
        self.width = 0;
        self.height = 0;
        self.access = TextureAccess::Static;
        self.blend = BlendMode::Alpha;
        self.color_mod = [255; 3];
        self.alpha_mod = 255;
        self.locked = None;
        self.pixels = None;
    }

    /// Loads an image file into a fresh GPU handle.
    ///
    /// Any previous handle is released first; on failure the resource is left
    /// empty.
    pub fn load_from_file(
        &mut self,
        gpu: &Gpu<'_>,
        path: impl AsRef<Path>,
    ) -> Result<(), TextureError> {
        self.release();
        let decoded = decode_image(path.as_ref())?;
        self.upload(
            gpu,
            decoded.width(),
            decoded.height(),
            TextureAccess::Static,
            Some(decoded.bytes()),
        )
    }

    /// Rasterizes `text` with `font` at `size_px` and loads the tinted bitmap
    /// into a fresh GPU handle.
    pub fn load_from_text(
        &mut self,
        gpu: &Gpu<'_>,
        fonts: &FontSystem,
        font: FontId,
        size_px: f32,
        text: &str,
        color: Color,
    ) -> Result<(), TextureError> {
        self.release();
        let Some(font) = fonts.get(font) else {
            return Err(TextureError::DecodeFailed(format!("unknown font {font:?}")));
        };
        let Some(rendered) = text::render_text(font, text, size_px, color) else {
            return Err(TextureError::DecodeFailed(
                "text produced no rasterizable glyphs".into(),
            ));
        };
        self.upload(
            gpu,
            rendered.width,
            rendered.height,
            TextureAccess::Static,
            Some(&rendered.pixels),
        )
    }

    /// Allocates a blank (zero-initialized) texture with the given access.
    pub fn create_blank(
        &mut self,
        gpu: &Gpu<'_>,
        width: u32,
        height: u32,
        access: TextureAccess,
    ) -> Result<(), TextureError> {
        self.release();
        self.upload(gpu, width, height, access, None)
    }

    // ── draw state ────────────────────────────────────────────────────────

    /// Sets color modulation; sampled RGB is multiplied by `r`,`g`,`b` at
    /// draw time. Warn-logged no-op while empty.
    pub fn set_color_mod(&mut self, r: u8, g: u8, b: u8) {
        if self.texture.is_none() {
            log::warn!("set_color_mod on an empty texture");
            return;
        }
        self.color_mod = [r, g, b];
    }

    /// Sets alpha modulation; sampled alpha is multiplied by `alpha` at draw
    /// time. Warn-logged no-op while empty.
    pub fn set_alpha_mod(&mut self, alpha: u8) {
        if self.texture.is_none() {
            log::warn!("set_alpha_mod on an empty texture");
            return;
        }
        self.alpha_mod = alpha;
    }

    /// Selects how drawn pixels combine with the target. Warn-logged no-op
    /// while empty.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        if self.texture.is_none() {
            log::warn!("set_blend_mode on an empty texture");
            return;
        }
        self.blend = mode;
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Records a draw of this texture at `(x, y)` into the frame's batch.
    ///
    /// Drawing an empty texture is a no-op. Clipping, rotation, and flip come
    /// from [`DrawParams`].
    pub fn render(&self, batch: &mut SpriteBatch, x: f32, y: f32, params: DrawParams) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        batch.push(SpriteDraw {
            view: view.clone(),
            texture: self.id,
            blend: self.blend,
            origin: Vec2::new(x, y),
            tex_width: self.width,
            tex_height: self.height,
            color: self.draw_color(),
            params,
        });
    }

    fn draw_color(&self) -> [f32; 4] {
        [
            self.color_mod[0] as f32 / 255.0,
            self.color_mod[1] as f32 / 255.0,
            self.color_mod[2] as f32 / 255.0,
            self.alpha_mod as f32 / 255.0,
        ]
    }

    // ── streaming access ──────────────────────────────────────────────────

    /// Begins CPU access to a streaming texture's pixels.
    ///
    /// Allocates the staging buffer; commit it with [`unlock`](Self::unlock).
    pub fn lock(&mut self) -> Result<(), TextureError> {
        if self.texture.is_none() || self.access != TextureAccess::Streaming {
            return Err(TextureError::UnsupportedAccessForLock);
        }
        if self.locked.is_some() {
            return Err(TextureError::AlreadyLocked);
        }
        self.locked = Some(LockedPixels::new(self.width, self.height));
        Ok(())
    }

    /// Commits the locked staging buffer to the GPU handle and ends CPU
    /// access. The resource can be locked again afterwards.
    pub fn unlock(&mut self, gpu: &Gpu<'_>) -> Result<(), TextureError> {
        let locked = self.take_locked()?;
        if let Some(texture) = self.texture.as_ref() {
            write_full(gpu.queue(), texture, self.width, self.height, &locked.data);
        }
        Ok(())
    }

    fn take_locked(&mut self) -> Result<LockedPixels, TextureError> {
        self.locked.take().ok_or(TextureError::NotLocked)
    }

    /// Copies raw RGBA bytes into the locked staging buffer (see
    /// [`LockedPixels::copy_from`]). Warn-logged no-op without a lock.
    pub fn copy_raw_pixels(&mut self, src: &[u8]) {
        let Some(locked) = self.locked.as_mut() else {
            log::warn!("copy_raw_pixels without a lock");
            return;
        };
        debug_assert!(
            src.len() >= locked.stride * self.height as usize,
            "source buffer smaller than stride * height"
        );
        locked.copy_from(src);
    }

    /// Mutable view of the locked staging buffer.
    pub fn locked_pixels_mut(&mut self) -> Option<&mut [u8]> {
        self.locked.as_mut().map(|l| l.data.as_mut_slice())
    }

    /// Row stride in bytes of the locked staging buffer.
    pub fn locked_pitch(&self) -> Option<usize> {
        self.locked.as_ref().map(|l| l.stride)
    }

    // ── CPU pixel-buffer path ─────────────────────────────────────────────

    /// Decodes an image into a retained CPU pixel buffer without creating a
    /// GPU handle. Follow with [`load_from_pixels`](Self::load_from_pixels).
    pub fn load_pixels_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), TextureError> {
        self.release();
        self.pixels = Some(decode_image(path.as_ref())?);
        Ok(())
    }

    /// Uploads the retained pixel buffer into a fresh GPU handle.
    ///
    /// The buffer stays available for [`pixel_at`](Self::pixel_at) until the
    /// resource is released.
    pub fn load_from_pixels(&mut self, gpu: &Gpu<'_>) -> Result<(), TextureError> {
        let Some(pixels) = self.pixels.take() else {
            return Err(TextureError::DecodeFailed("no pixel buffer loaded".into()));
        };
        let result = self.upload(
            gpu,
            pixels.width(),
            pixels.height(),
            TextureAccess::Static,
            Some(pixels.bytes()),
        );
        self.pixels = Some(pixels);
        result
    }

    /// RGBA texel from the retained pixel buffer, if one is loaded.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.as_ref().and_then(|p| p.pixel_at(x, y))
    }

    /// Row stride in pixels of the retained pixel buffer.
    pub fn pitch_in_pixels(&self) -> Option<u32> {
        self.pixels.as_ref().map(|p| p.pitch_in_pixels())
    }

    pub fn pixels(&self) -> Option<&PixelBuffer> {
        self.pixels.as_ref()
    }

    // ── internals ─────────────────────────────────────────────────────────

    /// Binds a fresh handle, replacing whatever was loaded. The handle is
    /// created before any state is mutated, so a failure leaves the resource
    /// unchanged.
    fn upload(
        &mut self,
        gpu: &Gpu<'_>,
        width: u32,
        height: u32,
        access: TextureAccess,
        bytes: Option<&[u8]>,
    ) -> Result<(), TextureError> {
        let texture = create_handle(gpu.device(), width, height, access)?;
        if let Some(bytes) = bytes {
            write_full(gpu.queue(), &texture, width, height, bytes);
        }

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.id = TextureId::next();
        self.width = width;
        self.height = height;
        self.access = access;
        self.locked = None;
        Ok(())
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::new()
    }
}

fn create_handle(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    access: TextureAccess,
) -> Result<wgpu::Texture, TextureError> {
    let max = device.limits().max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TextureError::HandleCreationFailed(format!(
            "unsupported texture size {width}x{height} (device max {max})"
        )));
    }

    Ok(device.create_texture(&wgpu::TextureDescriptor {
        label: Some("splash texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: access.usages(),
        view_formats: &[],
    }))
}

fn write_full(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, bytes: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytes,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── empty-resource state machine ──────────────────────────────────────

    #[test]
    fn new_texture_is_empty() {
        let tex = Texture::new();
        assert!(!tex.is_loaded());
        assert_eq!(tex.width(), 0);
        assert_eq!(tex.height(), 0);
        assert!(!tex.is_locked());
        assert!(tex.pixels().is_none());
    }

    #[test]
    fn release_on_empty_is_idempotent() {
        let mut tex = Texture::new();
        tex.release();
        tex.release();
        assert!(!tex.is_loaded());
        assert_eq!((tex.width(), tex.height()), (0, 0));
    }

    #[test]
    fn lock_without_streaming_handle_is_rejected() {
        let mut tex = Texture::new();
        assert_eq!(tex.lock(), Err(TextureError::UnsupportedAccessForLock));
        assert!(!tex.is_locked());
    }

    #[test]
    fn unlock_without_lock_is_rejected() {
        let mut tex = Texture::new();
        assert_eq!(tex.take_locked().unwrap_err(), TextureError::NotLocked);
        assert!(!tex.is_locked());
    }

    #[test]
    fn copy_raw_pixels_without_lock_is_noop() {
        let mut tex = Texture::new();
        tex.copy_raw_pixels(&[1, 2, 3, 4]);
        assert!(!tex.is_locked());
    }

    #[test]
    fn draw_state_setters_ignore_empty_resource() {
        let mut tex = Texture::new();
        tex.set_color_mod(10, 20, 30);
        tex.set_alpha_mod(99);
        tex.set_blend_mode(BlendMode::Additive);
        assert_eq!(tex.color_mod(), [255, 255, 255]);
        assert_eq!(tex.alpha_mod(), 255);
        assert_eq!(tex.blend_mode(), BlendMode::Alpha);
    }

    #[test]
    fn render_of_empty_texture_records_nothing() {
        let tex = Texture::new();
        let mut batch = SpriteBatch::new();
        tex.render(&mut batch, 10.0, 20.0, DrawParams::default());
        assert!(batch.is_empty());
    }

    #[test]
    fn load_pixels_from_missing_file_is_asset_not_found() {
        let mut tex = Texture::new();
        let err = tex.load_pixels_from_file("no/such/picture.png").unwrap_err();
        assert!(matches!(err, TextureError::AssetNotFound(_)));
        assert!(tex.pixels().is_none());
    }

    // ── locked staging buffer ─────────────────────────────────────────────

    #[test]
    fn locked_pixels_stride_is_width_times_four() {
        let locked = LockedPixels::new(7, 3);
        assert_eq!(locked.stride(), 28);
        assert_eq!(locked.data.len(), 28 * 3);
    }

    #[test]
    fn copy_from_full_buffer() {
        let mut locked = LockedPixels::new(2, 1);
        locked.copy_from(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(locked.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn copy_from_short_input_fills_leading_bytes() {
        let mut locked = LockedPixels::new(2, 1);
        locked.copy_from(&[9, 9]);
        assert_eq!(locked.data, vec![9, 9, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn copy_from_truncates_long_input() {
        let mut locked = LockedPixels::new(1, 1);
        locked.copy_from(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(locked.data, vec![1, 2, 3, 4]);
    }

    // ── ids ───────────────────────────────────────────────────────────────

    #[test]
    fn texture_ids_are_unique() {
        assert_ne!(Texture::new().id, Texture::new().id);
    }
}
