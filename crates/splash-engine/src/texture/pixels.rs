use std::path::Path;

use super::TextureError;

/// CPU-side RGBA8 pixel storage decoded from an image file.
///
/// Retained alongside the GPU handle by the pixel-loader path so individual
/// texels can still be inspected after upload. Rows are tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub(crate) fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in pixels.
    pub fn pitch_in_pixels(&self) -> u32 {
        self.width
    }

    /// RGBA texel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Decodes an image file into a [`PixelBuffer`] without touching the GPU.
///
/// A missing file maps to `AssetNotFound`; everything else the decoder
/// rejects maps to `DecodeFailed` with the decoder's message.
pub(crate) fn decode_image(path: &Path) -> Result<PixelBuffer, TextureError> {
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            TextureError::AssetNotFound(path.display().to_string())
        }
        other => TextureError::DecodeFailed(format!("{}: {other}", path.display())),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_2x2() -> PixelBuffer {
        // Row 0: red, green. Row 1: blue, white.
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        PixelBuffer::new(2, 2, data)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[test]
    fn pixel_at_reads_row_major() {
        let buf = buffer_2x2();
        assert_eq!(buf.pixel_at(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel_at(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(buf.pixel_at(0, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn pixel_at_out_of_bounds_is_none() {
        let buf = buffer_2x2();
        assert_eq!(buf.pixel_at(2, 0), None);
        assert_eq!(buf.pixel_at(0, 2), None);
    }

    #[test]
    fn pitch_matches_width() {
        assert_eq!(buffer_2x2().pitch_in_pixels(), 2);
    }

    // ── decode_image ──────────────────────────────────────────────────────

    #[test]
    fn decode_missing_file_is_asset_not_found() {
        let err = decode_image(Path::new("no/such/asset.png")).unwrap_err();
        assert!(matches!(err, TextureError::AssetNotFound(_)));
    }

    #[test]
    fn decode_garbage_is_decode_failed() {
        let path = std::env::temp_dir().join("splash_decode_garbage_test.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = decode_image(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TextureError::DecodeFailed(_)));
    }
}
