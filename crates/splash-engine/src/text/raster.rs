use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::paint::Color;

/// A string rasterized into a tight straight-alpha RGBA8 bitmap.
///
/// Row-major, `width * height * 4` bytes. Glyph coverage lands in the alpha
/// channel; RGB carries the requested text color.
pub struct RenderedText {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Lays out `text` at `size_px` and composites the glyph coverage into a
/// bitmap tinted with `color`.
///
/// Returns `None` when nothing is rasterizable (empty string, whitespace
/// only, or a font without the requested glyphs).
pub fn render_text(
    font: &fontdue::Font,
    text: &str,
    size_px: f32,
    color: Color,
) -> Option<RenderedText> {
    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings::default());
    layout.append(&[font], &TextStyle::new(text, size_px, 0));

    let glyphs: Vec<(fontdue::layout::GlyphRasterConfig, f32, f32)> = layout
        .glyphs()
        .iter()
        .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
        .map(|g| (g.key, g.x, g.y))
        .collect();

    let (min_x, min_y, width, height) = tight_bounds(
        layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.x, g.y, g.width, g.height)),
    )?;

    let rgba = color.to_rgba_u8();
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for (key, x, y) in glyphs {
        let (metrics, coverage) = font.rasterize_config(key);
        if metrics.width == 0 || metrics.height == 0 {
            continue;
        }
        blit_glyph(
            &mut pixels,
            width,
            height,
            (x - min_x).round() as i32,
            (y - min_y).round() as i32,
            &coverage,
            metrics.width,
            metrics.height,
            rgba,
        );
    }

    Some(RenderedText { width, height, pixels })
}

// ── compositing helpers ───────────────────────────────────────────────────

/// Bounding box of placed glyph bitmaps as `(min_x, min_y, width, height)`.
fn tight_bounds(
    glyphs: impl Iterator<Item = (f32, f32, usize, usize)>,
) -> Option<(f32, f32, u32, u32)> {
    let mut any = false;
    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);

    for (x, y, w, h) in glyphs {
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x + w as f32);
        max_y = max_y.max(y + h as f32);
    }

    if !any {
        return None;
    }

    let width = (max_x - min_x).ceil().max(1.0) as u32;
    let height = (max_y - min_y).ceil().max(1.0) as u32;
    Some((min_x, min_y, width, height))
}

/// Composites one glyph's coverage bitmap into the RGBA destination.
///
/// Out-of-bounds texels are skipped; overlapping glyphs keep the higher
/// alpha, which avoids dark seams where kerned glyph boxes touch.
fn blit_glyph(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    ox: i32,
    oy: i32,
    coverage: &[u8],
    w: usize,
    h: usize,
    rgba: [u8; 4],
) {
    for row in 0..h {
        let py = oy + row as i32;
        if py < 0 || py >= dst_h as i32 {
            continue;
        }
        for col in 0..w {
            let px = ox + col as i32;
            if px < 0 || px >= dst_w as i32 {
                continue;
            }
            let c = coverage[row * w + col];
            if c == 0 {
                continue;
            }
            let a = ((c as u16 * rgba[3] as u16) / 255) as u8;
            let i = ((py as u32 * dst_w + px as u32) * 4) as usize;
            dst[i] = rgba[0];
            dst[i + 1] = rgba[1];
            dst[i + 2] = rgba[2];
            dst[i + 3] = dst[i + 3].max(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── tight_bounds ──────────────────────────────────────────────────────

    #[test]
    fn tight_bounds_empty_is_none() {
        assert!(tight_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn tight_bounds_single_glyph() {
        let b = tight_bounds([(2.0, 3.0, 10usize, 12usize)].into_iter());
        assert_eq!(b, Some((2.0, 3.0, 10, 12)));
    }

    #[test]
    fn tight_bounds_spans_all_glyphs() {
        let glyphs = [(0.0, 4.0, 8usize, 8usize), (10.0, 0.0, 6usize, 12usize)];
        let (min_x, min_y, w, h) = tight_bounds(glyphs.into_iter()).unwrap();
        assert_eq!((min_x, min_y), (0.0, 0.0));
        assert_eq!((w, h), (16, 12));
    }

    #[test]
    fn tight_bounds_handles_negative_origin() {
        // A glyph left of the pen origin shifts the bitmap, not the glyph.
        let (min_x, _, w, _) = tight_bounds([(-2.0, 0.0, 4usize, 4usize)].into_iter()).unwrap();
        assert_eq!(min_x, -2.0);
        assert_eq!(w, 4);
    }

    // ── blit_glyph ────────────────────────────────────────────────────────

    fn solid_coverage(w: usize, h: usize, value: u8) -> Vec<u8> {
        vec![value; w * h]
    }

    #[test]
    fn blit_writes_color_and_scaled_alpha() {
        let mut dst = vec![0u8; 4 * 4 * 4];
        let cov = solid_coverage(2, 2, 128);
        blit_glyph(&mut dst, 4, 4, 1, 1, &cov, 2, 2, [10, 20, 30, 255]);

        let i = ((1 * 4 + 1) * 4) as usize;
        assert_eq!(&dst[i..i + 4], &[10, 20, 30, 128]);
        // Untouched texel stays transparent.
        assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn blit_scales_alpha_by_color_alpha() {
        let mut dst = vec![0u8; 4];
        blit_glyph(&mut dst, 1, 1, 0, 0, &[255], 1, 1, [0, 0, 0, 128]);
        assert_eq!(dst[3], 128);
    }

    #[test]
    fn blit_skips_out_of_bounds_texels() {
        let mut dst = vec![0u8; 2 * 2 * 4];
        let cov = solid_coverage(3, 3, 255);
        // Offset places part of the glyph outside the 2x2 destination.
        blit_glyph(&mut dst, 2, 2, 1, 1, &cov, 3, 3, [1, 2, 3, 255]);
        assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
        let i = ((1 * 2 + 1) * 4) as usize;
        assert_eq!(&dst[i..i + 4], &[1, 2, 3, 255]);
    }

    #[test]
    fn blit_overlap_keeps_higher_alpha() {
        let mut dst = vec![0u8; 4];
        blit_glyph(&mut dst, 1, 1, 0, 0, &[200], 1, 1, [5, 5, 5, 255]);
        blit_glyph(&mut dst, 1, 1, 0, 0, &[100], 1, 1, [5, 5, 5, 255]);
        assert_eq!(dst[3], 200);
    }
}
