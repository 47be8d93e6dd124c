/// Straight-alpha RGBA color with components in `[0, 1]`.
///
/// Pixel data uploaded to sRGB textures stores these components as sRGB
/// bytes; the clear color handed to wgpu is converted with
/// [`to_wgpu`](Self::to_wgpu).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Creates a color from straight-alpha sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Returns the components as straight-alpha sRGB bytes, clamped.
    #[inline]
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Clear-color conversion for render passes.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_round_trip() {
        let c = Color::from_rgba_u8(0, 128, 255, 64);
        let [r, g, b, a] = c.to_rgba_u8();
        assert_eq!((r, g, b, a), (0, 128, 255, 64));
    }

    #[test]
    fn to_rgba_u8_clamps() {
        let c = Color::new(-0.5, 2.0, 0.5, 1.0);
        assert_eq!(c.to_rgba_u8(), [0, 255, 128, 255]);
    }

    #[test]
    fn from_rgb_u8_is_opaque() {
        assert_eq!(Color::from_rgb_u8(10, 20, 30).a, 1.0);
    }
}
