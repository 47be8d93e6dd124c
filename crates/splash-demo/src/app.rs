use splash_engine::core::{App, AppControl, FrameCtx, StartCtx};
use splash_engine::paint::Color;
use splash_engine::render::{BlendMode, DrawParams, SpriteBatch, SpriteRenderer};
use splash_engine::text::{FontId, FontSystem};
use splash_engine::texture::Texture;

const PICTURE_PATH: &str = "assets/thumb.png";
const FONT_PATH: &str = "assets/DejaVuSans.ttf";
const FONT_SIZE_PX: f32 = 50.0;

const PORTRAIT_MESSAGE: &str = "Hello Portrait Mode!";
const LANDSCAPE_MESSAGE: &str = "Hello Landscape Mode!";
const STARTUP_MESSAGE: &str = "The quick brown fox jumps over the lazy dog";

/// Picks the status line and its color for the current drawable size.
/// A square viewport counts as portrait.
fn orientation_message(width: u32, height: u32) -> (&'static str, Color) {
    if height >= width {
        (PORTRAIT_MESSAGE, Color::from_rgb_u8(0, 0, 255))
    } else {
        (LANDSCAPE_MESSAGE, Color::from_rgb_u8(0, 255, 0))
    }
}

/// X or Y placing a texture extent centered inside a span.
fn centered(span: u32, extent: u32) -> f32 {
    (span as f32 - extent as f32) * 0.5
}

/// Y placing a texture extent flush with the bottom of a span.
fn bottom_aligned(span: u32, extent: u32) -> f32 {
    span as f32 - extent as f32
}

/// Loads the bundled font, logging the error that makes text get skipped.
fn load_bundled_font(fonts: &mut FontSystem, path: &str) -> Option<FontId> {
    match fonts.load_font_file(path) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("failed to load '{path}': {e}; text is skipped");
            None
        }
    }
}

/// True the first time only; the caller logs on true.
fn warn_once(flag: &mut bool) -> bool {
    !std::mem::replace(flag, true)
}

pub struct SplashApp {
    fonts: FontSystem,
    font: Option<FontId>,

    picture: Texture,
    text: Texture,

    batch: SpriteBatch,
    sprites: SpriteRenderer,

    text_render_warned: bool,
}

impl SplashApp {
    pub fn new() -> Self {
        Self {
            fonts: FontSystem::new(),
            font: None,
            picture: Texture::new(),
            text: Texture::new(),
            batch: SpriteBatch::new(),
            sprites: SpriteRenderer::new(),
            text_render_warned: false,
        }
    }
}

impl Default for SplashApp {
    fn default() -> Self {
        Self::new()
    }
}

impl App for SplashApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) {
        // Each asset fails independently; an empty texture draws nothing.
        if let Err(e) = self.picture.load_from_file(ctx.gpu, PICTURE_PATH) {
            log::warn!("failed to load '{PICTURE_PATH}': {e}");
        }
        self.picture.set_blend_mode(BlendMode::Alpha);

        self.font = load_bundled_font(&mut self.fonts, FONT_PATH);

        if let Some(font) = self.font {
            if let Err(e) = self.text.load_from_text(
                ctx.gpu,
                &self.fonts,
                font,
                FONT_SIZE_PX,
                STARTUP_MESSAGE,
                Color::BLACK,
            ) {
                log::warn!("failed to render startup text: {e}");
            }
            self.text.set_blend_mode(BlendMode::Alpha);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let size = ctx.gpu.size();
        let (message, color) = orientation_message(size.width, size.height);

        // The status text tracks orientation, so it is re-rendered every
        // frame. A failed re-render keeps showing the previous texture; the
        // inputs are fixed strings, so a repeat failure is the same failure
        // and is only warned about once.
        if let Some(font) = self.font {
            if let Err(e) =
                self.text
                    .load_from_text(ctx.gpu, &self.fonts, font, FONT_SIZE_PX, message, color)
            {
                if warn_once(&mut self.text_render_warned) {
                    log::warn!("text re-render failed: {e}");
                }
            }
        }

        self.batch.clear();
        self.picture.render(
            &mut self.batch,
            centered(size.width, self.picture.width()),
            bottom_aligned(size.height, self.picture.height()),
            DrawParams::default(),
        );
        self.text.render(
            &mut self.batch,
            centered(size.width, self.text.width()),
            centered(size.height, self.text.height()),
            DrawParams::default(),
        );

        let (batch, sprites) = (&self.batch, &mut self.sprites);
        ctx.render(Color::WHITE, |rctx, target| {
            sprites.render(rctx, target, batch);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── orientation selection ─────────────────────────────────────────────

    #[test]
    fn taller_than_wide_is_portrait_in_blue() {
        let (message, color) = orientation_message(480, 800);
        assert_eq!(message, PORTRAIT_MESSAGE);
        assert_eq!(color, Color::from_rgb_u8(0, 0, 255));
    }

    #[test]
    fn wider_than_tall_is_landscape_in_green() {
        let (message, color) = orientation_message(800, 480);
        assert_eq!(message, LANDSCAPE_MESSAGE);
        assert_eq!(color, Color::from_rgb_u8(0, 255, 0));
    }

    #[test]
    fn square_counts_as_portrait() {
        let (message, _) = orientation_message(512, 512);
        assert_eq!(message, PORTRAIT_MESSAGE);
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn picture_recenters_after_resize_to_800() {
        // A 644x396 image on an 800-wide drawable sits at (800 - 644) / 2.
        assert_eq!(centered(800, 644), 78.0);
    }

    #[test]
    fn centered_splits_the_margin_evenly() {
        assert_eq!(centered(640, 400), 120.0);
        assert_eq!(centered(641, 400), 120.5);
    }

    #[test]
    fn oversized_extent_centers_past_the_left_edge() {
        assert_eq!(centered(320, 400), -40.0);
    }

    #[test]
    fn bottom_aligned_touches_the_bottom_edge() {
        assert_eq!(bottom_aligned(600, 396), 204.0);
        assert_eq!(bottom_aligned(240, 396), -156.0);
    }

    // ── font loading ──────────────────────────────────────────────────────

    #[test]
    fn missing_bundled_font_skips_text() {
        let mut fonts = FontSystem::new();
        assert!(load_bundled_font(&mut fonts, "no/such/font.ttf").is_none());
    }

    #[test]
    fn bundled_font_parses() {
        let path = format!("{}/../../{FONT_PATH}", env!("CARGO_MANIFEST_DIR"));
        let mut fonts = FontSystem::new();
        assert!(load_bundled_font(&mut fonts, &path).is_some());
    }

    // ── repeated-failure warning ──────────────────────────────────────────

    #[test]
    fn warn_once_fires_exactly_once() {
        let mut flag = false;
        assert!(warn_once(&mut flag));
        assert!(!warn_once(&mut flag));
        assert!(!warn_once(&mut flag));
    }
}
