use std::borrow::Cow;
use std::sync::Arc;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X13, FONT_7X14, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::{Drawable, Pixel};
use quotecard::Rgba;
use quotecard_render::{ResolvedTextStyle, TextMeasurer};

use crate::surface::PixelSurface;

/// Font abstraction used by the raster text path.
///
/// Measurement and drawing must agree: wrap decisions made against
/// `measure_text_px` are rendered by `draw_text_run` with the same
/// width model.
pub trait FontBackend: Send + Sync {
    /// Width in px of `text` at the style's size.
    fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32;

    /// Draw one text run with its top-left corner at `(x, top_y)`.
    fn draw_text_run(&self, surface: &mut PixelSurface, x: i32, top_y: i32, text: &str, style: &ResolvedTextStyle);
}

/// Default backend: bitmap mono fonts scaled by an integer factor
/// toward the requested pixel size.
///
/// Fully deterministic and self-contained, so it doubles as the test
/// backend. Card-sized text (40-60 px) renders at 2-3x `FONT_10X20`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoScaleBackend;

impl MonoScaleBackend {
    fn face_and_scale(size_px: f32) -> (&'static MonoFont<'static>, u32) {
        let target = size_px.max(1.0);
        let face: &'static MonoFont<'static> = if target >= 20.0 {
            &FONT_10X20
        } else if target >= 17.0 {
            &FONT_9X18
        } else if target >= 13.0 {
            &FONT_7X14
        } else {
            &FONT_6X13
        };
        let glyph_height = face.character_size.height as f32;
        let scale = (target / glyph_height).round().max(1.0) as u32;
        (face, scale)
    }
}

impl FontBackend for MonoScaleBackend {
    fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32 {
        let (face, scale) = Self::face_and_scale(style.size_px);
        let advance = face.character_size.width * scale;
        let normalized = normalize_for_mono(text);
        (normalized.chars().count() as u32 * advance) as f32
    }

    fn draw_text_run(&self, surface: &mut PixelSurface, x: i32, top_y: i32, text: &str, style: &ResolvedTextStyle) {
        let (face, scale) = Self::face_and_scale(style.size_px);
        let normalized = normalize_for_mono(text);
        let mono_style = MonoTextStyle::new(face, BinaryColor::On);
        let mut target = ScaledTarget {
            surface,
            color: style.color,
            scale,
            origin_x: x,
            origin_y: top_y,
        };
        // Local coordinates are pre-scale; the target expands each
        // glyph pixel into a scale x scale block.
        let _ = Text::with_baseline(normalized.as_ref(), Point::zero(), mono_style, Baseline::Top)
            .draw(&mut target);
    }
}

/// Replace typographic characters the bitmap faces lack.
fn normalize_for_mono(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            _ if ch.is_ascii() => out.push(ch),
            _ => out.push('?'),
        }
    }
    Cow::Owned(out)
}

/// DrawTarget adapter expanding each font pixel into a scaled block on
/// the surface.
struct ScaledTarget<'a> {
    surface: &'a mut PixelSurface,
    color: Rgba,
    scale: u32,
    origin_x: i32,
    origin_y: i32,
}

impl OriginDimensions for ScaledTarget<'_> {
    fn size(&self) -> Size {
        Size::new(
            (self.surface.width() / self.scale).max(1),
            (self.surface.height() / self.scale).max(1),
        )
    }
}

impl DrawTarget for ScaledTarget<'_> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let scale = self.scale as i32;
        for Pixel(point, color) in pixels {
            if color == BinaryColor::On {
                self.surface.fill_rect(
                    self.origin_x + point.x * scale,
                    self.origin_y + point.y * scale,
                    self.scale,
                    self.scale,
                    self.color,
                );
            }
        }
        Ok(())
    }
}

/// `TextMeasurer` adapter backed by a raster font backend.
///
/// Installing this on the layout keeps wrap decisions consistent with
/// what the backend will actually draw.
#[derive(Clone, Debug)]
pub struct BackendTextMeasurer<B = MonoScaleBackend> {
    backend: B,
}

impl BackendTextMeasurer<MonoScaleBackend> {
    /// Default measurer over the mono backend.
    pub fn new() -> Self {
        Self {
            backend: MonoScaleBackend,
        }
    }

    /// Shared measurer trait object for layout wiring.
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self::new())
    }
}

impl Default for BackendTextMeasurer<MonoScaleBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> BackendTextMeasurer<B>
where
    B: FontBackend,
{
    /// Measurer over an explicit backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}

impl<B> TextMeasurer for BackendTextMeasurer<B>
where
    B: FontBackend,
{
    fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32 {
        self.backend.measure_text_px(text, style)
    }
}

#[cfg(feature = "ttf-backend")]
pub use ttf::TtfBackend;

#[cfg(feature = "ttf-backend")]
mod ttf {
    use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont};
    use quotecard_render::ResolvedTextStyle;

    use super::{FontBackend, MonoScaleBackend};
    use crate::surface::PixelSurface;

    /// TTF/OTF backend over registered faces.
    ///
    /// Styles are matched against the comma-separated family stack;
    /// with no matching face the first registered face is used, and
    /// with no faces at all the mono backend takes over.
    #[derive(Clone, Debug, Default)]
    pub struct TtfBackend {
        faces: Vec<(String, FontArc)>,
        mono_fallback: MonoScaleBackend,
    }

    impl TtfBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a face under a family name.
        pub fn register_face(&mut self, family: &str, data: Vec<u8>) -> Result<(), InvalidFont> {
            let font = FontArc::try_from_vec(data)?;
            self.faces.push((family.trim().to_ascii_lowercase(), font));
            Ok(())
        }

        pub fn face_count(&self) -> usize {
            self.faces.len()
        }

        fn face_for(&self, family_stack: &str) -> Option<&FontArc> {
            for token in family_stack.split(',') {
                let token = token.trim().trim_matches('\'').trim_matches('"');
                let token = token.to_ascii_lowercase();
                if let Some((_, font)) = self.faces.iter().find(|(name, _)| *name == token) {
                    return Some(font);
                }
            }
            self.faces.first().map(|(_, font)| font)
        }
    }

    impl FontBackend for TtfBackend {
        fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32 {
            let Some(font) = self.face_for(&style.family) else {
                return self.mono_fallback.measure_text_px(text, style);
            };
            let scaled = font.as_scaled(PxScale::from(style.size_px));
            text.chars()
                .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
                .sum()
        }

        fn draw_text_run(&self, surface: &mut PixelSurface, x: i32, top_y: i32, text: &str, style: &ResolvedTextStyle) {
            let Some(font) = self.face_for(&style.family) else {
                self.mono_fallback.draw_text_run(surface, x, top_y, text, style);
                return;
            };
            let scaled = font.as_scaled(PxScale::from(style.size_px));
            let baseline_y = top_y as f32 + scaled.ascent();
            let mut caret = x as f32;
            for ch in text.chars() {
                let glyph_id = scaled.glyph_id(ch);
                let glyph = glyph_id
                    .with_scale_and_position(PxScale::from(style.size_px), ab_glyph::point(caret, baseline_y));
                if let Some(outline) = font.outline_glyph(glyph) {
                    let bounds = outline.px_bounds();
                    outline.draw(|gx, gy, coverage| {
                        surface.blend_pixel(
                            bounds.min.x as i32 + gx as i32,
                            bounds.min.y as i32 + gy as i32,
                            style.color,
                            coverage,
                        );
                    });
                }
                caret += scaled.h_advance(glyph_id);
            }
        }
    }
}
