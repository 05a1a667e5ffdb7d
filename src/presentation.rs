use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Background-image fill strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Scale the image to fully cover the canvas, cropping overflow
    /// while preserving aspect ratio.
    #[default]
    Cover,
    /// Tile the image at native resolution from the top-left corner.
    Repeat,
}

impl BackgroundMode {
    /// Parse the UI select values (`cover`/`repeat`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cover" => Some(Self::Cover),
            "repeat" => Some(Self::Repeat),
            _ => None,
        }
    }
}

/// Decoded RGBA8 image handle.
///
/// The pixel buffer is shared, so cloning a presentation snapshot for
/// an export never copies image data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl DecodedImage {
    /// Wrap a decoded RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageDataError> {
        if width == 0 || height == 0 {
            return Err(ImageDataError::EmptyDimensions { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(ImageDataError::EmptyDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(ImageDataError::PixelLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Coordinates are clamped into bounds so
    /// sampling loops never have to branch on the last row/column.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }
}

/// Presentation snapshot consumed by the renderer.
///
/// The renderer only reads a snapshot; interactive controls mutate
/// their own copy and hand a clone to each export. Overlapping exports
/// therefore never observe each other's edits.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentationState {
    /// Quote body, rendered as the upper text block.
    pub quote_text: String,
    /// Attribution line, rendered as the lower text block.
    pub author_text: String,
    /// Requested font family.
    pub font_family: String,
    /// Base font size in px; block fonts are derived from this via the
    /// profile scale factors. Must be positive.
    pub base_font_size_px: f32,
    /// Quote ink.
    pub quote_color: Rgba,
    /// Attribution ink.
    pub author_color: Rgba,
    /// Canvas fill behind everything else.
    pub background_color: Rgba,
    /// Optional decoded background image.
    pub background_image: Option<DecodedImage>,
    /// How the background image fills the canvas.
    pub background_mode: BackgroundMode,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            quote_text: String::new(),
            author_text: String::new(),
            font_family: "sans-serif".to_string(),
            base_font_size_px: 28.0,
            quote_color: Rgba::QUOTE_INK,
            author_color: Rgba::AUTHOR_INK,
            background_color: Rgba::BACKGROUND,
            background_image: None,
            background_mode: BackgroundMode::Cover,
        }
    }
}

impl PresentationState {
    /// Set both text blocks from a quote.
    pub fn with_quote(mut self, quote: &crate::quotes::Quote) -> Self {
        self.quote_text = quote.display_text();
        self.author_text = quote.display_author();
        self
    }

    /// Replace the background image, keeping the fill mode.
    pub fn with_background_image(mut self, image: Option<DecodedImage>) -> Self {
        self.background_image = image;
        self
    }
}

/// Error from wrapping decoded pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageDataError {
    /// Width or height was zero (or overflowed the byte count).
    EmptyDimensions { width: u32, height: u32 },
    /// Buffer length disagrees with `width * height * 4`.
    PixelLengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ImageDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimensions { width, height } => {
                write!(f, "image dimensions unusable: {}x{}", width, height)
            }
            Self::PixelLengthMismatch { expected, actual } => write!(
                f,
                "pixel buffer length mismatch (expected={} actual={})",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ImageDataError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, color: Rgba) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        DecodedImage::from_rgba8(width, height, pixels).unwrap()
    }

    #[test]
    fn image_rejects_mismatched_buffer() {
        assert_eq!(
            DecodedImage::from_rgba8(2, 2, vec![0u8; 15]),
            Err(ImageDataError::PixelLengthMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert!(matches!(
            DecodedImage::from_rgba8(0, 4, Vec::new()),
            Err(ImageDataError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn pixel_sampling_clamps_to_bounds() {
        let image = solid_image(2, 2, Rgba::opaque(9, 8, 7));
        assert_eq!(image.pixel(0, 0), Rgba::opaque(9, 8, 7));
        assert_eq!(image.pixel(99, 99), Rgba::opaque(9, 8, 7));
    }

    #[test]
    fn snapshot_clone_shares_image_pixels() {
        let image = solid_image(4, 4, Rgba::BACKGROUND);
        let state = PresentationState::default().with_background_image(Some(image));
        let copy = state.clone();
        assert_eq!(state, copy);
    }

    #[test]
    fn default_colors_match_the_contract() {
        let state = PresentationState::default();
        assert_eq!(state.background_color.to_hex(), "#ffffff");
        assert_eq!(state.quote_color.to_hex(), "#0b0c0f");
        assert_eq!(state.author_color.to_hex(), "#666a74");
    }

    #[test]
    fn background_mode_parses_select_values() {
        assert_eq!(BackgroundMode::parse("Cover"), Some(BackgroundMode::Cover));
        assert_eq!(BackgroundMode::parse(" repeat "), Some(BackgroundMode::Repeat));
        assert_eq!(BackgroundMode::parse("stretch"), None);
    }
}
