use std::sync::Arc;

use image::{ExtendedColorType, ImageEncoder};
use quotecard::{DecodedImage, PresentationState};
use quotecard_render::{CardLayout, ExportProfile};

use crate::compose::render_scene;
use crate::error::RenderError;
use crate::font::{BackendTextMeasurer, FontBackend, MonoScaleBackend};
use crate::surface::PixelSurface;

/// Finished export: encoded PNG bytes plus their pixel dimensions.
///
/// Owned by the caller once returned; the renderer keeps no reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Encode a surface as PNG bytes.
pub fn encode_png(surface: &PixelSurface) -> Result<Vec<u8>, RenderError> {
    let mut out = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut out);
    encoder
        .write_image(
            surface.data(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| RenderError::EncodeFailed(err.to_string()))?;
    Ok(out)
}

/// Decode caller-supplied background bytes.
///
/// Decode failure is deliberately swallowed: the export degrades to
/// "no background image" and proceeds, matching the widget's original
/// behavior. The failure is only logged.
pub fn decode_background(bytes: &[u8]) -> Option<DecodedImage> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            match DecodedImage::from_rgba8(width, height, rgba.into_raw()) {
                Ok(image) => Some(image),
                Err(err) => {
                    log::warn!("background image rejected: {}", err);
                    None
                }
            }
        }
        Err(err) => {
            log::warn!("background image decode failed: {}", err);
            None
        }
    }
}

/// Render one presentation snapshot at `profile` and encode it as PNG.
///
/// The backend provides both glyph widths (for wrapping/centering) and
/// glyph drawing, so layout and raster agree on every line break.
pub fn export_card<B>(
    state: &PresentationState,
    profile: ExportProfile,
    backend: B,
) -> Result<RenderResult, RenderError>
where
    B: FontBackend + Clone + 'static,
{
    let layout = CardLayout::new(profile)
        .with_text_measurer(Arc::new(BackendTextMeasurer::with_backend(backend.clone())));
    let scene = layout.compose(state);
    let surface = render_scene(&scene, &backend)?;
    let png = encode_png(&surface)?;
    Ok(RenderResult {
        png,
        width: surface.width(),
        height: surface.height(),
    })
}

/// Export with the default mono backend.
pub fn export_card_default(
    state: &PresentationState,
    profile: ExportProfile,
) -> Result<RenderResult, RenderError> {
    export_card(state, profile, MonoScaleBackend)
}

/// Await the background decode off-thread, then run the synchronous
/// draw-and-encode stage.
///
/// This is the pipeline's single suspension point. Both decode
/// outcomes proceed to drawing: failure (or a cancelled decode task)
/// degrades to the solid color fill. `background_bytes`, when present,
/// replaces any image already attached to the snapshot.
#[cfg(feature = "async")]
pub async fn export_card_async<B>(
    state: &PresentationState,
    background_bytes: Option<Vec<u8>>,
    profile: ExportProfile,
    backend: B,
) -> Result<RenderResult, RenderError>
where
    B: FontBackend + Clone + 'static,
{
    let mut snapshot = state.clone();
    if let Some(bytes) = background_bytes {
        let decoded = tokio::task::spawn_blocking(move || decode_background(&bytes))
            .await
            .unwrap_or_else(|err| {
                log::warn!("background decode task failed: {}", err);
                None
            });
        snapshot.background_image = decoded;
    }
    export_card(&snapshot, profile, backend)
}
