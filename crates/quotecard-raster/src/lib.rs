//! Pixel backend for `quotecard-render` scenes.
//!
//! Executes a composed [`quotecard_render::CardScene`] onto an RGBA
//! surface (solid fills, background compositing, text runs), encodes
//! the result as PNG, and orchestrates the export pipeline including
//! the asynchronous background-decode step.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod compose;
mod error;
mod export;
mod font;
mod surface;

pub use compose::render_scene;
pub use error::RenderError;
#[cfg(feature = "async")]
pub use export::export_card_async;
pub use export::{
    decode_background, encode_png, export_card, export_card_default, RenderResult,
};
#[cfg(feature = "ttf-backend")]
pub use font::TtfBackend;
pub use font::{BackendTextMeasurer, FontBackend, MonoScaleBackend};
pub use surface::PixelSurface;
