//! Quote-card presentation model.
//!
//! This crate holds the value types shared by the layout engine
//! (`quotecard-render`) and the pixel backend (`quotecard-raster`):
//! colors, the presentation snapshot read by the renderer, the built-in
//! quote catalog, and the share/download payload helpers.

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

mod color;
mod presentation;
mod quotes;
mod share;

pub use color::{ColorParseError, Rgba};
pub use presentation::{BackgroundMode, DecodedImage, ImageDataError, PresentationState};
pub use quotes::{builtin_quote, builtin_quotes, CustomQuoteError, Quote, BUILTIN_QUOTES};
pub use share::{download_file_name, download_file_name_now, SharePayload, TWEET_INTENT_ENDPOINT};
