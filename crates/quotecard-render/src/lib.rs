//! Card IR and layout engine for `quotecard`.
//!
//! The layout stage is pure: it turns a presentation snapshot plus an
//! export profile into a backend-agnostic [`CardScene`] of draw
//! commands. Pixel work (fonts, blitting, encoding) lives in the
//! `quotecard-raster` backend crate.

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

mod card_ir;
mod layout;
mod profile;

pub use card_ir::{
    cover_placement, CardScene, DrawCommand, ImageCommand, ImagePlacement, RectCommand,
    ResolvedTextStyle, TextCommand,
};
pub use layout::{wrap_text, CardLayout, HeuristicMeasurer, TextMeasurer};
pub use profile::{ExportProfile, ProfileError, ProfileId};
