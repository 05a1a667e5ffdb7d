use std::sync::Arc;

use quotecard::{DecodedImage, Rgba};

/// Resolved style for one text block.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTextStyle {
    /// Requested family, passed through to the font backend.
    pub family: Arc<str>,
    /// Size in px (already scaled and rounded for the block).
    pub size_px: f32,
    /// Fill color.
    pub color: Rgba,
}

/// Text draw command. Rows are top-anchored; the layout advances
/// `top_y` by the block line height, not by glyph metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct TextCommand {
    /// Left x.
    pub x: i32,
    /// Top y; may be negative when content overflows the canvas.
    pub top_y: i32,
    /// Content.
    pub text: String,
    /// Resolved style.
    pub style: ResolvedTextStyle,
}

/// Filled rectangle command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectCommand {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: Rgba,
}

/// Background-image placement resolved during composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImagePlacement {
    /// Scaled draw rectangle covering the canvas; overflows one axis
    /// and is center-cropped by the backend clip.
    Cover {
        dx: i32,
        dy: i32,
        draw_width: u32,
        draw_height: u32,
    },
    /// Native-resolution tiling from the top-left corner.
    Tile,
}

/// Background image command.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageCommand {
    pub image: DecodedImage,
    pub placement: ImagePlacement,
}

/// Scene draw commands in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle.
    Rect(RectCommand),
    /// Composite the background image.
    Image(ImageCommand),
    /// Draw a text row.
    Text(TextCommand),
}

/// One composed card as backend-agnostic draw commands.
#[derive(Clone, Debug, PartialEq)]
pub struct CardScene {
    /// Canvas width in px.
    pub width: u32,
    /// Canvas height in px.
    pub height: u32,
    /// Commands in paint order (background first).
    pub commands: Vec<DrawCommand>,
}

impl CardScene {
    /// Empty scene for a canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(8),
        }
    }

    pub fn push_command(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Text commands in paint order.
    pub fn text_commands(&self) -> impl Iterator<Item = &TextCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }
}

/// Cover-mode draw rectangle for an image over a canvas.
///
/// The image is scaled uniformly so the canvas is fully covered, then
/// centered so the overflowing axis is cropped evenly on both sides.
pub fn cover_placement(
    image_width: u32,
    image_height: u32,
    canvas_width: u32,
    canvas_height: u32,
) -> ImagePlacement {
    let img_ratio = image_width as f32 / image_height.max(1) as f32;
    let canvas_ratio = canvas_width as f32 / canvas_height.max(1) as f32;
    let (draw_width, draw_height) = if img_ratio > canvas_ratio {
        // Wider than the canvas: fit height, overflow width.
        let h = canvas_height as f32;
        (img_ratio * h, h)
    } else {
        // Taller (or equal): fit width, overflow height.
        let w = canvas_width as f32;
        (w, w / img_ratio.max(f32::MIN_POSITIVE))
    };
    let dx = ((canvas_width as f32 - draw_width) / 2.0).round() as i32;
    let dy = ((canvas_height as f32 - draw_height) / 2.0).round() as i32;
    ImagePlacement::Cover {
        dx,
        dy,
        draw_width: draw_width.round() as u32,
        draw_height: draw_height.round() as u32,
    }
}
