use quotecard::DecodedImage;
use quotecard_render::{CardScene, DrawCommand, ImagePlacement};

use crate::error::RenderError;
use crate::font::FontBackend;
use crate::surface::PixelSurface;

/// Execute a composed scene onto a freshly allocated surface.
///
/// Commands are painted in order, so the solid background fill always
/// lands before the image composite and the text rows.
pub fn render_scene(scene: &CardScene, backend: &dyn FontBackend) -> Result<PixelSurface, RenderError> {
    let mut surface = PixelSurface::new(scene.width, scene.height)?;
    for cmd in &scene.commands {
        match cmd {
            DrawCommand::Rect(rect) => {
                surface.fill_rect(rect.x, rect.y, rect.width, rect.height, rect.color);
            }
            DrawCommand::Image(cmd) => match cmd.placement {
                ImagePlacement::Cover {
                    dx,
                    dy,
                    draw_width,
                    draw_height,
                } => blit_cover(&mut surface, &cmd.image, dx, dy, draw_width, draw_height),
                ImagePlacement::Tile => blit_tile(&mut surface, &cmd.image),
            },
            DrawCommand::Text(text) => {
                backend.draw_text_run(&mut surface, text.x, text.top_y, &text.text, &text.style);
            }
        }
    }
    Ok(surface)
}

/// Nearest-neighbour blit of the scaled cover rectangle, clipped to
/// the canvas. The draw rectangle overflows one axis; only the
/// intersection is sampled.
fn blit_cover(
    surface: &mut PixelSurface,
    image: &DecodedImage,
    dx: i32,
    dy: i32,
    draw_width: u32,
    draw_height: u32,
) {
    if draw_width == 0 || draw_height == 0 {
        return;
    }
    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = dx.saturating_add(draw_width as i32).min(surface.width() as i32);
    let y1 = dy.saturating_add(draw_height as i32).min(surface.height() as i32);
    for y in y0..y1 {
        // Sample at the pixel center to keep edge rows symmetric.
        let v = (y - dy) as f32 + 0.5;
        let src_y = (v / draw_height as f32 * image.height() as f32) as u32;
        for x in x0..x1 {
            let u = (x - dx) as f32 + 0.5;
            let src_x = (u / draw_width as f32 * image.width() as f32) as u32;
            let pixel = image.pixel(src_x, src_y);
            surface.blend_pixel(x, y, pixel, 1.0);
        }
    }
}

/// Tile the image at native resolution from the top-left corner.
fn blit_tile(surface: &mut PixelSurface, image: &DecodedImage) {
    let (tile_w, tile_h) = (image.width(), image.height());
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let pixel = image.pixel(x % tile_w, y % tile_h);
            surface.blend_pixel(x as i32, y as i32, pixel, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotecard::Rgba;
    use quotecard_render::{cover_placement, CardScene, ImageCommand, RectCommand};

    fn checker_2x2() -> DecodedImage {
        // red | green / blue | white
        let pixels = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        DecodedImage::from_rgba8(2, 2, pixels).unwrap()
    }

    #[test]
    fn tile_fills_the_whole_canvas_without_scaling() {
        let mut scene = CardScene::new(6, 4);
        scene.push_command(DrawCommand::Rect(RectCommand {
            x: 0,
            y: 0,
            width: 6,
            height: 4,
            color: Rgba::BACKGROUND,
        }));
        scene.push_command(DrawCommand::Image(ImageCommand {
            image: checker_2x2(),
            placement: ImagePlacement::Tile,
        }));
        let surface = render_scene(&scene, &crate::font::MonoScaleBackend).unwrap();

        for y in 0..4u32 {
            for x in 0..6u32 {
                let expected = checker_2x2().pixel(x % 2, y % 2);
                assert_eq!(surface.pixel(x, y), expected, "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn cover_blit_fills_the_canvas_exactly() {
        let image = checker_2x2();
        let mut scene = CardScene::new(8, 4);
        scene.push_command(DrawCommand::Rect(RectCommand {
            x: 0,
            y: 0,
            width: 8,
            height: 4,
            color: Rgba::opaque(1, 2, 3),
        }));
        scene.push_command(DrawCommand::Image(ImageCommand {
            image,
            placement: cover_placement(2, 2, 8, 4),
        }));
        let surface = render_scene(&scene, &crate::font::MonoScaleBackend).unwrap();

        // A square image over a 2:1 canvas covers every pixel; none of
        // the underlying fill may remain visible.
        for y in 0..4u32 {
            for x in 0..8u32 {
                assert_ne!(surface.pixel(x, y), Rgba::opaque(1, 2, 3), "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn render_fails_for_unusable_canvas() {
        let scene = CardScene::new(0, 630);
        assert_eq!(
            render_scene(&scene, &crate::font::MonoScaleBackend),
            Err(RenderError::SurfaceUnavailable {
                width: 0,
                height: 630
            })
        );
    }
}
