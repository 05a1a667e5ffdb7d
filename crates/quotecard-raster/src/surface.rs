use quotecard::Rgba;

use crate::error::RenderError;

/// Upper bound on surface allocation: 16 MP is roughly 64 MiB of RGBA
/// and far above both shipped profiles.
const MAX_SURFACE_PIXELS: usize = 16_000_000;

/// Offscreen RGBA8 raster surface, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelSurface {
    /// Allocate a zeroed surface.
    ///
    /// Zero-sized or over-budget canvases fail with
    /// [`RenderError::SurfaceUnavailable`].
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixels = (width as usize).checked_mul(height as usize);
        match pixels {
            Some(count) if count > 0 && count <= MAX_SURFACE_PIXELS => Ok(Self {
                width,
                height,
                data: vec![0; count * 4],
            }),
            _ => Err(RenderError::SurfaceUnavailable { width, height }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`; out-of-bounds reads return transparent
    /// black.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width || y >= self.height {
            return Rgba { r: 0, g: 0, b: 0, a: 0 };
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Rgba {
            r: self.data[idx],
            g: self.data[idx + 1],
            b: self.data[idx + 2],
            a: self.data[idx + 3],
        }
    }

    fn write_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let idx = (y * self.width as usize + x) * 4;
        self.data[idx] = color.r;
        self.data[idx + 1] = color.g;
        self.data[idx + 2] = color.b;
        self.data[idx + 3] = color.a;
    }

    /// Fill a rectangle, clipped to the surface bounds. The rectangle
    /// origin may be negative (cover-mode overflow).
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = x
            .saturating_add(width as i32)
            .clamp(0, self.width as i32) as usize;
        let y1 = y
            .saturating_add(height as i32)
            .clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                self.write_pixel(col, row, color);
            }
        }
    }

    /// Source-over blend of `color` at `(x, y)` with extra coverage in
    /// `[0, 1]` (glyph anti-aliasing, image alpha). Out-of-bounds
    /// writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = (f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0)).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let dst = self.pixel(x as u32, y as u32);
        let blend = |src: u8, dst: u8| -> u8 {
            (f32::from(src) * alpha + f32::from(dst) * (1.0 - alpha)).round() as u8
        };
        let out = Rgba {
            r: blend(color.r, dst.r),
            g: blend(color.g, dst.g),
            b: blend(color.b, dst.b),
            a: ((alpha + f32::from(dst.a) / 255.0 * (1.0 - alpha)) * 255.0).round() as u8,
        };
        self.write_pixel(x, y, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sized_surfaces() {
        assert_eq!(
            PixelSurface::new(0, 630),
            Err(RenderError::SurfaceUnavailable {
                width: 0,
                height: 630
            })
        );
        assert_eq!(
            PixelSurface::new(1200, 0),
            Err(RenderError::SurfaceUnavailable {
                width: 1200,
                height: 0
            })
        );
    }

    #[test]
    fn rejects_over_budget_surfaces() {
        assert!(matches!(
            PixelSurface::new(100_000, 100_000),
            Err(RenderError::SurfaceUnavailable { .. })
        ));
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut surface = PixelSurface::new(4, 4).unwrap();
        surface.fill_rect(-2, -2, 4, 4, Rgba::opaque(10, 20, 30));
        assert_eq!(surface.pixel(0, 0), Rgba::opaque(10, 20, 30));
        assert_eq!(surface.pixel(1, 1), Rgba::opaque(10, 20, 30));
        assert_eq!(surface.pixel(2, 2).a, 0);
    }

    #[test]
    fn blend_full_coverage_replaces_color() {
        let mut surface = PixelSurface::new(2, 2).unwrap();
        surface.fill_rect(0, 0, 2, 2, Rgba::BACKGROUND);
        surface.blend_pixel(1, 1, Rgba::QUOTE_INK, 1.0);
        assert_eq!(surface.pixel(1, 1), Rgba::QUOTE_INK);
        // Out-of-bounds writes are dropped, not wrapped.
        surface.blend_pixel(5, 5, Rgba::QUOTE_INK, 1.0);
        assert_eq!(surface.pixel(0, 0), Rgba::BACKGROUND);
    }

    #[test]
    fn blend_half_coverage_mixes_channels() {
        let mut surface = PixelSurface::new(1, 1).unwrap();
        surface.fill_rect(0, 0, 1, 1, Rgba::opaque(0, 0, 0));
        surface.blend_pixel(0, 0, Rgba::opaque(255, 255, 255), 0.5);
        let mixed = surface.pixel(0, 0);
        assert!(mixed.r > 120 && mixed.r < 135);
    }
}
