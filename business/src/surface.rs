use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// Square RGBA render target, `dimension × dimension` pixels.
///
/// Each render cycle owns its surface exclusively; once finished it is shared
/// read-only behind an `Arc` for the preview and the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSurface {
    image: RgbaImage,
}

impl RenderedSurface {
    /// A fully transparent surface.
    pub fn new(dimension: u32) -> Self {
        Self {
            image: RgbaImage::new(dimension, dimension),
        }
    }

    /// Resizes if needed and clears every pixel, so nothing from the previous
    /// render survives.
    pub fn reset(&mut self, dimension: u32) {
        if self.dimension() == dimension {
            self.clear();
        } else {
            self.image = RgbaImage::new(dimension, dimension);
        }
    }

    pub fn clear(&mut self) {
        self.fill(Rgba([0, 0, 0, 0]));
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn dimension(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}
