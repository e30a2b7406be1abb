//! Rasterized output surface.

use std::fmt;

use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use crate::error::{RenderError, RenderResult};

/// An RGBA bitmap produced by the renderer.
///
/// Pixel data is premultiplied RGBA, row-major, four bytes per pixel.
#[derive(Clone)]
pub struct Bitmap {
    pixmap: Pixmap,
}

impl Bitmap {
    pub(crate) fn surface(width: u32, height: u32) -> RenderResult<Pixmap> {
        Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })
    }

    pub(crate) const fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub(crate) const fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Composite this bitmap over an opaque background color.
    ///
    /// Transparent regions (erased pixels) take the background color.
    ///
    /// # Errors
    ///
    /// Returns an error if the output surface cannot be allocated.
    pub fn flatten(&self, rgb: [u8; 3]) -> RenderResult<Self> {
        let mut out = Self::surface(self.width(), self.height())?;
        out.fill(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255));
        out.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(Self::from_pixmap(out))
    }

    /// Whether every pixel is fully opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.data().chunks_exact(4).all(|px| px[3] == u8::MAX)
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.data() == other.data()
    }
}

impl Eq for Bitmap {}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_fills_transparent_pixels() {
        let pixmap = Bitmap::surface(4, 4).expect("pixmap");
        let bitmap = Bitmap::from_pixmap(pixmap);
        assert_eq!(bitmap.pixel(0, 0), Some([0, 0, 0, 0]));
        assert!(!bitmap.is_opaque());

        let flat = bitmap.flatten([255, 255, 255]).expect("flatten");
        assert_eq!(flat.pixel(3, 3), Some([255, 255, 255, 255]));
        assert!(flat.is_opaque());
    }

    #[test]
    fn zero_sized_surface_is_an_error() {
        assert!(matches!(
            Bitmap::surface(0, 10),
            Err(RenderError::Surface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn out_of_bounds_pixel_is_none() {
        let bitmap = Bitmap::from_pixmap(Bitmap::surface(2, 2).expect("pixmap"));
        assert_eq!(bitmap.pixel(2, 0), None);
    }
}
