//! Rasterized pages tagged with their resolution.

use image::DynamicImage;

/// One rasterized document page.
///
/// The `ppi` tag is load-bearing: block geometry is expressed in pixels at a
/// declared resolution, and the same document may be rasterized twice at
/// different resolutions (one raster for layout detection and ordering, one
/// for text recognition). All cross-raster geometry goes through
/// [`crate::BBox::between_resolutions`] using these tags.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page raster
    pub image: DynamicImage,
    /// Resolution the raster was produced at, in pixels per inch
    pub ppi: f32,
}

impl PageImage {
    /// Wrap a raster with the resolution it was produced at.
    #[inline]
    #[must_use = "page image is created but not used"]
    pub fn new(image: DynamicImage, ppi: f32) -> Self {
        Self { image, ppi }
    }

    /// Raster width in pixels.
    #[inline]
    #[must_use = "width is computed but not used"]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Raster height in pixels.
    #[inline]
    #[must_use = "height is computed but not used"]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
