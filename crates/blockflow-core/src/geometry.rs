//! Pixel-space bounding boxes and cross-resolution rescaling.
//!
//! Geometry is only meaningful relative to the resolution (pixels per inch)
//! the page was rasterized at. When a box detected at one resolution has to
//! address pixels in a raster produced at another, it goes through
//! [`BBox::between_resolutions`], which scales the box and widens it by a
//! symmetric content buffer with asymmetric rounding: floor on the min
//! corner, ceil on the max corner. The rescaled box is therefore never
//! smaller than the naively scaled one, so glyph strokes touching the box
//! boundary survive the resolution change.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates, top-left origin.
///
/// `(l, t)` is the min corner, `(r, b)` the max corner, both in pixels at
/// whatever resolution the surrounding context declares.
///
/// # Examples
///
/// ```
/// use blockflow_core::BBox;
///
/// let bbox = BBox::new(10.0, 20.0, 110.0, 70.0);
/// assert_eq!(bbox.width(), 100.0);
/// assert_eq!(bbox.height(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left x-coordinate (min corner)
    pub l: f32,
    /// Top y-coordinate (min corner)
    pub t: f32,
    /// Right x-coordinate (max corner)
    pub r: f32,
    /// Bottom y-coordinate (max corner)
    pub b: f32,
}

impl BBox {
    /// Create a new bounding box from min and max corners.
    #[inline]
    #[must_use = "bounding box is created but not used"]
    pub const fn new(l: f32, t: f32, r: f32, b: f32) -> Self {
        Self { l, t, r, b }
    }

    /// Box width in pixels.
    #[inline]
    #[must_use = "width is computed but not used"]
    pub fn width(&self) -> f32 {
        self.r - self.l
    }

    /// Box height in pixels.
    #[inline]
    #[must_use = "height is computed but not used"]
    pub fn height(&self) -> f32 {
        self.b - self.t
    }

    /// Rescale by `scale`, widened by a symmetric `buffer` (in source-space
    /// pixels) applied before scaling.
    ///
    /// Rounding is asymmetric: the min corner is floored, the max corner is
    /// ceiled, so the result always contains the naively scaled box. The
    /// identity transform (`scale == 1.0`, `buffer == 0.0`) returns the box
    /// unchanged, keeping same-resolution geometry bit-exact even for
    /// fractional coordinates.
    #[must_use = "returns the rescaled box, the original is unchanged"]
    pub fn rescaled(&self, scale: f32, buffer: f32) -> Self {
        if scale == 1.0 && buffer == 0.0 {
            return *self;
        }
        Self {
            l: ((self.l - buffer) * scale).floor(),
            t: ((self.t - buffer) * scale).floor(),
            r: ((self.r + buffer) * scale).ceil(),
            b: ((self.b + buffer) * scale).ceil(),
        }
    }

    /// Rescale from a raster at `ppi_from` to a raster at `ppi_to`.
    ///
    /// `buffer` is the symmetric content margin in source pixels; callers
    /// pass 0 when the two resolutions are equal (no rounding uncertainty to
    /// guard against) and a small positive margin otherwise.
    #[inline]
    #[must_use = "returns the rescaled box, the original is unchanged"]
    pub fn between_resolutions(&self, ppi_from: f32, ppi_to: f32, buffer: f32) -> Self {
        self.rescaled(ppi_to / ppi_from, buffer)
    }

    /// Intersect with a `width` x `height` page raster, guaranteeing a
    /// non-empty result that lies inside the raster.
    ///
    /// The buffer in [`BBox::rescaled`] can push corners past the page edge;
    /// cropping requires in-bounds integer pixel coordinates.
    #[must_use = "returns the clamped box, the original is unchanged"]
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let max_x = width as f32;
        let max_y = height as f32;
        let l = self.l.clamp(0.0, max_x - 1.0);
        let t = self.t.clamp(0.0, max_y - 1.0);
        let r = self.r.clamp(l + 1.0, max_x);
        let b = self.b.clamp(t + 1.0, max_y);
        Self { l, t, r, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identity_rescale_is_exact() {
        let bbox = BBox::new(10.5, 20.25, 110.75, 70.5);
        assert_eq!(bbox.rescaled(1.0, 0.0), bbox);
        assert_eq!(bbox.between_resolutions(150.0, 150.0, 0.0), bbox);
    }

    #[test]
    fn upscale_applies_floor_ceil_with_buffer() {
        // 72 -> 144 ppi doubles coordinates; buffer of 2 source pixels
        let bbox = BBox::new(10.0, 20.0, 110.0, 70.0);
        let scaled = bbox.between_resolutions(72.0, 144.0, 2.0);
        assert_eq!(scaled, BBox::new(16.0, 36.0, 224.0, 144.0));
    }

    #[test]
    fn downscale_still_contains_naive_scale() {
        let bbox = BBox::new(30.0, 45.0, 300.0, 450.0);
        let scale = 72.0 / 150.0;
        let scaled = bbox.between_resolutions(150.0, 72.0, 2.0);
        assert!(scaled.l <= bbox.l * scale);
        assert!(scaled.t <= bbox.t * scale);
        assert!(scaled.r >= bbox.r * scale);
        assert!(scaled.b >= bbox.b * scale);
    }

    #[test]
    fn clamp_keeps_box_inside_raster() {
        let bbox = BBox::new(-4.0, -2.0, 805.0, 601.0);
        let clamped = bbox.clamped(800, 600);
        assert_eq!(clamped, BBox::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn clamp_never_yields_an_empty_box() {
        // Entirely outside the raster: degenerates to a 1x1 sliver at the edge
        let bbox = BBox::new(900.0, 700.0, 950.0, 750.0);
        let clamped = bbox.clamped(800, 600);
        assert!(clamped.width() >= 1.0);
        assert!(clamped.height() >= 1.0);
        assert!(clamped.r <= 800.0 && clamped.b <= 600.0);
    }

    proptest! {
        #[test]
        fn rescaled_strictly_contains_naive_upscale(
            l in 0.0f32..2000.0,
            t in 0.0f32..2000.0,
            w in 1.0f32..500.0,
            h in 1.0f32..500.0,
            scale in 1.05f32..4.0,
        ) {
            let bbox = BBox::new(l, t, l + w, t + h);
            let scaled = bbox.rescaled(scale, 2.0);
            prop_assert!(scaled.l < bbox.l * scale);
            prop_assert!(scaled.t < bbox.t * scale);
            prop_assert!(scaled.r > bbox.r * scale);
            prop_assert!(scaled.b > bbox.b * scale);
        }
    }
}
