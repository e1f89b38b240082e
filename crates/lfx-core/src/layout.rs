//! Lenslet layout: the mapping between 4D rays and 2D sensor pixels.
//!
//! A lenslet image tiles the sensor into `U x V` blocks, one per micro-lens.
//! Inside a block each pixel sees the scene from a different angle, so the
//! ray `(x, y, u, v)` lives at sensor pixel `(x * U + u, y * V + v)`.
//!
//! ```text
//!        lenslet x=0        lenslet x=1
//!      +---+---+---+    +---+---+---+
//! y=0  |u0 |u1 |u2 | .. |u0 |u1 |u2 |   v=0
//!      |u0 |u1 |u2 | .. |u0 |u1 |u2 |   v=1
//!      +---+---+---+    +---+---+---+
//! ```
//!
//! Every read and write of a light field goes through [`LensletLayout::ray_to_pixel`],
//! so this is the only place the convention is spelled out.

use crate::{Error, Result};

/// Spatial and angular extents of a lenslet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LensletLayout {
    x_size: usize,
    y_size: usize,
    u_size: usize,
    v_size: usize,
}

impl LensletLayout {
    /// Builds the layout for an image of `width x height` pixels tiled by
    /// `u_size x v_size` lenslets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LensletMismatch`] if a lenslet extent is zero or
    /// doesn't divide the matching image extent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfx_core::LensletLayout;
    ///
    /// let layout = LensletLayout::new(64, 48, 16, 16).unwrap();
    /// assert_eq!((layout.x_size(), layout.y_size()), (4, 3));
    /// assert!(LensletLayout::new(64, 48, 10, 16).is_err());
    /// ```
    pub fn new(width: usize, height: usize, u_size: usize, v_size: usize) -> Result<Self> {
        if u_size == 0 || v_size == 0 || width % u_size != 0 || height % v_size != 0 {
            return Err(Error::lenslet_mismatch(width, height, u_size, v_size));
        }
        let x_size = width / u_size;
        let y_size = height / v_size;
        if x_size == 0 || y_size == 0 {
            return Err(Error::lenslet_mismatch(width, height, u_size, v_size));
        }
        Ok(Self {
            x_size,
            y_size,
            u_size,
            v_size,
        })
    }

    /// Spatial width (number of lenslets across).
    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Spatial height (number of lenslets down).
    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Angular width (pixels per lenslet across).
    #[inline]
    pub fn u_size(&self) -> usize {
        self.u_size
    }

    /// Angular height (pixels per lenslet down).
    #[inline]
    pub fn v_size(&self) -> usize {
        self.v_size
    }

    /// Number of subaperture views, `U * V`.
    #[inline]
    pub fn view_count(&self) -> usize {
        self.u_size * self.v_size
    }

    /// Width of the underlying lenslet image.
    #[inline]
    pub fn image_width(&self) -> usize {
        self.x_size * self.u_size
    }

    /// Height of the underlying lenslet image.
    #[inline]
    pub fn image_height(&self) -> usize {
        self.y_size * self.v_size
    }

    /// Maps a ray to its sensor pixel.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the layout; an out-of-range `u`
    /// would otherwise alias a neighbouring lenslet.
    #[inline]
    pub fn ray_to_pixel(&self, x: usize, y: usize, u: usize, v: usize) -> (usize, usize) {
        assert!(
            x < self.x_size && y < self.y_size && u < self.u_size && v < self.v_size,
            "ray ({x}, {y}, {u}, {v}) outside {}x{}x{}x{}",
            self.x_size,
            self.y_size,
            self.u_size,
            self.v_size
        );
        (x * self.u_size + u, y * self.v_size + v)
    }

    /// Maps a sensor pixel back to its ray. Inverse of [`ray_to_pixel`](Self::ray_to_pixel).
    #[inline]
    pub fn pixel_to_ray(&self, px: usize, py: usize) -> (usize, usize, usize, usize) {
        (
            px / self.u_size,
            py / self.v_size,
            px % self.u_size,
            py % self.v_size,
        )
    }

    /// Angular offset of view `(u, v)` from the aperture center.
    ///
    /// `(u - (U-1)/2, v - (V-1)/2)`; the center view of an odd lenslet is `(0, 0)`.
    #[inline]
    pub fn centered_offset(&self, u: usize, v: usize) -> (f32, f32) {
        (
            u as f32 - (self.u_size as f32 - 1.0) * 0.5,
            v as f32 - (self.v_size as f32 - 1.0) * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents() {
        let layout = LensletLayout::new(30, 12, 3, 4).unwrap();
        assert_eq!(layout.x_size(), 10);
        assert_eq!(layout.y_size(), 3);
        assert_eq!(layout.view_count(), 12);
        assert_eq!((layout.image_width(), layout.image_height()), (30, 12));
    }

    #[test]
    fn test_rejects_bad_lenslets() {
        assert!(LensletLayout::new(30, 12, 0, 4).is_err());
        assert!(LensletLayout::new(30, 12, 4, 4).is_err());
        assert!(LensletLayout::new(30, 12, 3, 5).is_err());
    }

    #[test]
    fn test_mapping_is_bijective() {
        let layout = LensletLayout::new(12, 6, 3, 2).unwrap();
        let mut seen = vec![false; 12 * 6];
        for y in 0..layout.y_size() {
            for x in 0..layout.x_size() {
                for v in 0..layout.v_size() {
                    for u in 0..layout.u_size() {
                        let (px, py) = layout.ray_to_pixel(x, y, u, v);
                        assert!(px < 12 && py < 6);
                        assert!(!seen[py * 12 + px], "pixel ({px}, {py}) hit twice");
                        seen[py * 12 + px] = true;
                        assert_eq!(layout.pixel_to_ray(px, py), (x, y, u, v));
                    }
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_known_positions() {
        let layout = LensletLayout::new(16, 16, 4, 4).unwrap();
        assert_eq!(layout.ray_to_pixel(0, 0, 0, 0), (0, 0));
        assert_eq!(layout.ray_to_pixel(1, 0, 2, 0), (6, 0));
        assert_eq!(layout.ray_to_pixel(3, 2, 1, 3), (13, 11));
    }

    #[test]
    fn test_centered_offset() {
        let odd = LensletLayout::new(9, 9, 3, 3).unwrap();
        assert_eq!(odd.centered_offset(1, 1), (0.0, 0.0));
        assert_eq!(odd.centered_offset(0, 2), (-1.0, 1.0));

        let even = LensletLayout::new(4, 4, 4, 4).unwrap();
        assert_eq!(even.centered_offset(0, 3), (-1.5, 1.5));
    }
}
