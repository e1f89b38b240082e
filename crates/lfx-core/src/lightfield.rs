//! 4D light field views over a lenslet image.
//!
//! A [`LightField`] borrows an [`Image`] and reads it through a
//! [`LensletLayout`], exposing `(x, y, u, v, channel)` addressing:
//!
//! - [`LightField::at`] - exact lattice lookup
//! - [`LightField::sample4d`] - quadrilinear interpolation between the 16
//!   surrounding lattice points, clamped at the borders
//! - [`LightField::sample_nearest`] - rounded, clamped lattice lookup
//!
//! [`LightFieldMut`] is the writable counterpart used when a light field is
//! edited in place.
//!
//! # Example
//!
//! ```rust
//! use lfx_core::{Image, LightField};
//!
//! let mut image = Image::new(4, 4, 1, 1);
//! image.set(1, 0, 0, 0, 1.0); // ray (x=0, y=0, u=1, v=0) with 2x2 lenslets
//!
//! let lf = LightField::new(&image, 2, 2).unwrap();
//! assert_eq!(lf.at(0, 0, 1, 0, 0), 1.0);
//!
//! let mut out = [0.0f32];
//! lf.sample4d(0.0, 0.0, 0.5, 0.0, 0, &mut out);
//! assert_eq!(out[0], 0.5);
//! ```

use crate::{Image, LensletLayout, Result};

/// Read-only light field view.
#[derive(Debug, Clone, Copy)]
pub struct LightField<'a> {
    image: &'a Image,
    layout: LensletLayout,
}

/// Per-axis interpolation footprint: the two bracketing lattice indices
/// (already clamped) and the weight of the upper one.
#[derive(Debug, Clone, Copy)]
struct AxisSpan {
    lo: usize,
    hi: usize,
    frac: f32,
}

impl AxisSpan {
    #[inline]
    fn new(coord: f32, extent: usize) -> Self {
        let floor = coord.floor();
        let max = extent as isize - 1;
        let base = floor as isize;
        Self {
            lo: base.clamp(0, max) as usize,
            hi: base.saturating_add(1).clamp(0, max) as usize,
            frac: coord - floor,
        }
    }
}

/// Rounds to the nearest lattice index and clamps into `[0, extent)`.
#[inline]
fn nearest_index(coord: f32, extent: usize) -> usize {
    ((coord + 0.5).floor() as isize).clamp(0, extent as isize - 1) as usize
}

impl<'a> LightField<'a> {
    /// Wraps `image` as a light field with `u_size x v_size` lenslets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LensletMismatch`](crate::Error::LensletMismatch) if the
    /// image isn't tiled exactly by the lenslets.
    pub fn new(image: &'a Image, u_size: usize, v_size: usize) -> Result<Self> {
        let layout = LensletLayout::new(image.width(), image.height(), u_size, v_size)?;
        Ok(Self { image, layout })
    }

    /// The underlying lenslet image.
    #[inline]
    pub fn image(&self) -> &'a Image {
        self.image
    }

    /// The lenslet layout.
    #[inline]
    pub fn layout(&self) -> LensletLayout {
        self.layout
    }

    /// Spatial width `X`.
    #[inline]
    pub fn x_size(&self) -> usize {
        self.layout.x_size()
    }

    /// Spatial height `Y`.
    #[inline]
    pub fn y_size(&self) -> usize {
        self.layout.y_size()
    }

    /// Angular width `U`.
    #[inline]
    pub fn u_size(&self) -> usize {
        self.layout.u_size()
    }

    /// Angular height `V`.
    #[inline]
    pub fn v_size(&self) -> usize {
        self.layout.v_size()
    }

    /// Channel count `C`.
    #[inline]
    pub fn channels(&self) -> usize {
        self.image.channels()
    }

    /// Frame count of the underlying image.
    #[inline]
    pub fn frames(&self) -> usize {
        self.image.frames()
    }

    /// Sample at ray `(x, y, u, v)`, channel `c`, frame 0.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[inline]
    pub fn at(&self, x: usize, y: usize, u: usize, v: usize, c: usize) -> f32 {
        self.at_frame(x, y, u, v, 0, c)
    }

    /// Sample at ray `(x, y, u, v)`, channel `c`, frame `t`.
    #[inline]
    pub fn at_frame(&self, x: usize, y: usize, u: usize, v: usize, t: usize, c: usize) -> f32 {
        let (px, py) = self.layout.ray_to_pixel(x, y, u, v);
        self.image.get(px, py, t, c)
    }

    /// All channels at ray `(x, y, u, v)` in frame `t`.
    #[inline]
    pub fn ray(&self, x: usize, y: usize, u: usize, v: usize, t: usize) -> &'a [f32] {
        let (px, py) = self.layout.ray_to_pixel(x, y, u, v);
        self.image.pixel(px, py, t)
    }

    /// Quadrilinear sample at continuous `(x, y, u, v)` in frame `t`.
    ///
    /// Writes one value per channel into `out[..channels]`. Each of the 16
    /// bracketing lattice points is weighted by the product of its four
    /// per-axis linear weights; lattice indices past either border are clamped
    /// to the edge, so any finite coordinate is valid.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the channel count or `t` is out of range.
    pub fn sample4d(&self, x: f32, y: f32, u: f32, v: f32, t: usize, out: &mut [f32]) {
        let out = &mut out[..self.channels()];
        out.fill(0.0);

        let spans = [
            AxisSpan::new(x, self.x_size()),
            AxisSpan::new(y, self.y_size()),
            AxisSpan::new(u, self.u_size()),
            AxisSpan::new(v, self.v_size()),
        ];

        // Bit `a` of `corner` picks the upper index on axis `a`.
        for corner in 0..16u32 {
            let mut weight = 1.0f32;
            let mut index = [0usize; 4];
            for (a, span) in spans.iter().enumerate() {
                if corner >> a & 1 == 1 {
                    weight *= span.frac;
                    index[a] = span.hi;
                } else {
                    weight *= 1.0 - span.frac;
                    index[a] = span.lo;
                }
            }
            if weight == 0.0 {
                continue;
            }
            let src = self.ray(index[0], index[1], index[2], index[3], t);
            for (o, &s) in out.iter_mut().zip(src) {
                *o += weight * s;
            }
        }
    }

    /// Nearest-lattice sample at continuous `(x, y, u, v)` in frame `t`.
    ///
    /// Each coordinate is rounded to the closest index and clamped into range.
    pub fn sample_nearest(&self, x: f32, y: f32, u: f32, v: f32, t: usize, out: &mut [f32]) {
        let src = self.ray(
            nearest_index(x, self.x_size()),
            nearest_index(y, self.y_size()),
            nearest_index(u, self.u_size()),
            nearest_index(v, self.v_size()),
            t,
        );
        out[..src.len()].copy_from_slice(src);
    }

    /// Copies the subaperture view `(u, v)` of frame `t`.
    ///
    /// Returns `X * Y * C` samples, row-major with interleaved channels.
    pub fn extract_view(&self, u: usize, v: usize, t: usize) -> Vec<f32> {
        let mut view = Vec::with_capacity(self.x_size() * self.y_size() * self.channels());
        for y in 0..self.y_size() {
            for x in 0..self.x_size() {
                view.extend_from_slice(self.ray(x, y, u, v, t));
            }
        }
        view
    }
}

/// Writable light field view.
#[derive(Debug)]
pub struct LightFieldMut<'a> {
    image: &'a mut Image,
    layout: LensletLayout,
}

impl<'a> LightFieldMut<'a> {
    /// Wraps `image` as a writable light field with `u_size x v_size` lenslets.
    pub fn new(image: &'a mut Image, u_size: usize, v_size: usize) -> Result<Self> {
        let layout = LensletLayout::new(image.width(), image.height(), u_size, v_size)?;
        Ok(Self { image, layout })
    }

    /// Read-only view of the same light field.
    #[inline]
    pub fn as_view(&self) -> LightField<'_> {
        LightField {
            image: &*self.image,
            layout: self.layout,
        }
    }

    /// The lenslet layout.
    #[inline]
    pub fn layout(&self) -> LensletLayout {
        self.layout
    }

    /// Channel count `C`.
    #[inline]
    pub fn channels(&self) -> usize {
        self.image.channels()
    }

    /// Writes channel `c` of ray `(x, y, u, v)` in frame 0.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, u: usize, v: usize, c: usize, value: f32) {
        let (px, py) = self.layout.ray_to_pixel(x, y, u, v);
        self.image.set(px, py, 0, c, value);
    }

    /// All channels of ray `(x, y, u, v)` in frame 0, mutable.
    #[inline]
    pub fn ray_mut(&mut self, x: usize, y: usize, u: usize, v: usize) -> &mut [f32] {
        let (px, py) = self.layout.ray_to_pixel(x, y, u, v);
        self.image.pixel_mut(px, py, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Light field whose sample value encodes its own ray coordinates.
    fn coded_lightfield(xs: usize, ys: usize, us: usize, vs: usize, channels: usize) -> Image {
        let mut image = Image::new(xs * us, ys * vs, 1, channels);
        let layout = LensletLayout::new(xs * us, ys * vs, us, vs).unwrap();
        for y in 0..ys {
            for x in 0..xs {
                for v in 0..vs {
                    for u in 0..us {
                        let (px, py) = layout.ray_to_pixel(x, y, u, v);
                        for c in 0..channels {
                            let value = (x * 1000 + y * 100 + u * 10 + v) as f32 + c as f32 * 0.5;
                            image.set(px, py, 0, c, value);
                        }
                    }
                }
            }
        }
        image
    }

    #[test]
    fn test_extents() {
        let image = Image::new(12, 8, 1, 3);
        let lf = LightField::new(&image, 3, 4).unwrap();
        assert_eq!((lf.x_size(), lf.y_size(), lf.u_size(), lf.v_size()), (4, 2, 3, 4));
        assert_eq!(lf.channels(), 3);
        assert!(LightField::new(&image, 5, 4).is_err());
    }

    #[test]
    fn test_at_reads_layout() {
        let image = coded_lightfield(3, 2, 2, 3, 1);
        let lf = LightField::new(&image, 2, 3).unwrap();
        assert_eq!(lf.at(2, 1, 1, 2, 0), 2112.0);
        assert_eq!(image.get(2 * 2 + 1, 3 + 2, 0, 0), 2112.0);
    }

    #[test]
    fn test_sample4d_exact_on_lattice() {
        let image = coded_lightfield(4, 3, 3, 2, 2);
        let lf = LightField::new(&image, 3, 2).unwrap();
        let mut out = [0.0f32; 2];
        for y in 0..3 {
            for x in 0..4 {
                for v in 0..2 {
                    for u in 0..3 {
                        lf.sample4d(x as f32, y as f32, u as f32, v as f32, 0, &mut out);
                        for c in 0..2 {
                            assert_eq!(out[c], lf.at(x, y, u, v, c));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_sample4d_linear_along_each_axis() {
        let image = coded_lightfield(4, 4, 3, 3, 1);
        let lf = LightField::new(&image, 3, 3).unwrap();
        let mut out = [0.0f32];

        lf.sample4d(1.25, 2.0, 1.0, 1.0, 0, &mut out);
        assert_relative_eq!(out[0], 1211.0 + 250.0, epsilon = 1e-3);

        lf.sample4d(1.0, 2.0, 0.5, 1.5, 0, &mut out);
        assert_relative_eq!(out[0], 1200.0 + 5.0 + 1.5, epsilon = 1e-3);
    }

    #[test]
    fn test_sample4d_within_corner_range() {
        let mut image = Image::new(12, 12, 1, 1);
        for (i, v) in image.data_mut().iter_mut().enumerate() {
            *v = ((i * 7919) % 101) as f32 / 100.0;
        }
        let lf = LightField::new(&image, 3, 4).unwrap();
        let mut out = [0.0f32];

        let coords = [
            (0.3, 0.7, 1.2, 2.9),
            (3.0, 2.0, 0.1, 0.9),
            (2.5, 1.5, 1.5, 1.5),
            (0.0, 0.0, 2.0, 3.0),
        ];
        for &(x, y, u, v) in &coords {
            lf.sample4d(x, y, u, v, 0, &mut out);
            let mut lo = f32::INFINITY;
            let mut hi = f32::NEG_INFINITY;
            for corner in 0..16u32 {
                let pick = |c: f32, bit: u32, extent: usize| {
                    let i = if corner >> bit & 1 == 1 { c.ceil() } else { c.floor() };
                    (i as usize).min(extent - 1)
                };
                let s = lf.at(pick(x, 0, 4), pick(y, 1, 3), pick(u, 2, 3), pick(v, 3, 4), 0);
                lo = lo.min(s);
                hi = hi.max(s);
            }
            assert!(out[0] >= lo - 1e-5 && out[0] <= hi + 1e-5, "{} not in [{lo}, {hi}]", out[0]);
        }
    }

    #[test]
    fn test_sample4d_clamps_borders() {
        let image = coded_lightfield(3, 3, 2, 2, 1);
        let lf = LightField::new(&image, 2, 2).unwrap();
        let mut inside = [0.0f32];
        let mut outside = [0.0f32];

        lf.sample4d(2.0, 0.0, 1.0, 0.0, 0, &mut inside);
        lf.sample4d(7.5, -3.0, 4.0, -0.5, 0, &mut outside);
        assert_eq!(inside, outside);

        // Halfway past the last index still replicates the edge.
        lf.sample4d(2.5, 1.0, 0.0, 0.0, 0, &mut outside);
        assert_eq!(outside[0], lf.at(2, 1, 0, 0, 0));
    }

    #[test]
    fn test_sample_nearest() {
        let image = coded_lightfield(4, 4, 3, 3, 1);
        let lf = LightField::new(&image, 3, 3).unwrap();
        let mut out = [0.0f32];

        lf.sample_nearest(1.4, 2.6, 0.5, 1.49, 0, &mut out);
        assert_eq!(out[0], lf.at(1, 3, 1, 1, 0));

        lf.sample_nearest(-2.0, 9.0, 5.0, -0.6, 0, &mut out);
        assert_eq!(out[0], lf.at(0, 3, 2, 0, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_at_rejects_angular_index_past_lenslet() {
        // u = 2 with 2x2 lenslets would read ray (1, 0, 0, 0)
        let image = coded_lightfield(3, 3, 2, 2, 1);
        let lf = LightField::new(&image, 2, 2).unwrap();
        lf.at(0, 0, 2, 0, 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_ray_mut_rejects_out_of_range() {
        let mut image = Image::new(4, 4, 1, 1);
        let mut lf = LightFieldMut::new(&mut image, 2, 2).unwrap();
        lf.ray_mut(0, 2, 0, 0);
    }

    #[test]
    fn test_extract_view() {
        let image = coded_lightfield(3, 2, 2, 2, 1);
        let lf = LightField::new(&image, 2, 2).unwrap();
        let view = lf.extract_view(1, 0, 0);
        assert_eq!(view, vec![10.0, 1010.0, 2010.0, 110.0, 1110.0, 2110.0]);
    }

    #[test]
    fn test_mut_writes_through_layout() {
        let mut image = Image::new(6, 4, 1, 2);
        {
            let mut lf = LightFieldMut::new(&mut image, 3, 2).unwrap();
            lf.set(1, 1, 2, 0, 1, 0.5);
            lf.ray_mut(0, 0, 1, 1).fill(1.0);
            assert_eq!(lf.as_view().at(1, 1, 2, 0, 1), 0.5);
        }
        assert_eq!(image.get(5, 2, 0, 1), 0.5);
        assert_eq!(image.pixel(1, 1, 0), &[1.0, 1.0]);
    }
}
