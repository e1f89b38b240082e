//! Dense multi-frame image buffer.
//!
//! [`Image`] stores `f32` samples indexed by `(x, y, frame, channel)`.
//! Light fields, coordinate maps and focal stacks all live in this one type;
//! the light-field interpretation is layered on top by [`crate::LightField`].
//!
//! # Memory Layout
//!
//! Frames are stored one after another, each frame row-major, top-to-bottom,
//! with channels interleaved:
//!
//! ```text
//! Frame 0: [c0 c1 c2 c0 c1 c2 ...]  <- Row 0
//!          [c0 c1 c2 c0 c1 c2 ...]  <- Row 1
//!          ...
//! Frame 1: ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use lfx_core::Image;
//!
//! let mut img = Image::new(64, 32, 1, 3);
//! img.set(10, 5, 0, 1, 0.5);
//! assert_eq!(img.get(10, 5, 0, 1), 0.5);
//! assert_eq!(img.pixel(10, 5, 0), &[0.0, 0.5, 0.0]);
//! ```

use crate::{Error, Result};
use std::ops::DivAssign;

/// Dense `f32` image with width, height, frame and channel extents.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: Vec<f32>,
    width: usize,
    height: usize,
    frames: usize,
    channels: usize,
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// # Panics
    ///
    /// Panics if the total element count overflows `usize`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfx_core::Image;
    ///
    /// let img = Image::new(16, 8, 2, 4);
    /// assert_eq!(img.data().len(), 16 * 8 * 2 * 4);
    /// ```
    pub fn new(width: usize, height: usize, frames: usize, channels: usize) -> Self {
        let len = element_count(width, height, frames, channels)
            .expect("image dimensions overflow");
        Self {
            data: vec![0.0; len],
            width,
            height,
            frames,
            channels,
        }
    }

    /// Creates an image from existing samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if any extent is zero or the
    /// data length doesn't match.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfx_core::Image;
    ///
    /// let img = Image::from_data(2, 2, 1, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(img.get(1, 1, 0, 0), 3.0);
    /// assert!(Image::from_data(2, 2, 1, 1, vec![0.0; 3]).is_err());
    /// ```
    pub fn from_data(
        width: usize,
        height: usize,
        frames: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || frames == 0 || channels == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                frames,
                format!("extents must be > 0 (channels = {channels})"),
            ));
        }
        let expected = element_count(width, height, frames, channels).ok_or_else(|| {
            Error::invalid_dimensions(width, height, frames, "element count overflows")
        })?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                frames,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            frames,
            channels,
        })
    }

    /// Creates an image with every pixel set to `pixel`.
    ///
    /// The channel count is `pixel.len()`.
    pub fn filled(width: usize, height: usize, frames: usize, pixel: &[f32]) -> Self {
        let count = width * height * frames;
        let mut data = Vec::with_capacity(count * pixel.len());
        for _ in 0..count {
            data.extend_from_slice(pixel);
        }
        Self {
            data,
            width,
            height,
            frames,
            channels: pixel.len(),
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of samples in one frame.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.width * self.height * self.channels
    }

    /// `(width, height, frames, channels)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.width, self.height, self.frames, self.channels)
    }

    /// Returns `true` if `other` has the same extents.
    #[inline]
    pub fn same_shape(&self, other: &Image) -> bool {
        self.shape() == other.shape()
    }

    /// Raw samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, t: usize) -> usize {
        assert!(
            x < self.width && y < self.height && t < self.frames,
            "pixel ({x}, {y}, {t}) out of bounds for {}x{}x{}",
            self.width,
            self.height,
            self.frames
        );
        ((t * self.height + y) * self.width + x) * self.channels
    }

    /// Reads one sample.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize, t: usize, c: usize) -> f32 {
        assert!(c < self.channels, "channel {c} out of range");
        self.data[self.offset(x, y, t) + c]
    }

    /// Writes one sample.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, t: usize, c: usize, value: f32) {
        assert!(c < self.channels, "channel {c} out of range");
        let offset = self.offset(x, y, t) + c;
        self.data[offset] = value;
    }

    /// All channels of one pixel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize, t: usize) -> &[f32] {
        let offset = self.offset(x, y, t);
        &self.data[offset..offset + self.channels]
    }

    /// All channels of one pixel, mutable.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize, t: usize) -> &mut [f32] {
        let offset = self.offset(x, y, t);
        let channels = self.channels;
        &mut self.data[offset..offset + channels]
    }

    /// Samples of frame `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= frames`.
    #[inline]
    pub fn frame(&self, t: usize) -> &[f32] {
        assert!(t < self.frames, "frame {t} out of range ({} frames)", self.frames);
        let len = self.frame_len();
        &self.data[t * len..(t + 1) * len]
    }

    /// Samples of frame `t`, mutable.
    #[inline]
    pub fn frame_mut(&mut self, t: usize) -> &mut [f32] {
        assert!(t < self.frames, "frame {t} out of range ({} frames)", self.frames);
        let len = self.frame_len();
        &mut self.data[t * len..(t + 1) * len]
    }

    /// Adds `rhs` elementwise (the buffer's `+=`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the shapes differ; `self` is
    /// left untouched.
    ///
    /// ```rust
    /// use lfx_core::Image;
    ///
    /// let mut a = Image::filled(2, 2, 1, &[1.0]);
    /// a.try_add(&Image::filled(2, 2, 1, &[0.5])).unwrap();
    /// assert_eq!(a.get(1, 1, 0, 0), 1.5);
    /// assert!(a.try_add(&Image::new(3, 2, 1, 1)).is_err());
    /// ```
    pub fn try_add(&mut self, rhs: &Image) -> Result<()> {
        if !self.same_shape(rhs) {
            return Err(Error::dimension_mismatch(self.shape(), rhs.shape()));
        }
        for (dst, src) in self.data.iter_mut().zip(&rhs.data) {
            *dst += *src;
        }
        Ok(())
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Returns `(min, max)` over all samples, ignoring NaN.
    ///
    /// ```rust
    /// use lfx_core::Image;
    ///
    /// let img = Image::from_data(3, 1, 1, 1, vec![0.25, -1.0, 2.0]).unwrap();
    /// assert_eq!(img.min_max(), (-1.0, 2.0));
    /// ```
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Mean of every sample, accumulated in `f64`.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }
}

fn element_count(width: usize, height: usize, frames: usize, channels: usize) -> Option<usize> {
    width
        .checked_mul(height)?
        .checked_mul(frames)?
        .checked_mul(channels)
}

impl DivAssign<f32> for Image {
    fn div_assign(&mut self, rhs: f32) {
        for v in &mut self.data {
            *v /= rhs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_new() {
        let img = Image::new(10, 8, 3, 2);
        assert_eq!(img.dimensions(), (10, 8));
        assert_eq!(img.frames(), 3);
        assert_eq!(img.channels(), 2);
        assert_eq!(img.frame_len(), 160);
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_data_rejects_zero_extent() {
        assert!(Image::from_data(0, 4, 1, 1, vec![]).is_err());
        assert!(Image::from_data(4, 4, 1, 0, vec![]).is_err());
    }

    #[test]
    fn test_layout_order() {
        // index = ((t * h + y) * w + x) * c + ch
        let data: Vec<f32> = (0..2 * 3 * 2 * 2).map(|i| i as f32).collect();
        let img = Image::from_data(2, 3, 2, 2, data).unwrap();
        assert_eq!(img.get(1, 0, 0, 0), 2.0);
        assert_eq!(img.get(0, 1, 0, 1), 5.0);
        assert_eq!(img.get(0, 0, 1, 0), 12.0);
        assert_eq!(img.pixel(1, 2, 1), &[22.0, 23.0]);
    }

    #[test]
    fn test_set_get() {
        let mut img = Image::new(4, 4, 2, 3);
        img.set(3, 2, 1, 2, 0.75);
        assert_eq!(img.get(3, 2, 1, 2), 0.75);
        assert_eq!(img.get(3, 2, 0, 2), 0.0);
        img.pixel_mut(0, 0, 0).copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(img.pixel(0, 0, 0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_frame_slices() {
        let mut img = Image::new(2, 2, 3, 1);
        img.frame_mut(1).fill(5.0);
        assert!(img.frame(0).iter().all(|&v| v == 0.0));
        assert!(img.frame(1).iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Image::filled(2, 2, 1, &[1.0, 2.0]);
        let b = Image::filled(2, 2, 1, &[3.0, 4.0]);
        a.try_add(&b).unwrap();
        assert_eq!(a.pixel(1, 1, 0), &[4.0, 6.0]);
        a /= 2.0;
        assert_eq!(a.pixel(0, 1, 0), &[2.0, 3.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let mut a = Image::filled(2, 2, 1, &[1.0]);
        for b in [Image::new(3, 2, 1, 1), Image::new(2, 2, 2, 1), Image::new(2, 2, 1, 2)] {
            assert!(matches!(a.try_add(&b), Err(Error::DimensionMismatch { .. })));
        }
        assert!(a.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_column_past_width_panics() {
        // (2, 0) would alias (0, 1) without the bounds check
        let img = Image::new(2, 2, 1, 1);
        img.get(2, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_channel_past_count_panics() {
        let img = Image::new(2, 2, 1, 2);
        img.get(0, 0, 0, 2);
    }

    #[test]
    fn test_stats() {
        let img = Image::from_data(2, 2, 1, 1, vec![0.0, 1.0, f32::NAN, 3.0]).unwrap();
        assert_eq!(img.min_max(), (0.0, 3.0));
        let img = Image::filled(4, 4, 1, &[0.5]);
        assert!((img.mean() - 0.5).abs() < 1e-12);
    }
}
