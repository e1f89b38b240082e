//! Error types for lfx-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers failures that can occur while:
//! - Allocating or wrapping image buffers
//! - Building a lenslet layout over an image
//! - Combining images of different shapes
//!
//! # Usage
//!
//! ```rust
//! use lfx_core::{Error, Result};
//!
//! fn check_lenslet(width: usize, u_size: usize) -> Result<usize> {
//!     if u_size == 0 || width % u_size != 0 {
//!         return Err(Error::lenslet_mismatch(width, 1, u_size, 1));
//!     }
//!     Ok(width / u_size)
//! }
//! assert!(check_lenslet(16, 3).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or combining image buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid image dimensions.
    ///
    /// Returned when an extent is zero or the data length doesn't match
    /// `width * height * frames * channels`.
    #[error("invalid dimensions: {width}x{height}x{frames} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Requested frame count
        frames: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Image size is not an exact multiple of the lenslet size.
    #[error("image {width}x{height} is not tiled by {u_size}x{v_size} lenslets")]
    LensletMismatch {
        /// Image width
        width: usize,
        /// Image height
        height: usize,
        /// Lenslet width (angular u extent)
        u_size: usize,
        /// Lenslet height (angular v extent)
        v_size: usize,
    },

    /// Image shapes don't match for the operation.
    #[error("dimension mismatch: {a_width}x{a_height}x{a_frames}x{a_channels} vs {b_width}x{b_height}x{b_frames}x{b_channels}")]
    DimensionMismatch {
        /// First image width
        a_width: usize,
        /// First image height
        a_height: usize,
        /// First image frame count
        a_frames: usize,
        /// First image channel count
        a_channels: usize,
        /// Second image width
        b_width: usize,
        /// Second image height
        b_height: usize,
        /// Second image frame count
        b_frames: usize,
        /// Second image channel count
        b_channels: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(
        width: usize,
        height: usize,
        frames: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            frames,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::LensletMismatch`] error.
    #[inline]
    pub fn lenslet_mismatch(width: usize, height: usize, u_size: usize, v_size: usize) -> Self {
        Self::LensletMismatch {
            width,
            height,
            u_size,
            v_size,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error from two
    /// `(width, height, frames, channels)` shapes.
    #[inline]
    pub fn dimension_mismatch(
        a: (usize, usize, usize, usize),
        b: (usize, usize, usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            a_frames: a.2,
            a_channels: a.3,
            b_width: b.0,
            b_height: b.1,
            b_frames: b.2,
            b_channels: b.3,
        }
    }
}
