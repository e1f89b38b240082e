//! # lfx-core
//!
//! Core types for light field processing.
//!
//! This crate provides the foundational types used throughout the LFX workspace:
//!
//! - [`Image`] - Dense `f32` buffer indexed by `(x, y, frame, channel)`
//! - [`LensletLayout`] - Mapping between 4D rays and 2D lenslet-image pixels
//! - [`LightField`], [`LightFieldMut`] - 4D views over a lenslet image
//!
//! ## Crate Structure
//!
//! ```text
//! lfx-core (this crate)
//!    ^
//!    |
//!    +-- lfx-io  (PNG load/save)
//!    +-- lfx-ops (focal stack, warp, point marker)
//!    +-- lfx-cli
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lfx_core::{Image, LightField};
//!
//! // 4x3 spatial samples, 2x2 views per lenslet
//! let image = Image::new(8, 6, 1, 3);
//! let lf = LightField::new(&image, 2, 2).unwrap();
//! assert_eq!((lf.x_size(), lf.y_size()), (4, 3));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod layout;
pub mod lightfield;

pub use error::*;
pub use image::Image;
pub use layout::LensletLayout;
pub use lightfield::{LightField, LightFieldMut};

/// Prelude module for convenient imports.
///
/// ```
/// use lfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::layout::LensletLayout;
    pub use crate::lightfield::{LightField, LightFieldMut};
}
