//! # lfx-ops
//!
//! Operations on 4D light fields stored as lenslet images.
//!
//! # Modules
//!
//! - [`focal_stack`] - Synthetic-aperture refocusing into a focal stack
//! - [`warp`] - Resampling a light field through a 4-channel coordinate map
//! - [`point`] - Drawing a 3D point into every view with correct parallax
//! - [`transform`] - Sub-pixel translation
//! - [`filter`] - Lanczos low-pass blur
//!
//! # Example
//!
//! ```rust
//! use lfx_core::{Image, LightField};
//! use lfx_ops::focal_stack::{focal_stack, FocalStackParams};
//!
//! let image = Image::filled(16, 16, 1, &[0.5]);
//! let lf = LightField::new(&image, 4, 4).unwrap();
//! let stack = focal_stack(&lf, &FocalStackParams::new(-1.0, 1.0, 0.5)).unwrap();
//! assert_eq!(stack.frames(), 5);
//! ```
//!
//! When the `parallel` feature is enabled (default), focal stack frames and
//! warp rows are processed on the rayon thread pool.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod filter;
pub mod focal_stack;
pub mod point;
pub mod transform;
pub mod warp;

pub use error::{OpsError, OpsResult};
pub use focal_stack::{focal_stack, FocalStackParams};
pub use point::mark_point;
pub use warp::{lightfield_warp, WarpMode};
