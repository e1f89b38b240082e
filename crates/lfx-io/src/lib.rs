//! # lfx-io
//!
//! Image I/O for light field tools.
//!
//! Lenslet images, coordinate maps and outputs are exchanged as PNG files:
//!
//! - [`read`] / [`write`] - Load and save single-frame images
//! - [`sequence::write_sequence`] - Save multi-frame results as numbered files
//!
//! Samples are `f32` in `[0, 1]`; 8-bit and 16-bit files are supported.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lfx_io::{read, write, BitDepth};
//!
//! let image = read("lenslets.png")?;
//! write("copy.png", &image, BitDepth::Sixteen)?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod png;
pub mod sequence;

pub use error::{IoError, IoResult};
pub use png::BitDepth;
pub use sequence::{frame_path, write_sequence};

use lfx_core::Image;
use std::path::Path;

/// Returns an error unless `path` has a `.png` extension (case-insensitive).
fn check_png(path: &Path) -> IoResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(()),
        other => Err(IoError::UnsupportedFormat(
            other.unwrap_or("unknown").to_string(),
        )),
    }
}

/// Reads an image, checking the extension first.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for non-PNG paths, or any error
/// from [`png::read`].
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    check_png(path)?;
    png::read(path)
}

/// Writes a single-frame image, checking the extension first.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for non-PNG paths, or any error
/// from [`png::write`].
pub fn write<P: AsRef<Path>>(path: P, image: &Image, depth: BitDepth) -> IoResult<()> {
    let path = path.as_ref();
    check_png(path)?;
    png::write(path, image, depth)
}
