//! Numbered frame sequences.
//!
//! Multi-frame images (focal stacks, warped sequences) are written as one
//! PNG per frame, numbered with four digits before the extension:
//!
//! - `stack.png` with 3 frames -> `stack.0000.png`, `stack.0001.png`, `stack.0002.png`
//! - single-frame images keep the given path unchanged
//!
//! # Example
//!
//! ```rust
//! use lfx_io::sequence::frame_path;
//! use std::path::Path;
//!
//! assert_eq!(frame_path(Path::new("out/stack.png"), 7), Path::new("out/stack.0007.png"));
//! ```

use crate::png::{self, BitDepth};
use crate::IoResult;
use lfx_core::Image;
use std::path::{Path, PathBuf};
use tracing::info;

/// Digits used for frame numbers.
const FRAME_PADDING: usize = 4;

/// Path of frame `frame` for the sequence rooted at `path`.
///
/// The zero-padded frame number is inserted before the extension; paths
/// without an extension get it appended.
pub fn frame_path(path: &Path, frame: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!(
            "{stem}.{frame:0width$}.{}",
            ext.to_string_lossy(),
            width = FRAME_PADDING
        ),
        None => format!("{stem}.{frame:0width$}", width = FRAME_PADDING),
    };
    path.with_file_name(name)
}

/// Writes every frame of `image`.
///
/// A single-frame image is written to `path` itself; otherwise frame `t`
/// goes to [`frame_path(path, t)`](frame_path). Returns the written paths
/// in frame order.
pub fn write_sequence(path: &Path, image: &Image, depth: BitDepth) -> IoResult<Vec<PathBuf>> {
    if image.frames() == 1 {
        png::write(path, image, depth)?;
        return Ok(vec![path.to_path_buf()]);
    }

    let mut written = Vec::with_capacity(image.frames());
    for t in 0..image.frames() {
        let frame_file = frame_path(path, t);
        png::write_frame(&frame_file, image, t, depth)?;
        written.push(frame_file);
    }
    info!(frames = written.len(), base = %path.display(), "Wrote sequence");
    Ok(written)
}
