//! CLI command implementations

pub mod focalstack;
pub mod info;
pub mod point;
pub mod warp;

use anyhow::{bail, Context, Result};
use lfx_core::Image;
use lfx_io::BitDepth;
use std::path::{Path, PathBuf};

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    lfx_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save a single-frame image to path
pub fn save_image(path: &Path, image: &Image, depth: BitDepth) -> Result<()> {
    lfx_io::write(path, image, depth).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Save every frame of an image, numbering files when there is more than one
pub fn save_sequence(path: &Path, image: &Image, depth: BitDepth) -> Result<Vec<PathBuf>> {
    lfx_io::write_sequence(path, image, depth)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Validates a `--lenslet U V` pair.
pub fn lenslet_size(values: &[usize]) -> Result<(usize, usize)> {
    match values {
        [u, v] if *u > 0 && *v > 0 => Ok((*u, *v)),
        [u, v] => bail!("Lenslet size must be positive, got {}x{}", u, v),
        _ => bail!("Expected two lenslet values (U V), got {}", values.len()),
    }
}

/// Parses `--depth`.
pub fn bit_depth(bits: u8) -> Result<BitDepth> {
    BitDepth::from_bits(bits).context("Output depth must be 8 or 16")
}
