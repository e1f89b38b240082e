//! PNG format support.
//!
//! Reads 8-bit and 16-bit PNG files into single-frame [`Image`]s with samples
//! normalized to `[0, 1]`, and writes them back at either depth.
//!
//! # Features
//!
//! - Gray, gray + alpha, RGB and RGBA (channel count is preserved)
//! - Palette and sub-byte images are expanded to 8-bit on read
//! - 8-bit or 16-bit output, clamped and rounded
//!
//! # Example
//!
//! ```rust,ignore
//! use lfx_io::png::{read, write, BitDepth};
//!
//! let image = read("lenslets.png")?;
//! write("copy.png", &image, BitDepth::Sixteen)?;
//! ```

use crate::{IoError, IoResult};
use lfx_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, trace};

/// Output sample depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 8 bits per sample.
    Eight,
    /// 16 bits per sample.
    #[default]
    Sixteen,
}

impl BitDepth {
    /// Parses a depth given in bits (8 or 16).
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfx_io::png::BitDepth;
    ///
    /// assert_eq!(BitDepth::from_bits(8).unwrap(), BitDepth::Eight);
    /// assert!(BitDepth::from_bits(12).is_err());
    /// ```
    pub fn from_bits(bits: u8) -> IoResult<Self> {
        match bits {
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            n => Err(IoError::UnsupportedBitDepth(format!("{n}-bit output"))),
        }
    }

    /// Bits per sample.
    pub fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

/// Reads a PNG file as a single-frame image.
///
/// # Errors
///
/// - [`IoError::Io`] if the file cannot be opened
/// - [`IoError::DecodeError`] if the PNG is malformed
/// - [`IoError::UnsupportedBitDepth`] for color types that survive expansion
///   in an unexpected form
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png::read");

    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    let data: Vec<f32> = match info.bit_depth {
        png::BitDepth::Eight => bytes.iter().map(|&b| b as f32 / 255.0).collect(),
        png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as f32 / 65535.0)
            .collect(),
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, other
            )));
        }
    };

    debug!(
        width = info.width,
        height = info.height,
        channels,
        depth = ?info.bit_depth,
        "Decoded PNG"
    );
    Ok(Image::from_data(
        info.width as usize,
        info.height as usize,
        1,
        channels,
        data,
    )?)
}

/// Writes a single-frame image as PNG.
///
/// Samples are clamped to `[0, 1]` and rounded to the requested depth.
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] for multi-frame images, channel counts
/// other than 1 to 4, or sizes that don't fit in a PNG header.
pub fn write<P: AsRef<Path>>(path: P, image: &Image, depth: BitDepth) -> IoResult<()> {
    if image.frames() != 1 {
        return Err(IoError::EncodeError(format!(
            "PNG holds one frame, image has {}",
            image.frames()
        )));
    }
    write_frame(path, image, 0, depth)
}

/// Writes frame `t` of `image` as PNG.
///
/// # Errors
///
/// Same as [`write`], plus [`IoError::EncodeError`] if `t` is out of range.
pub fn write_frame<P: AsRef<Path>>(
    path: P,
    image: &Image,
    t: usize,
    depth: BitDepth,
) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), frame = t, bits = depth.bits(), "png::write_frame");

    if t >= image.frames() {
        return Err(IoError::EncodeError(format!(
            "frame {t} out of range ({} frames)",
            image.frames()
        )));
    }
    let color_type = match image.channels() {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {n}"))),
    };
    let width = u32::try_from(image.width())
        .map_err(|_| IoError::EncodeError(format!("width {} too large", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| IoError::EncodeError(format!("height {} too large", image.height())))?;

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color_type);
    encoder.set_compression(png::Compression::default());

    let samples = image.frame(t);
    let bytes = match depth {
        BitDepth::Eight => {
            encoder.set_depth(png::BitDepth::Eight);
            samples.iter().map(|&v| quantize(v, 255.0) as u8).collect::<Vec<u8>>()
        }
        BitDepth::Sixteen => {
            encoder.set_depth(png::BitDepth::Sixteen);
            samples
                .iter()
                .flat_map(|&v| (quantize(v, 65535.0) as u16).to_be_bytes())
                .collect()
        }
    };

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    debug!(path = %path.display(), width, height, "Wrote PNG");
    Ok(())
}

/// Clamps to `[0, 1]` and scales to `[0, max]`, rounded. NaN maps to 0.
#[inline]
fn quantize(v: f32, max: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    (v.clamp(0.0, 1.0) * max).round()
}
