//! Geometric transformation operations.
//!
//! - [`translate`] - Sub-pixel shift with bilinear resampling
//!
//! Subaperture views are shifted by fractional amounts during refocusing, so
//! the shift has to resample rather than copy whole pixels.
//!
//! # Example
//!
//! ```rust
//! use lfx_ops::transform::translate;
//!
//! let src = vec![0.0, 1.0, 0.0, 0.0];
//! let dst = translate(&src, 4, 1, 1, 1.0, 0.0).unwrap();
//! assert_eq!(dst, vec![0.0, 0.0, 1.0, 0.0]);
//! ```

use crate::{OpsError, OpsResult};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Shifts an image by `(dx, dy)` pixels.
///
/// The output at `(x, y)` is the bilinear sample of `src` at `(x - dx, y - dy)`,
/// so positive offsets move content right and down. Samples that fall
/// outside the source contribute zero, which leaves newly exposed areas black.
/// Integer offsets copy pixels exactly. Offsets larger than the image
/// produce an all-zero result.
///
/// # Arguments
///
/// * `src` - Source pixel data (`width * height * channels`)
/// * `width`, `height` - Image dimensions
/// * `channels` - Number of channels
/// * `dx`, `dy` - Offset in pixels
///
/// # Example
///
/// ```rust
/// use lfx_ops::transform::translate;
///
/// let src = vec![0.0, 2.0, 0.0];
/// let dst = translate(&src, 3, 1, 1, 0.5, 0.0).unwrap();
/// assert_eq!(dst, vec![0.0, 1.0, 1.0]);
/// ```
pub fn translate(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    dx: f32,
    dy: f32,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, channels, dx, dy, "translate");

    let expected = width * height * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if !dx.is_finite() || !dy.is_finite() {
        return Err(OpsError::InvalidParameter(format!(
            "translation ({dx}, {dy}) must be finite"
        )));
    }

    let mut dst = vec![0.0f32; expected];
    if expected == 0 {
        return Ok(dst);
    }

    // Past one pixel beyond the border every tap is outside, so the result
    // doesn't change; clamping keeps the tap indices in isize range.
    let dx = dx.clamp(-(width as f32 + 1.0), width as f32 + 1.0);
    let dy = dy.clamp(-(height as f32 + 1.0), height as f32 + 1.0);

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| translate_row(src, width, height, channels, dx, dy, y, row));

    #[cfg(not(feature = "parallel"))]
    for (y, row) in dst.chunks_mut(width * channels).enumerate() {
        translate_row(src, width, height, channels, dx, dy, y, row);
    }

    Ok(dst)
}

/// Resamples output row `y` of a translation into `row`.
#[allow(clippy::too_many_arguments)]
fn translate_row(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    dx: f32,
    dy: f32,
    y: usize,
    row: &mut [f32],
) {
    let sy = y as f32 - dy;
    let y0 = sy.floor();
    let fy = sy - y0;
    let y0 = y0 as isize;

    for x in 0..width {
        let sx = x as f32 - dx;
        let x0 = sx.floor();
        let fx = sx - x0;
        let x0 = x0 as isize;

        let taps = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x0 + 1, y0, fx * (1.0 - fy)),
            (x0, y0 + 1, (1.0 - fx) * fy),
            (x0 + 1, y0 + 1, fx * fy),
        ];

        let out = &mut row[x * channels..(x + 1) * channels];
        for (tx, ty, w) in taps {
            if w == 0.0 || tx < 0 || ty < 0 || tx >= width as isize || ty >= height as isize {
                continue;
            }
            let idx = (ty as usize * width + tx as usize) * channels;
            for (o, &s) in out.iter_mut().zip(&src[idx..idx + channels]) {
                *o += w * s;
            }
        }
    }
}
