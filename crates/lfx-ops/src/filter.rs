//! Low-pass filtering.
//!
//! Provides the anti-aliasing prefilter used by focal stack synthesis:
//!
//! - [`lanczos_kernel`] - Normalized 1D Lanczos-3 kernel stretched to a radius
//! - [`lanczos_blur`] - Separable blur with independent x/y radii
//!
//! # Example
//!
//! ```rust
//! use lfx_ops::filter::lanczos_blur;
//!
//! let src = vec![0.5f32; 16 * 16 * 3];
//! let blurred = lanczos_blur(&src, 16, 16, 3, 2.0, 2.0).unwrap();
//! assert!(blurred.iter().all(|v| (v - 0.5).abs() < 1e-5));
//! ```

use crate::{OpsError, OpsResult};
use tracing::trace;

/// Lobes of the Lanczos window.
const LANCZOS_LOBES: f32 = 3.0;

/// Largest accepted blur radius. Bounds the kernel at `2 * ceil(3 * r) + 1` taps.
pub const MAX_BLUR_RADIUS: f32 = 4096.0;

/// Lanczos weight function.
#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Builds a unit-gain Lanczos-3 kernel stretched by `radius`.
///
/// Tap `i` (centered, `-n..=n` with `n = ceil(3 * radius)`) has weight
/// `L3(i / radius)`. Larger radii cut off lower frequencies.
///
/// Returns `[1.0]` for `radius <= 0`.
///
/// # Example
///
/// ```rust
/// use lfx_ops::filter::lanczos_kernel;
///
/// let k = lanczos_kernel(2.0);
/// assert_eq!(k.len(), 13);
/// assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
/// ```
pub fn lanczos_kernel(radius: f32) -> Vec<f32> {
    if radius <= 0.0 {
        return vec![1.0];
    }
    let half = (LANCZOS_LOBES * radius).ceil() as isize;
    let mut taps: Vec<f32> = (-half..=half)
        .map(|i| lanczos_weight(i as f32 / radius, LANCZOS_LOBES))
        .collect();
    let sum: f32 = taps.iter().sum();
    for w in &mut taps {
        *w /= sum;
    }
    taps
}

/// Applies a separable Lanczos low-pass filter.
///
/// `radius_x` and `radius_y` stretch the kernel on each axis; a radius of
/// zero leaves that axis untouched. Edges are clamped, so flat regions stay
/// flat up to the border.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] if `src` doesn't match the size,
/// or [`OpsError::InvalidParameter`] for negative or non-finite radii and
/// radii above [`MAX_BLUR_RADIUS`].
pub fn lanczos_blur(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    radius_x: f32,
    radius_y: f32,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, channels, radius_x, radius_y, "lanczos_blur");

    let expected = width * height * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    for r in [radius_x, radius_y] {
        if !r.is_finite() || r < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "blur radius must be finite and >= 0, got {r}"
            )));
        }
        if r > MAX_BLUR_RADIUS {
            return Err(OpsError::InvalidParameter(format!(
                "blur radius {r} exceeds {MAX_BLUR_RADIUS}"
            )));
        }
    }

    let mut data = src.to_vec();
    if radius_x > 0.0 && expected > 0 {
        let kernel = lanczos_kernel(radius_x);
        data = convolve_horizontal(&data, width, height, channels, &kernel);
    }
    if radius_y > 0.0 && expected > 0 {
        let kernel = lanczos_kernel(radius_y);
        data = convolve_vertical(&data, width, height, channels, &kernel);
    }
    Ok(data)
}

/// Horizontal 1D convolution pass with edge clamping.
fn convolve_horizontal(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) -> Vec<f32> {
    let mut dst = vec![0.0f32; width * height * channels];
    let half = (kernel.len() / 2) as isize;

    for y in 0..height {
        for x in 0..width {
            let dst_idx = (y * width + x) * channels;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                let src_idx = (y * width + sx) * channels;
                for c in 0..channels {
                    dst[dst_idx + c] += src[src_idx + c] * w;
                }
            }
        }
    }

    dst
}

/// Vertical 1D convolution pass with edge clamping.
fn convolve_vertical(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) -> Vec<f32> {
    let mut dst = vec![0.0f32; width * height * channels];
    let half = (kernel.len() / 2) as isize;

    for y in 0..height {
        for (k, &w) in kernel.iter().enumerate() {
            let sy = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
            let src_row = &src[sy * width * channels..(sy + 1) * width * channels];
            let dst_row = &mut dst[y * width * channels..(y + 1) * width * channels];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += s * w;
            }
        }
    }

    dst
}
