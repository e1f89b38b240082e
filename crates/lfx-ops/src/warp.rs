//! Light field resampling through a coordinate map.
//!
//! Based on the ST-map approach: each pixel of the map stores where to read
//! from, here as four normalized coordinates `(s, t, u, v)` in `[0, 1]` that
//! address the light field's `(x, y, u, v)` axes. The output has the map's
//! size and frame count and the light field's channels.
//!
//! Two gather modes are available:
//! - [`WarpMode::Quadrilinear`] - interpolates between the 16 surrounding rays
//! - [`WarpMode::Nearest`] - rounds to the closest ray (fast preview)
//!
//! When the `parallel` feature is enabled, uses rayon for multi-threaded processing.

use crate::{OpsError, OpsResult};
use lfx_core::{Image, LightField};
use tracing::{info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Channels a coordinate map must carry: s, t, u, v.
pub const MAP_CHANNELS: usize = 4;

/// How map coordinates are resolved against the light field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarpMode {
    /// Quadrilinear interpolation over all four axes.
    #[default]
    Quadrilinear,
    /// Round each coordinate to the nearest ray.
    Nearest,
}

/// Resamples `lf` through the 4-channel coordinate map `map`.
///
/// For output pixel `(x, y, t)` the map stores `(s, t', u, v)`, which are
/// scaled to `(s * (X-1), t' * (Y-1), u * (U-1), v * (V-1))` and looked up
/// according to `mode`. Coordinates outside `[0, 1]` clamp to the border.
///
/// A single-frame light field is read for every map frame; otherwise the
/// light field must have as many frames as the map and frame `t` is read for
/// output frame `t`.
///
/// # Errors
///
/// - [`OpsError::ChannelCount`] if the map doesn't have exactly 4 channels
/// - [`OpsError::FrameMismatch`] if the frame counts can't be paired
///
/// # Example
///
/// ```rust
/// use lfx_core::{Image, LightField};
/// use lfx_ops::warp::{lightfield_warp, WarpMode};
///
/// let image = Image::filled(8, 8, 1, &[0.25, 0.5, 0.75]);
/// let lf = LightField::new(&image, 2, 2).unwrap();
/// let map = Image::filled(16, 16, 1, &[0.5, 0.5, 0.5, 0.5]);
///
/// let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
/// assert_eq!(out.dimensions(), (16, 16));
/// assert_eq!(out.channels(), 3);
/// ```
pub fn lightfield_warp(lf: &LightField<'_>, map: &Image, mode: WarpMode) -> OpsResult<Image> {
    trace!(
        map_w = map.width(),
        map_h = map.height(),
        map_frames = map.frames(),
        ?mode,
        "lightfield_warp"
    );

    if map.channels() != MAP_CHANNELS {
        return Err(OpsError::ChannelCount {
            op: "lightfield warp map",
            expected: MAP_CHANNELS,
            got: map.channels(),
        });
    }
    if lf.frames() != 1 && lf.frames() != map.frames() {
        return Err(OpsError::FrameMismatch {
            lightfield: lf.frames(),
            map: map.frames(),
        });
    }
    if lf.channels() == 0 {
        return Err(OpsError::InvalidDimensions("light field has no channels".into()));
    }
    if map.width() == 0 || map.height() == 0 || map.frames() == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "coordinate map is empty ({}x{}, {} frames)",
            map.width(),
            map.height(),
            map.frames()
        )));
    }

    info!(
        width = map.width(),
        height = map.height(),
        frames = map.frames(),
        ?mode,
        "Warping light field"
    );

    let out = match mode {
        WarpMode::Quadrilinear => apply_warp(lf, map, |lf, [x, y, u, v], t, out| {
            lf.sample4d(x, y, u, v, t, out)
        }),
        WarpMode::Nearest => apply_warp(lf, map, |lf, [x, y, u, v], t, out| {
            lf.sample_nearest(x, y, u, v, t, out)
        }),
    };
    Ok(out)
}

/// Scales normalized map coordinates to light field index space.
#[inline]
fn to_lightfield_coords(lf: &LightField<'_>, coords: &[f32]) -> [f32; 4] {
    [
        coords[0] * (lf.x_size() - 1) as f32,
        coords[1] * (lf.y_size() - 1) as f32,
        coords[2] * (lf.u_size() - 1) as f32,
        coords[3] * (lf.v_size() - 1) as f32,
    ]
}

/// Fills output row `row_index` (counted across all frames) with gathered samples.
fn warp_row<F>(lf: &LightField<'_>, map: &Image, sample: &F, row_index: usize, row: &mut [f32])
where
    F: Fn(&LightField<'_>, [f32; 4], usize, &mut [f32]),
{
    let channels = lf.channels();
    let t = row_index / map.height();
    let y = row_index % map.height();
    let lf_frame = if lf.frames() == 1 { 0 } else { t };

    for x in 0..map.width() {
        let coords = to_lightfield_coords(lf, map.pixel(x, y, t));
        sample(lf, coords, lf_frame, &mut row[x * channels..(x + 1) * channels]);
    }
}

/// Gathers every output pixel through `sample`.
///
/// Uses rayon for parallel processing when the `parallel` feature is enabled.
#[cfg(feature = "parallel")]
fn apply_warp<F>(lf: &LightField<'_>, map: &Image, sample: F) -> Image
where
    F: Fn(&LightField<'_>, [f32; 4], usize, &mut [f32]) + Sync,
{
    let mut out = Image::new(map.width(), map.height(), map.frames(), lf.channels());
    let row_len = map.width() * lf.channels();

    // Process rows in parallel
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(r, row)| warp_row(lf, map, &sample, r, row));

    out
}

/// Gathers every output pixel through `sample` (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
fn apply_warp<F>(lf: &LightField<'_>, map: &Image, sample: F) -> Image
where
    F: Fn(&LightField<'_>, [f32; 4], usize, &mut [f32]),
{
    let mut out = Image::new(map.width(), map.height(), map.frames(), lf.channels());
    let row_len = map.width() * lf.channels();

    for (r, row) in out.data_mut().chunks_mut(row_len).enumerate() {
        warp_row(lf, map, &sample, r, row);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Light field with a distinct value per ray and channel.
    fn coded(xs: usize, ys: usize, us: usize, vs: usize, channels: usize) -> Image {
        let mut image = Image::new(xs * us, ys * vs, 1, channels);
        for (i, v) in image.data_mut().iter_mut().enumerate() {
            *v = (i % 251) as f32 * 0.01 + (i / 251) as f32;
        }
        image
    }

    /// Map covering every lattice point of an `xs x ys x us x vs` light field,
    /// laid out as a lenslet image itself.
    fn identity_map(xs: usize, ys: usize, us: usize, vs: usize) -> Image {
        let mut map = Image::new(xs * us, ys * vs, 1, 4);
        let norm = |i: usize, n: usize| if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
        for py in 0..ys * vs {
            for px in 0..xs * us {
                let (x, y, u, v) = (px / us, py / vs, px % us, py % vs);
                map.pixel_mut(px, py, 0)
                    .copy_from_slice(&[norm(x, xs), norm(y, ys), norm(u, us), norm(v, vs)]);
            }
        }
        map
    }

    #[test]
    fn test_rejects_wrong_map_channels() {
        let image = Image::new(4, 4, 1, 1);
        let lf = LightField::new(&image, 2, 2).unwrap();
        let map = Image::new(4, 4, 1, 3);
        let err = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap_err();
        assert!(matches!(err, OpsError::ChannelCount { expected: 4, got: 3, .. }));
    }

    #[test]
    fn test_rejects_unpaired_frames() {
        let image = Image::new(4, 4, 2, 1);
        let lf = LightField::new(&image, 2, 2).unwrap();
        let map = Image::new(4, 4, 3, 4);
        assert!(matches!(
            lightfield_warp(&lf, &map, WarpMode::Nearest),
            Err(OpsError::FrameMismatch { lightfield: 2, map: 3 })
        ));
    }

    #[test]
    fn test_output_shape() {
        let image = Image::new(6, 6, 1, 2);
        let lf = LightField::new(&image, 3, 3).unwrap();
        let map = Image::new(5, 7, 3, 4);
        let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        assert_eq!(out.dimensions(), (5, 7));
        assert_eq!(out.frames(), 3);
        assert_eq!(out.channels(), 2);
    }

    #[test]
    fn test_identity_map_reproduces_lightfield() {
        // X-1, Y-1, U-1, V-1 are powers of two so the scaled coordinates are exact.
        let (xs, ys, us, vs) = (5, 3, 3, 5);
        let image = coded(xs, ys, us, vs, 2);
        let lf = LightField::new(&image, us, vs).unwrap();
        let map = identity_map(xs, ys, us, vs);

        let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        assert_eq!(out.data(), image.data());
    }

    #[test]
    fn test_identity_map_non_power_of_two() {
        let (xs, ys, us, vs) = (7, 4, 4, 3);
        let image = coded(xs, ys, us, vs, 3);
        let lf = LightField::new(&image, us, vs).unwrap();
        let map = identity_map(xs, ys, us, vs);

        let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        for (a, b) in out.data().iter().zip(image.data()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_nearest_matches_quadrilinear_on_lattice() {
        let (xs, ys, us, vs) = (6, 5, 4, 4);
        let image = coded(xs, ys, us, vs, 1);
        let lf = LightField::new(&image, us, vs).unwrap();
        let map = identity_map(xs, ys, us, vs);

        let fine = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        let fast = lightfield_warp(&lf, &map, WarpMode::Nearest).unwrap();
        for (a, b) in fine.data().iter().zip(fast.data()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_nearest_rounds_and_clamps() {
        let (xs, ys, us, vs) = (5, 5, 3, 3);
        let image = coded(xs, ys, us, vs, 1);
        let lf = LightField::new(&image, us, vs).unwrap();

        // s = 0.4 -> x = 1.6 -> 2; t = 1.5 -> clamp 4; u = -0.2 -> 0; v = 0.8 -> 1.6 -> 2
        let map = Image::filled(1, 1, 1, &[0.4, 1.5, -0.2, 0.8]);
        let out = lightfield_warp(&lf, &map, WarpMode::Nearest).unwrap();
        assert_eq!(out.get(0, 0, 0, 0), lf.at(2, 4, 0, 2, 0));
    }

    #[test]
    fn test_quadrilinear_blends_between_rays() {
        let mut image = Image::new(4, 2, 1, 1);
        // X = 2, Y = 1, U = 2, V = 2: set ray (1, 0, 0, 0) only
        let lf_layout = lfx_core::LensletLayout::new(4, 2, 2, 2).unwrap();
        let (px, py) = lf_layout.ray_to_pixel(1, 0, 0, 0);
        image.set(px, py, 0, 0, 1.0);
        let lf = LightField::new(&image, 2, 2).unwrap();

        let map = Image::filled(1, 1, 1, &[0.25, 0.0, 0.0, 0.0]);
        let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        assert_abs_diff_eq!(out.get(0, 0, 0, 0), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_multi_frame_pairs_frames() {
        let mut image = Image::new(4, 4, 2, 1);
        image.frame_mut(0).fill(1.0);
        image.frame_mut(1).fill(2.0);
        let lf = LightField::new(&image, 2, 2).unwrap();
        let map = Image::filled(3, 3, 2, &[0.5; 4]);

        let out = lightfield_warp(&lf, &map, WarpMode::Quadrilinear).unwrap();
        assert!(out.frame(0).iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(out.frame(1).iter().all(|&v| (v - 2.0).abs() < 1e-6));
    }
}
