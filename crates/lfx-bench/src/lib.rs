//! Benchmark fixtures for LFX.
//!
//! Run the benchmarks with: `cargo bench -p lfx-bench`

use lfx_core::Image;

/// Lenslet image of `xs x ys` spatial samples with `us x vs` views, filled
/// with a smooth pattern so interpolation does real work.
pub fn lenslet_fixture(xs: usize, ys: usize, us: usize, vs: usize, channels: usize) -> Image {
    let mut image = Image::new(xs * us, ys * vs, 1, channels);
    let width = image.width();
    for (i, v) in image.data_mut().iter_mut().enumerate() {
        let p = i / channels;
        let (x, y) = ((p % width) as f32, (p / width) as f32);
        *v = 0.5 + 0.5 * (x * 0.05).sin() * (y * 0.03).cos();
    }
    image
}

/// Coordinate map of `width x height` pixels sweeping all four axes.
pub fn sweep_map(width: usize, height: usize) -> Image {
    let mut map = Image::new(width, height, 1, 4);
    for y in 0..height {
        for x in 0..width {
            let s = x as f32 / width.max(2).saturating_sub(1) as f32;
            let t = y as f32 / height.max(2).saturating_sub(1) as f32;
            map.pixel_mut(x, y, 0).copy_from_slice(&[s, t, 1.0 - s, t * 0.5]);
        }
    }
    map
}
