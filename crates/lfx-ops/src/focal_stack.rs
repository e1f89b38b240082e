//! Focal stack synthesis by synthetic-aperture refocusing.
//!
//! Every subaperture view of a light field is shifted in proportion to its
//! angular offset from the aperture center and a depth slope `alpha`, then
//! all views are averaged. Points whose parallax matches `alpha` line up and
//! come out sharp; everything else is spread over the aperture, which is the
//! defocus blur a physical lens would produce. Sweeping `alpha` over a range
//! gives one output frame per depth.
//!
//! When a shift exceeds one pixel per view step (`|alpha| > 1`) each view is
//! low-passed with a Lanczos filter of radius `|alpha|` before accumulation,
//! which suppresses the ghosting caused by the sparse angular sampling.
//!
//! # Example
//!
//! ```rust
//! use lfx_core::{Image, LightField};
//! use lfx_ops::focal_stack::{focal_stack, FocalStackParams};
//!
//! let image = Image::filled(32, 32, 1, &[1.0, 0.5, 0.25]);
//! let lf = LightField::new(&image, 4, 4).unwrap();
//!
//! let params = FocalStackParams::new(0.0, 1.0, 0.25);
//! let stack = focal_stack(&lf, &params).unwrap();
//! assert_eq!((stack.width(), stack.height(), stack.frames()), (8, 8, 5));
//! ```

use crate::filter::{lanczos_blur, MAX_BLUR_RADIUS};
use crate::transform::translate;
use crate::{OpsError, OpsResult};
use lfx_core::{Image, LightField};
use tracing::{debug, info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Slack added before flooring the step count so that ranges like
/// `0..=0.9` by `0.3` keep their last sample despite f32 rounding.
const STEP_EPSILON: f64 = 1e-6;

/// Largest number of depth samples a single stack may hold.
pub const MAX_FRAMES: usize = 1 << 16;

/// Depth range for a focal stack.
///
/// Samples are `min_alpha + i * delta_alpha` for every `i` that keeps the
/// value `<= max_alpha` (inclusive upper bound).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalStackParams {
    /// First depth slope.
    pub min_alpha: f32,
    /// Last depth slope (inclusive).
    pub max_alpha: f32,
    /// Step between adjacent depths. Must be `> 0`.
    pub delta_alpha: f32,
}

impl FocalStackParams {
    /// Creates a depth range.
    pub fn new(min_alpha: f32, max_alpha: f32, delta_alpha: f32) -> Self {
        Self {
            min_alpha,
            max_alpha,
            delta_alpha,
        }
    }

    /// Checks that the range is finite, ordered and has a positive step,
    /// that it yields at most [`MAX_FRAMES`] samples, and that every
    /// `|alpha|` is within the blur radius limit.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfx_ops::FocalStackParams;
    ///
    /// assert!(FocalStackParams::new(-1.0, 1.0, 0.1).validate().is_ok());
    /// assert!(FocalStackParams::new(-1.0, 1.0, 0.0).validate().is_err());
    /// assert!(FocalStackParams::new(1.0, -1.0, 0.1).validate().is_err());
    /// ```
    pub fn validate(&self) -> OpsResult<()> {
        let Self {
            min_alpha,
            max_alpha,
            delta_alpha,
        } = *self;
        if !min_alpha.is_finite() || !max_alpha.is_finite() || !delta_alpha.is_finite() {
            return Err(OpsError::InvalidParameter(format!(
                "depth range {min_alpha}..{max_alpha} step {delta_alpha} must be finite"
            )));
        }
        if delta_alpha <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "depth step must be > 0, got {delta_alpha}"
            )));
        }
        if min_alpha > max_alpha {
            return Err(OpsError::InvalidParameter(format!(
                "min alpha {min_alpha} exceeds max alpha {max_alpha}"
            )));
        }
        let steps = self.step_count();
        if steps >= MAX_FRAMES as f64 {
            return Err(OpsError::InvalidParameter(format!(
                "depth range {min_alpha}..{max_alpha} step {delta_alpha} \
                 gives more than {MAX_FRAMES} frames"
            )));
        }
        let radius = min_alpha.abs().max(max_alpha.abs());
        if radius > MAX_BLUR_RADIUS {
            return Err(OpsError::InvalidParameter(format!(
                "|alpha| {radius} exceeds the blur radius limit {MAX_BLUR_RADIUS}"
            )));
        }
        Ok(())
    }

    /// Number of depth samples, `floor((max - min) / delta) + 1`.
    ///
    /// Only meaningful for a range that passes [`validate`](Self::validate).
    pub fn frame_count(&self) -> usize {
        // Float-to-int `as` saturates, so an unvalidated range can't overflow.
        (self.step_count() as usize).saturating_add(1)
    }

    /// `floor((max - min) / delta)` with the rounding slack, in `f64`.
    fn step_count(&self) -> f64 {
        let span = self.max_alpha as f64 - self.min_alpha as f64;
        (span / self.delta_alpha as f64 + STEP_EPSILON).floor()
    }

    /// All depth samples in increasing order.
    ///
    /// Computed from the sample index rather than by repeated addition, so
    /// long ranges don't drift.
    pub fn alphas(&self) -> Vec<f32> {
        (0..self.frame_count())
            .map(|i| (self.min_alpha as f64 + i as f64 * self.delta_alpha as f64) as f32)
            .collect()
    }
}

/// Builds a focal stack from a single-frame light field.
///
/// The output is `X x Y` with one frame per depth sample and the light
/// field's channel count. Frame `i` is the mean over all `U * V` views of
/// the view shifted by `(du * alpha_i, dv * alpha_i)`, where `(du, dv)` is
/// the view's offset from the aperture center, and blurred with radius
/// `|alpha_i|` when `|alpha_i| > 1`.
///
/// # Errors
///
/// - [`OpsError::FrameCount`] if the light field has more than one frame
/// - [`OpsError::InvalidParameter`] if `params` fails validation
///
/// Both are checked before any work starts.
pub fn focal_stack(lf: &LightField<'_>, params: &FocalStackParams) -> OpsResult<Image> {
    trace!(
        x = lf.x_size(),
        y = lf.y_size(),
        u = lf.u_size(),
        v = lf.v_size(),
        min = params.min_alpha,
        max = params.max_alpha,
        step = params.delta_alpha,
        "focal_stack"
    );

    if lf.frames() != 1 {
        return Err(OpsError::FrameCount {
            op: "focal stack",
            expected: 1,
            got: lf.frames(),
        });
    }
    if lf.channels() == 0 {
        return Err(OpsError::InvalidDimensions("light field has no channels".into()));
    }
    params.validate()?;

    let alphas = params.alphas();
    let total = alphas.len();
    info!(frames = total, views = lf.layout().view_count(), "Building focal stack");

    let mut out = Image::new(lf.x_size(), lf.y_size(), total, lf.channels());
    let frame_len = out.frame_len();

    // Each output frame is owned by exactly one worker; views are summed
    // into it sequentially.
    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(frame_len)
        .zip(alphas.par_iter())
        .enumerate()
        .try_for_each(|(t, (frame, &alpha))| {
            debug!(frame = t + 1, total, alpha, "computing frame");
            accumulate_views(lf, alpha, frame)
        })?;

    #[cfg(not(feature = "parallel"))]
    for (t, (frame, &alpha)) in out.data_mut().chunks_mut(frame_len).zip(&alphas).enumerate() {
        debug!(frame = t + 1, total, alpha, "computing frame");
        accumulate_views(lf, alpha, frame)?;
    }

    out /= lf.layout().view_count() as f32;
    Ok(out)
}

/// Sums every shifted (and, for steep slopes, prefiltered) view into `frame`.
fn accumulate_views(lf: &LightField<'_>, alpha: f32, frame: &mut [f32]) -> OpsResult<()> {
    let (width, height, channels) = (lf.x_size(), lf.y_size(), lf.channels());
    let layout = lf.layout();
    let radius = alpha.abs();
    let mut acc = Image::new(width, height, 1, channels);

    for v in 0..layout.v_size() {
        for u in 0..layout.u_size() {
            let mut view = lf.extract_view(u, v, 0);

            let (du, dv) = layout.centered_offset(u, v);
            let (shift_x, shift_y) = (du * alpha, dv * alpha);
            if shift_x != 0.0 || shift_y != 0.0 {
                view = translate(&view, width, height, channels, shift_x, shift_y)?;
            }

            if radius > 1.0 {
                view = lanczos_blur(&view, width, height, channels, radius, radius)?;
            }

            acc.try_add(&Image::from_data(width, height, 1, channels, view)?)?;
        }
    }

    frame.copy_from_slice(acc.data());
    Ok(())
}
