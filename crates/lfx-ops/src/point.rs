//! Synthetic point rendering.
//!
//! [`mark_point`] draws a single bright point into a light field at a chosen
//! depth. The point lands at a different spatial pixel in each view, offset
//! by its disparity times the view's centered angular position, which is the
//! parallax the focal stack undoes when it refocuses onto that depth.

use crate::{OpsError, OpsResult};
use lfx_core::LightFieldMut;
use tracing::{debug, trace};

/// Value written into every channel of a marked ray.
const POINT_VALUE: f32 = 1.0;

/// Marks the 3D point `(px, py, pz)` in every view of frame 0.
///
/// `px` and `py` are normalized spatial coordinates in `[0, 1]` and `pz` is
/// the disparity (0 = on the focal plane). For view `(u, v)` the point
/// projects to
///
/// ```text
/// x = round((px + pz * (u + 0.5 - U/2)) * X)
/// y = round((py + pz * (v + 0.5 - V/2)) * Y)
/// ```
///
/// and all channels of ray `(x, y, u, v)` are set to 1. Views where the
/// projection falls outside `[0, X) x [0, Y)` are left untouched.
///
/// Returns the number of views that were marked.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] if any coordinate is not finite.
///
/// # Example
///
/// ```rust
/// use lfx_core::{Image, LightFieldMut};
/// use lfx_ops::point::mark_point;
///
/// let mut image = Image::new(16, 16, 1, 1);
/// let mut lf = LightFieldMut::new(&mut image, 2, 2).unwrap();
/// assert_eq!(mark_point(&mut lf, 0.5, 0.5, 0.0).unwrap(), 4);
/// assert_eq!(lf.as_view().at(4, 4, 1, 1, 0), 1.0);
/// ```
pub fn mark_point(lf: &mut LightFieldMut<'_>, px: f32, py: f32, pz: f32) -> OpsResult<usize> {
    trace!(px, py, pz, "mark_point");

    if !(px.is_finite() && py.is_finite() && pz.is_finite()) {
        return Err(OpsError::InvalidParameter(format!(
            "point ({px}, {py}, {pz}) must be finite"
        )));
    }

    let layout = lf.layout();
    let (xs, ys) = (layout.x_size(), layout.y_size());
    let (us, vs) = (layout.u_size(), layout.v_size());

    let mut marked = 0;
    for v in 0..vs {
        let pv = v as f32 + 0.5 - vs as f32 / 2.0;
        let Some(y) = project(py + pz * pv, ys) else {
            continue;
        };
        for u in 0..us {
            let pu = u as f32 + 0.5 - us as f32 / 2.0;
            let Some(x) = project(px + pz * pu, xs) else {
                continue;
            };
            lf.ray_mut(x, y, u, v).fill(POINT_VALUE);
            marked += 1;
        }
    }

    debug!(marked, views = us * vs, "Marked point");
    Ok(marked)
}

/// Rounds a normalized coordinate to a pixel index, or `None` if it falls
/// outside `[0, extent)`.
#[inline]
fn project(coord: f32, extent: usize) -> Option<usize> {
    let index = (coord * extent as f32 + 0.5).floor();
    (index >= 0.0 && index < extent as f32).then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfx_core::{Image, LensletLayout};

    #[test]
    fn test_center_point_marks_every_view() {
        // X = 8, Y = 6, U = 3, V = 2
        let mut image = Image::new(24, 12, 1, 2);
        image.fill(0.25);
        let before = image.clone();

        let marked = {
            let mut lf = LightFieldMut::new(&mut image, 3, 2).unwrap();
            mark_point(&mut lf, 0.5, 0.5, 0.0).unwrap()
        };
        assert_eq!(marked, 6);

        let layout = LensletLayout::new(24, 12, 3, 2).unwrap();
        let mut changed = 0;
        for py in 0..12 {
            for px in 0..24 {
                let (x, y, _, _) = layout.pixel_to_ray(px, py);
                let pixel = image.pixel(px, py, 0);
                if (x, y) == (4, 3) {
                    assert_eq!(pixel, &[1.0, 1.0]);
                    changed += 1;
                } else {
                    assert_eq!(pixel, before.pixel(px, py, 0));
                }
            }
        }
        assert_eq!(changed, 6);
    }

    #[test]
    fn test_out_of_frame_views_untouched() {
        // X = 10, U = 3: pu is -1, 0, 1 so only the center view stays in frame.
        let mut image = Image::new(30, 4, 1, 1);
        let marked = {
            let mut lf = LightFieldMut::new(&mut image, 3, 1).unwrap();
            mark_point(&mut lf, 0.5, 0.5, 0.6).unwrap()
        };
        assert_eq!(marked, 1);

        let lf = lfx_core::LightField::new(&image, 3, 1).unwrap();
        assert_eq!(lf.at(5, 2, 1, 0, 0), 1.0);
        assert_eq!(image.data().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_parallax_follows_view() {
        // X = 16, U = 3, V = 1: disparity 1/16 moves the point one pixel per view.
        let mut image = Image::new(48, 8, 1, 1);
        let mut lf = LightFieldMut::new(&mut image, 3, 1).unwrap();
        assert_eq!(mark_point(&mut lf, 0.5, 0.5, 1.0 / 16.0).unwrap(), 3);

        let view = lf.as_view();
        assert_eq!(view.at(7, 4, 0, 0, 0), 1.0);
        assert_eq!(view.at(8, 4, 1, 0, 0), 1.0);
        assert_eq!(view.at(9, 4, 2, 0, 0), 1.0);
        assert_eq!(view.at(8, 4, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_edge_coordinates() {
        let mut image = Image::new(8, 8, 1, 1);
        let mut lf = LightFieldMut::new(&mut image, 2, 2).unwrap();
        // px = 1 rounds to X, which is outside the frame.
        assert_eq!(mark_point(&mut lf, 1.0, 0.5, 0.0).unwrap(), 0);
        assert_eq!(mark_point(&mut lf, 0.0, 0.0, 0.0).unwrap(), 4);
        assert_eq!(lf.as_view().at(0, 0, 1, 1, 0), 1.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut image = Image::new(4, 4, 1, 1);
        let mut lf = LightFieldMut::new(&mut image, 2, 2).unwrap();
        assert!(matches!(
            mark_point(&mut lf, f32::NAN, 0.5, 0.0),
            Err(OpsError::InvalidParameter(_))
        ));
        assert!(mark_point(&mut lf, 0.5, 0.5, f32::INFINITY).is_err());
    }
}
