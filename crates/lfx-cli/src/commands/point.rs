//! Point command - draw a synthetic point into every view

use crate::commands::{bit_depth, lenslet_size, load_image, save_image};
use crate::PointArgs;
use anyhow::{Context, Result};
use lfx_core::LightFieldMut;
use lfx_ops::point::mark_point;
use tracing::info;

pub fn run(args: PointArgs, verbose: u8) -> Result<()> {
    let (u_size, v_size) = lenslet_size(&args.lenslet)?;
    let depth = bit_depth(args.depth)?;

    let mut image = load_image(&args.input)?;
    let marked = {
        let mut lf = LightFieldMut::new(&mut image, u_size, v_size).with_context(|| {
            format!(
                "{} is not a {}x{} lenslet image",
                args.input.display(),
                u_size,
                v_size
            )
        })?;
        mark_point(&mut lf, args.x, args.y, args.z)?
    };

    info!(marked, views = u_size * v_size, "Point marked");
    if verbose > 0 {
        println!(
            "Point ({}, {}, {}) visible in {} of {} views",
            args.x,
            args.y,
            args.z,
            marked,
            u_size * v_size
        );
    }

    save_image(&args.output, &image, depth)?;

    if verbose > 0 {
        println!("Saved: {}", args.output.display());
    }

    Ok(())
}
