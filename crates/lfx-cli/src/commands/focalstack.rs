//! Focal stack command - refocus a lenslet image over a range of depths

use crate::commands::{bit_depth, lenslet_size, load_image, save_sequence};
use crate::FocalStackArgs;
use anyhow::{Context, Result};
use lfx_core::LightField;
use lfx_ops::focal_stack::{focal_stack, FocalStackParams};
use tracing::info;

pub fn run(args: FocalStackArgs, verbose: u8) -> Result<()> {
    let (u_size, v_size) = lenslet_size(&args.lenslet)?;
    let params = FocalStackParams::new(args.min, args.max, args.step);
    params.validate()?;
    let depth = bit_depth(args.depth)?;

    if verbose > 0 {
        println!("Loading: {}", args.input.display());
    }
    let image = load_image(&args.input)?;
    let lf = LightField::new(&image, u_size, v_size).with_context(|| {
        format!(
            "{} is not a {}x{} lenslet image",
            args.input.display(),
            u_size,
            v_size
        )
    })?;

    info!(
        x = lf.x_size(),
        y = lf.y_size(),
        u = u_size,
        v = v_size,
        frames = params.frame_count(),
        "Focal stack"
    );
    if verbose > 0 {
        println!(
            "Light field: {}x{} spatial, {}x{} views",
            lf.x_size(),
            lf.y_size(),
            u_size,
            v_size
        );
        println!(
            "Alpha: {} to {} step {} ({} frames)",
            args.min,
            args.max,
            args.step,
            params.frame_count()
        );
    }

    let stack = focal_stack(&lf, &params)?;
    let written = save_sequence(&args.output, &stack, depth)?;

    if verbose > 0 {
        for path in &written {
            println!("Saved: {}", path.display());
        }
    }

    Ok(())
}
