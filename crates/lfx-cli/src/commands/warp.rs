//! Warp command - resample a light field through a coordinate map

use crate::commands::{bit_depth, lenslet_size, load_image, save_sequence};
use crate::WarpArgs;
use anyhow::{bail, Context, Result};
use lfx_core::LightField;
use lfx_ops::warp::{lightfield_warp, WarpMode, MAP_CHANNELS};
use tracing::info;

pub fn run(args: WarpArgs, verbose: u8) -> Result<()> {
    let (u_size, v_size) = lenslet_size(&args.lenslet)?;
    let depth = bit_depth(args.depth)?;
    let mode = if args.quick {
        WarpMode::Nearest
    } else {
        WarpMode::Quadrilinear
    };

    let map = load_image(&args.map)?;
    if map.channels() != MAP_CHANNELS {
        bail!(
            "Coordinate map {} has {} channel(s), expected {} (s, t, u, v)",
            args.map.display(),
            map.channels(),
            MAP_CHANNELS
        );
    }

    if verbose > 0 {
        println!("Loading: {}", args.lightfield.display());
    }
    let image = load_image(&args.lightfield)?;
    let lf = LightField::new(&image, u_size, v_size).with_context(|| {
        format!(
            "{} is not a {}x{} lenslet image",
            args.lightfield.display(),
            u_size,
            v_size
        )
    })?;

    info!(
        width = map.width(),
        height = map.height(),
        frames = map.frames(),
        ?mode,
        "Warp"
    );
    if verbose > 0 {
        println!(
            "Warp: {}x{} map, {:?} ({}x{}x{}x{} light field)",
            map.width(),
            map.height(),
            mode,
            lf.x_size(),
            lf.y_size(),
            u_size,
            v_size
        );
    }

    let result = lightfield_warp(&lf, &map, mode)?;
    let written = save_sequence(&args.output, &result, depth)?;

    if verbose > 0 {
        for path in &written {
            println!("Saved: {}", path.display());
        }
    }

    Ok(())
}
