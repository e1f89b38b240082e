//! Image info command.
//!
//! Shows size, channels and value range, plus the 4D resolution when a
//! lenslet size is given.

use crate::InfoArgs;
use anyhow::{Context, Result};
use lfx_core::{Image, LensletLayout};
use std::path::Path;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let lenslet = if args.lenslet.is_empty() {
        None
    } else {
        Some(super::lenslet_size(&args.lenslet)?)
    };

    for path in &args.input {
        let image = super::load_image(path)?;
        print_text(path, &image, verbose)?;

        if let Some((u_size, v_size)) = lenslet {
            let layout = LensletLayout::new(image.width(), image.height(), u_size, v_size)
                .with_context(|| format!("{} doesn't fit {}x{} lenslets", path.display(), u_size, v_size))?;
            print_layout(&layout);
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

/// Prints basic image info.
fn print_text(path: &Path, image: &Image, verbose: u8) -> Result<()> {
    println!("{}", path.display());
    println!("  Resolution: {}x{}", image.width(), image.height());
    println!("  Channels:   {}", image.channels());
    println!("  Pixels:     {}", image.width() as u64 * image.height() as u64);

    let (min, max) = image.min_max();
    println!("  Range:      [{:.4}, {:.4}]", min, max);

    if verbose > 0 {
        println!("  Mean:       {:.4}", image.mean());
        let size = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        println!("  File size:  {} B", size);
    }
    Ok(())
}

/// Prints the light field resolution for a lenslet layout.
fn print_layout(layout: &LensletLayout) {
    println!(
        "  Light field: {}x{} spatial, {}x{} angular ({} views)",
        layout.x_size(),
        layout.y_size(),
        layout.u_size(),
        layout.v_size(),
        layout.view_count()
    );
}
