//! lfx - light field processing CLI
//!
//! Refocuses, resamples and annotates lenslet images.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logger;

#[derive(Parser)]
#[command(name = "lfx")]
#[command(author, version, about = "Light field processing CLI")]
#[command(long_about = "
Tools for 4D light fields stored as lenslet images, where each U x V block of
pixels holds the views of one spatial sample.

Examples:
  lfx info lf.png --lenslet 16 16                 # Show size and resolution
  lfx focalstack lf.png -o stack.png --lenslet 16 16 --min -1 --max 1 --step 0.1
  lfx warp lf.png coords.png -o out.png --lenslet 16 16
  lfx warp lf.png coords.png -o preview.png --lenslet 16 16 --quick
  lfx point lf.png -o marked.png --lenslet 16 16 --x 0.5 --y 0.5 --z 0.01
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image and light field information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Synthesize a focal stack by shift-and-add refocusing
    #[command(name = "focalstack", visible_alias = "fs")]
    FocalStack(FocalStackArgs),

    /// Resample a light field through a 4-channel coordinate map
    Warp(WarpArgs),

    /// Draw a synthetic point at a given depth into every view
    Point(PointArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Lenslet size (views per spatial sample) to derive the 4D resolution
    #[arg(long, num_args = 2, value_names = ["U", "V"])]
    lenslet: Vec<usize>,
}

#[derive(Args)]
struct FocalStackArgs {
    /// Input lenslet image
    input: PathBuf,

    /// Output image; multiple frames become a numbered sequence
    #[arg(short, long)]
    output: PathBuf,

    /// Lenslet size (views per spatial sample)
    #[arg(long, num_args = 2, value_names = ["U", "V"], required = true)]
    lenslet: Vec<usize>,

    /// First refocus parameter
    #[arg(long, allow_negative_numbers = true)]
    min: f32,

    /// Last refocus parameter (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    max: f32,

    /// Step between refocus parameters
    #[arg(long, allow_negative_numbers = true)]
    step: f32,

    /// Output bit depth (8 or 16)
    #[arg(short, long, default_value = "16")]
    depth: u8,
}

#[derive(Args)]
struct WarpArgs {
    /// Input lenslet image
    lightfield: PathBuf,

    /// Coordinate map with normalized (s, t, u, v) in RGBA
    map: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Lenslet size of the input (views per spatial sample)
    #[arg(long, num_args = 2, value_names = ["U", "V"], required = true)]
    lenslet: Vec<usize>,

    /// Nearest-ray lookup instead of quadrilinear interpolation
    #[arg(short, long)]
    quick: bool,

    /// Output bit depth (8 or 16)
    #[arg(short, long, default_value = "16")]
    depth: u8,
}

#[derive(Args)]
struct PointArgs {
    /// Input lenslet image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Lenslet size (views per spatial sample)
    #[arg(long, num_args = 2, value_names = ["U", "V"], required = true)]
    lenslet: Vec<usize>,

    /// Horizontal position, normalized to [0, 1]
    #[arg(long, allow_negative_numbers = true)]
    x: f32,

    /// Vertical position, normalized to [0, 1]
    #[arg(long, allow_negative_numbers = true)]
    y: f32,

    /// Disparity (0 = on the focal plane)
    #[arg(long, allow_negative_numbers = true, default_value = "0")]
    z: f32,

    /// Output bit depth (8 or 16)
    #[arg(short, long, default_value = "16")]
    depth: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::FocalStack(args) => commands::focalstack::run(args, cli.verbose),
        Commands::Warp(args) => commands::warp::run(args, cli.verbose),
        Commands::Point(args) => commands::point::run(args, cli.verbose),
    }
}
