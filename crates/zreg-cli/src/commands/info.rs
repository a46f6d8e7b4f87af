use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use zreg_core::io::{read_pages, AcquisitionLayout};

#[derive(Args)]
pub struct InfoArgs {
    /// Multi-page TIFF file
    pub file: PathBuf,

    /// Interleaved channel count; prints per-channel bucket sizes when set
    #[arg(long)]
    pub channels: Option<usize>,

    /// Interleaved fast-z slices per file
    #[arg(long, default_value = "1")]
    pub fast_z_slices: usize,

    /// Fast-z bucket to inspect
    #[arg(long, default_value = "0")]
    pub fast_z_slice: usize,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let pages = read_pages(&args.file)?;
    let (rows, cols) = pages.first().map_or((0, 0), |p| p.dim());

    println!("File:        {}", args.file.display());
    println!("Pages:       {}", pages.len());
    println!("Dimensions:  {}x{}", cols, rows);

    let Some(channels) = args.channels else {
        return Ok(());
    };
    let layout = AcquisitionLayout {
        channels,
        fast_z_slices: args.fast_z_slices,
        fast_z_slice: args.fast_z_slice,
    };
    layout.validate()?;

    println!("Bucket:      {} of {}", args.fast_z_slice, args.fast_z_slices);
    for channel in 0..channels {
        let frames = layout.usable_frames(channel, pages.len());
        let note = if frames.is_empty() {
            " (no usable frames)"
        } else if frames.warmup_retained {
            " (warm-up frame kept)"
        } else {
            ""
        };
        println!("  ch{:<9} {} frames{}", channel, frames.len(), note);
    }

    Ok(())
}
