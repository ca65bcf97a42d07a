// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `info` command: print the metadata header of a stego image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use phasmpix::inspect;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the stego image
    pub image_path: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let info = inspect(&args.image_path)
        .with_context(|| format!("failed to get info from {}", args.image_path.display()))?;

    println!("Stego Header Information:");
    println!("-------------------------");
    println!("Strategy:         {}", info.strategy);
    println!("Channels Used:    {}", info.channels);
    println!("Bits Per Channel: {}", info.bits_per_channel);
    println!("Compressed:       {}", info.compressed);
    println!("Payload Size:     {} bytes", info.payload_bytes);
    println!();
    println!("Note: the payload size is read at unkeyed positions and is");
    println!("only accurate when no passphrase was used (DCT images excepted).");
    Ok(())
}
