// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `capacity` command: print a capacity table for a cover image.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use phasmpix::{capacity, Strategy};

#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Path to the image
    pub image_path: PathBuf,
}

pub fn run(args: CapacityArgs) -> Result<()> {
    let (width, height) = image::image_dimensions(&args.image_path)?;
    let (width, height) = (width as usize, height as usize);

    println!(
        "{:<14}{:<10}{:<14}{:<18}{}",
        "Strategy", "Channels", "Bits/Channel", "Capacity (Bytes)", "Capacity (Bits)"
    );
    println!(
        "{:<14}{:<10}{:<14}{:<18}{}",
        "--------", "--------", "------------", "----------------", "---------------"
    );

    for (channels, bits) in [(3, 1), (3, 2), (3, 4), (4, 1)] {
        print_row(width, height, channels, bits, Strategy::Lsb);
    }
    print_row(width, height, 1, 1, Strategy::Dct);

    Ok(())
}

fn print_row(width: usize, height: usize, channels: usize, bits: usize, strategy: Strategy) {
    let capacity_bits = capacity(width, height, channels, bits, strategy);
    println!(
        "{:<14}{:<10}{:<14}{:<18}{}",
        strategy.name(),
        channels,
        bits,
        capacity_bits / 8,
        capacity_bits
    );
}
