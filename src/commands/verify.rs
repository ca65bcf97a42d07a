// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `verify` command: Reed-Solomon integrity check without extraction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use phasmpix::{verify, VerifyRequest};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the stego image
    #[arg(short = 'i', long = "image-path")]
    pub image_path: PathBuf,

    /// Passphrase used at conceal time (needed for correct pixel traversal)
    #[arg(short, long)]
    pub passphrase: Option<String>,

    /// Number of workers for DCT parallelism (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    pub workers: usize,
}

pub fn run(args: VerifyArgs, verbose: bool) -> Result<()> {
    eprintln!("📂 Loading image...");
    let report = verify(&VerifyRequest {
        image_path: args.image_path,
        passphrase: args.passphrase,
        workers: args.workers,
    })?;

    if verbose {
        eprintln!("all chunks passed the Reed-Solomon integrity check");
    }
    println!("✅ Image verification successful!");
    println!("Strategy:         {}", report.strategy);
    println!("Message Size:     {} bits", report.message_bits);
    println!("Channels Used:    {}", report.num_channels);
    println!("Bits Per Channel: {}", report.bits_per_channel);
    Ok(())
}
