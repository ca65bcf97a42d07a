// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `conceal` command: hide a message or file in a cover image.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Args;

use phasmpix::{conceal, ConcealOutcome, ConcealRequest, PayloadSource, Strategy};

#[derive(Args, Debug)]
pub struct ConcealArgs {
    /// Path to the cover image
    #[arg(short = 'i', long = "image-path")]
    pub image_path: PathBuf,

    /// Passphrase to encrypt the message
    #[arg(short, long, conflicts_with = "key_path")]
    pub passphrase: Option<String>,

    /// Path to .pem file containing the recipient's public key
    #[arg(short = 'k', long = "key-path")]
    pub key_path: Option<PathBuf>,

    /// Message to conceal
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// Path to a file to conceal; "-" reads from stdin
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output path for the stego image (default: <image>.out)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of bits to use per channel value (1-8)
    #[arg(short = 'n', long = "num-bits", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(1..=8))]
    pub num_bits: u8,

    /// Number of RGBA channels to use (1-4)
    #[arg(short, long, default_value_t = 3,
          value_parser = clap::value_parser!(u8).range(1..=4))]
    pub channels: u8,

    /// Steganography strategy: lsb, lsb-matching, dct
    #[arg(short, long, default_value = "dct")]
    pub strategy: String,

    /// Number of workers for DCT parallelism (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    pub workers: usize,

    /// Compress the payload with zlib before embedding
    #[arg(short = 'z', long, default_value_t = true, action = clap::ArgAction::Set,
          num_args = 0..=1, default_missing_value = "true")]
    pub compress: bool,

    /// Check capacity only; do not write an output image
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ConcealArgs, verbose: bool) -> Result<()> {
    let strategy = Strategy::from_name(&args.strategy)
        .ok_or_else(|| anyhow!("unknown strategy {:?} (use lsb, lsb-matching or dct)", args.strategy))?;

    let source = match (&args.message, &args.file) {
        (_, Some(file)) if file == "-" => {
            eprintln!("📖 Reading message from stdin...");
            PayloadSource::Stdin
        }
        (_, Some(file)) => PayloadSource::File(PathBuf::from(file)),
        (Some(message), None) => PayloadSource::Message(message.clone()),
        (None, None) => bail!("either --message or --file must be provided"),
    };

    eprintln!("📂 Loading image...");
    let outcome = conceal(&ConcealRequest {
        image_path: args.image_path,
        output_path: args.output,
        source,
        passphrase: args.passphrase,
        public_key_path: args.key_path,
        strategy,
        bits_per_channel: args.num_bits as usize,
        num_channels: args.channels as usize,
        workers: args.workers,
        compress: args.compress,
        dry_run: args.dry_run,
    })?;

    match outcome {
        ConcealOutcome::DryRun {
            available_bits,
            estimated_bits,
        } => {
            match estimated_bits {
                Some(estimate) => eprintln!(
                    "Dry run capacity check: {available_bits} bits available, ~{estimate} bits needed"
                ),
                None => eprintln!(
                    "Dry run capacity check: {available_bits} bits available, input size unknown (stream)"
                ),
            }
            eprintln!("✅ Image has sufficient capacity for this message");
        }
        ConcealOutcome::Written {
            output,
            body_bits,
            width,
            height,
            available_bits,
        } => {
            if verbose {
                eprintln!("image dimensions: {width}x{height}");
                eprintln!("bits available for use: {available_bits}");
                eprintln!("body bits written: {body_bits}");
            }
            eprintln!("💾 Saved output image to {}", output.display());
            eprintln!("✨ Done!");
        }
    }
    Ok(())
}
