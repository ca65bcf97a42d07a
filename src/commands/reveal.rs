// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `reveal` command: extract a hidden payload.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use phasmpix::{reveal, RevealRequest};

#[derive(Args, Debug)]
pub struct RevealArgs {
    /// Path to the stego image
    #[arg(short = 'i', long = "image-path")]
    pub image_path: PathBuf,

    /// Passphrase used to encrypt the message
    #[arg(short, long, conflicts_with = "key_path")]
    pub passphrase: Option<String>,

    /// Path to .pem file containing your private key
    #[arg(short = 'k', long = "key-path")]
    pub key_path: Option<PathBuf>,

    /// Output path for the revealed payload (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of workers for DCT parallelism (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    pub workers: usize,
}

pub fn run(args: RevealArgs, verbose: bool) -> Result<()> {
    eprintln!("📂 Loading image...");

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    let report = reveal(
        &RevealRequest {
            image_path: args.image_path,
            passphrase: args.passphrase,
            private_key_path: args.key_path,
            workers: args.workers,
        },
        &mut sink,
    )?;
    sink.flush()?;

    if verbose {
        eprintln!("strategy: {}", report.header.strategy);
        eprintln!("body bits: {}", report.body_bits);
        eprintln!("bytes written: {}", report.bytes_written);
    }
    if let Some(path) = &args.output {
        eprintln!("💾 Wrote payload to {}", path.display());
    }
    eprintln!("✨ Done!");
    Ok(())
}
