// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `keys` command: generate an RSA key pair for hybrid encryption.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use phasmpix::stego::keys::generate_keypair;

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Directory to save the keys into (must exist)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Key length in bits (2048 or 4096)
    #[arg(short, long, default_value_t = 2048)]
    pub bits: usize,
}

pub fn run(args: KeysArgs) -> Result<()> {
    if args.bits != 2048 && args.bits != 4096 {
        bail!("key length must be 2048 or 4096 bits");
    }

    eprintln!("🔑 Generating {}-bit RSA keys...", args.bits);
    let (private_path, public_path) = generate_keypair(args.bits, &args.output)?;

    println!("Private key: {}", private_path.display());
    println!("Public key:  {}", public_path.display());
    eprintln!("✨ Keys generated successfully");
    Ok(())
}
