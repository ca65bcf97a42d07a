// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! `analyze` command: MSE/PSNR metrics and a difference heatmap.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use phasmpix::{analyze, AnalyzeRequest};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the original image
    #[arg(short, long)]
    pub original: PathBuf,

    /// Path to the stego image
    #[arg(short, long)]
    pub stego: PathBuf,

    /// Output path for the difference heatmap image
    #[arg(short = 'd', long, default_value = "heatmap.png")]
    pub heatmap: PathBuf,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    eprintln!("📂 Loading images...");
    let report = analyze(&AnalyzeRequest {
        original_path: args.original,
        stego_path: args.stego,
        heatmap_path: args.heatmap.clone(),
    })?;
    eprintln!("✨ Done!");

    println!("Analysis Complete:");
    println!("------------------");
    println!("MSE (Mean Squared Error):       {:.4}", report.mse);
    println!("PSNR (Peak Signal-to-Noise):    {:.2} dB", report.psnr);
    println!("Heatmap saved to:               {}", args.heatmap.display());
    println!();
    println!("Interpretation:");
    println!(" > 30dB: Good quality (hard to detect visually)");
    println!(" > 40dB: Excellent quality");
    Ok(())
}
