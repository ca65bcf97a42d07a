// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Cover/stego comparison: MSE, PSNR and a difference heatmap.
//!
//! The metrics run over the R/G/B channels only (alpha is never modified by
//! the embedders). The heatmap marks unchanged pixels black and shades
//! modified pixels from green (small difference) to red (large), with the
//! per-pixel sum of absolute channel differences amplified by 50 so that
//! single-LSB changes remain visible.

use std::path::{Path, PathBuf};

use crate::stego::error::StegoError;
use crate::stego::raster::Raster;

/// Inputs for [`analyze`].
pub struct AnalyzeRequest {
    pub original_path: PathBuf,
    pub stego_path: PathBuf,
    pub heatmap_path: PathBuf,
}

/// Comparison metrics between two images.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisReport {
    /// Mean squared error per channel sample (R/G/B only).
    pub mse: f64,
    /// Peak signal-to-noise ratio in dB; `f64::INFINITY` for identical images.
    pub psnr: f64,
}

/// Compare an original image with a stego image and write the difference
/// heatmap PNG.
///
/// # Errors
/// [`StegoError::DimensionMismatch`] when the images differ in size.
pub fn analyze(req: &AnalyzeRequest) -> Result<AnalysisReport, StegoError> {
    let original = Raster::load(&req.original_path)?;
    let stego = Raster::load(&req.stego_path)?;
    let report = compare(&original, &stego, Some(&req.heatmap_path))?;
    Ok(report)
}

/// In-memory comparison; writes the heatmap when a path is given.
pub fn compare(
    original: &Raster,
    stego: &Raster,
    heatmap_path: Option<&Path>,
) -> Result<AnalysisReport, StegoError> {
    if original.width() != stego.width() || original.height() != stego.height() {
        return Err(StegoError::DimensionMismatch);
    }

    let (width, height) = (original.width(), original.height());
    let mut heatmap = Raster::new(width, height);
    let mut sum_squared_error = 0.0f64;

    for y in 0..height {
        for x in 0..width {
            let a = original.pixel(x, y);
            let b = stego.pixel(x, y);

            let mut diff_sum = 0.0f64;
            let mut modified = false;
            for c in 0..3 {
                let diff = a[c] as f64 - b[c] as f64;
                sum_squared_error += diff * diff;
                diff_sum += diff.abs();
                if a[c] != b[c] {
                    modified = true;
                }
            }

            let out = heatmap.pixel_mut(x, y);
            if modified {
                let intensity = (diff_sum * 50.0).min(255.0) as u8;
                out.copy_from_slice(&[intensity, 255 - intensity, 0, 255]);
            } else {
                out.copy_from_slice(&[0, 0, 0, 255]);
            }
        }
    }

    if let Some(path) = heatmap_path {
        heatmap.save_png(path)?;
    }

    let mse = sum_squared_error / (width as f64 * height as f64 * 3.0);
    let psnr = if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * ((255.0 * 255.0) / mse).log10()
    };

    Ok(AnalysisReport { mse, psnr })
}
