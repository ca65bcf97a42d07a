// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! 8x8 DCT core for the frequency-domain embedding strategy.
//!
//! One bit is carried per 8x8 block of the Blue channel, as the parity of
//! the quantized mid-frequency coefficient (1, 2). The quantization step is
//! adaptive: busy (high-variance) blocks tolerate larger coefficient shifts
//! before the change becomes visible, flat blocks need small shifts to avoid
//! banding.
//!
//! Embedding must survive its own round trip through the inverse transform
//! and 8-bit clipping, so [`embed_block`] decodes what it just wrote and
//! walks a widening ladder of quantization candidates until the bit sticks.

use std::sync::OnceLock;

use crate::stego::error::StegoError;

/// 8x8 block of samples or coefficients. First index follows x, second
/// follows y, matching the pixel gather order in the embedder.
pub type Block = [[f64; 8]; 8];

/// Coefficient position carrying the bit: a mid-low frequency, the
/// compromise between imperceptibility and surviving clipping.
const COEFF: (usize, usize) = (1, 2);

const MIN_SCALE: f64 = 20.0;
const MAX_SCALE: f64 = 80.0;
const MIN_VARIANCE: f64 = 5.0;
const MAX_VARIANCE: f64 = 250.0;

/// Widest quantization shift tried by the embed retry ladder, in steps of 2.
const MAX_RETRY: i64 = 25;

/// cos((2n+1) * u * pi / 16), indexed [n][u].
fn cos_table() -> &'static [[f64; 8]; 8] {
    static TABLE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [[0.0; 8]; 8];
        for (n, row) in t.iter_mut().enumerate() {
            for (u, v) in row.iter_mut().enumerate() {
                *v = ((2 * n + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        t
    })
}

fn alpha(u: usize) -> f64 {
    if u == 0 {
        std::f64::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Forward orthonormal 2-D DCT-II, as two separable 1-D passes.
pub fn dct2d(block: &Block) -> Block {
    let cos = cos_table();

    // Transform along the second index.
    let mut tmp = [[0.0; 8]; 8];
    for i in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for j in 0..8 {
                sum += block[i][j] * cos[j][v];
            }
            tmp[i][v] = 0.5 * alpha(v) * sum;
        }
    }

    // Transform along the first index.
    let mut out = [[0.0; 8]; 8];
    for u in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for i in 0..8 {
                sum += tmp[i][v] * cos[i][u];
            }
            out[u][v] = 0.5 * alpha(u) * sum;
        }
    }
    out
}

/// Inverse 2-D DCT; the exact transpose of [`dct2d`].
pub fn idct2d(coeffs: &Block) -> Block {
    let cos = cos_table();

    let mut tmp = [[0.0; 8]; 8];
    for u in 0..8 {
        for j in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += 0.5 * alpha(v) * coeffs[u][v] * cos[j][v];
            }
            tmp[u][j] = sum;
        }
    }

    let mut out = [[0.0; 8]; 8];
    for i in 0..8 {
        for j in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += 0.5 * alpha(u) * tmp[u][j] * cos[i][u];
            }
            out[i][j] = sum;
        }
    }
    out
}

/// Mean of squared deviations over the 64 samples.
pub fn block_variance(block: &Block) -> f64 {
    let mut sum = 0.0;
    for row in block {
        for &v in row {
            sum += v;
        }
    }
    let mean = sum / 64.0;

    let mut variance = 0.0;
    for row in block {
        for &v in row {
            variance += (v - mean) * (v - mean);
        }
    }
    variance / 64.0
}

/// Quantization step for a block of the given variance, linear between
/// (variance 5, scale 20) and (variance 250, scale 80), clamped outside.
pub fn adaptive_scale(variance: f64) -> f64 {
    if variance < MIN_VARIANCE {
        return MIN_SCALE;
    }
    if variance > MAX_VARIANCE {
        return MAX_SCALE;
    }
    MIN_SCALE + (variance - MIN_VARIANCE) * (MAX_SCALE - MIN_SCALE) / (MAX_VARIANCE - MIN_VARIANCE)
}

/// Blue samples in pixel gather order: index `y_offset * 8 + x_offset`.
fn block_from_samples(samples: &[u8; 64]) -> Block {
    let mut block = [[0.0; 8]; 8];
    for (i, col) in block.iter_mut().enumerate() {
        for (j, v) in col.iter_mut().enumerate() {
            *v = samples[j * 8 + i] as f64;
        }
    }
    block
}

/// Embed one bit into the 64 Blue samples of a block.
///
/// Quantizes coefficient (1, 2) to the bit's parity, inverse-transforms,
/// clips to 8 bits, and verifies the bit decodes back. If quantization
/// noise flips it, retries with progressively larger shifts
/// (q, q+2, q-2, q+4, ... up to q+-50), restoring the original samples
/// between attempts.
///
/// # Errors
/// [`StegoError::DctEmbedFailed`] when no candidate survives the round trip.
pub fn embed_block(samples: &mut [u8; 64], bit: u8) -> Result<(), StegoError> {
    let original = *samples;
    let block = block_from_samples(samples);

    let variance = block_variance(&block);
    let scale = adaptive_scale(variance);
    let mut coeffs = dct2d(&block);

    let val = coeffs[COEFF.0][COEFF.1];
    let mut q = (val / scale).round() as i64;

    // Nudge q toward the nearest parity-correct integer.
    if q.rem_euclid(2) != bit as i64 {
        if val < q as f64 * scale {
            q -= 1;
        } else {
            q += 1;
        }
    }

    let original_q = q;
    for i in 0..=MAX_RETRY {
        for &try_q in &[original_q + 2 * i, original_q - 2 * i] {
            coeffs[COEFF.0][COEFF.1] = try_q as f64 * scale;
            let restored = idct2d(&coeffs);

            for (x, col) in restored.iter().enumerate() {
                for (y, &v) in col.iter().enumerate() {
                    samples[y * 8 + x] = v.clamp(0.0, 255.0) as u8;
                }
            }

            if decode_block(samples) == bit {
                return Ok(());
            }
            *samples = original;

            if i == 0 {
                break; // +0 and -0 are the same candidate
            }
        }
    }
    Err(StegoError::DctEmbedFailed)
}

/// Decode the bit carried by a block: the parity of the quantized (1, 2)
/// coefficient, with the scale re-derived from the current samples.
pub fn decode_block(samples: &[u8; 64]) -> u8 {
    let block = block_from_samples(samples);
    let variance = block_variance(&block);
    let scale = adaptive_scale(variance);
    let coeffs = dct2d(&block);
    let q = (coeffs[COEFF.0][COEFF.1] / scale).round() as i64;
    q.rem_euclid(2) as u8
}
