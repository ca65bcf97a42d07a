// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Strategy embedders: write and read a byte slice through a stepper.
//!
//! All three strategies share the same contract; bytes are processed
//! LSB-first. LSB replacement and LSB matching run sequentially (they cost
//! almost nothing per bit). The DCT strategy transforms one 8x8 block per
//! bit, so blocks are dispatched to a rayon pool: the stepper walks the
//! block order sequentially (bit order stays deterministic), workers
//! transform independent blocks, and the results are written back into
//! their disjoint pixel regions afterwards. The first worker error cancels
//! the remaining work.

use rand::rngs::OsRng;
use rand::Rng;
use rayon::prelude::*;

use crate::stego::bits::{get_bit_u8, set_bit_u8, write_bit_u8};
use crate::stego::dct;
use crate::stego::error::StegoError;
use crate::stego::raster::Raster;
use crate::stego::stepper::Stepper;
use crate::stego::Strategy;

/// Channel index carrying DCT payloads (Blue).
const BLUE: usize = 2;

/// Worker pool size: the configured count capped at hardware parallelism;
/// 0 means hardware parallelism.
pub fn effective_workers(requested: usize) -> usize {
    let hw = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if requested == 0 {
        hw
    } else {
        requested.min(hw)
    }
}

fn build_pool(workers: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(effective_workers(workers))
        .build()
        .expect("worker pool construction should not fail")
}

/// Write `data` into the image at the positions the stepper yields.
pub fn write_bytes(
    raster: &mut Raster,
    stepper: &mut Stepper,
    data: &[u8],
    strategy: Strategy,
    workers: usize,
) -> Result<(), StegoError> {
    match strategy {
        Strategy::Dct => write_bytes_dct(raster, stepper, data, workers),
        Strategy::Lsb | Strategy::LsbMatching => {
            let matching = strategy == Strategy::LsbMatching;
            let mut rng = OsRng;
            for &byte in data {
                for bit_idx in 0..8 {
                    let (x, y) = stepper.position()?;
                    let channel = stepper.channel();
                    let bit_offset = stepper.bit_offset();
                    let bit = get_bit_u8(byte, bit_idx);

                    let pixel = raster.pixel_mut(x, y);
                    pixel[channel] = if matching {
                        match_bit(pixel[channel], bit_offset, bit, &mut rng)
                    } else {
                        write_bit_u8(pixel[channel], bit_offset, bit)
                    };
                    stepper.step()?;
                }
            }
            Ok(())
        }
    }
}

/// Read `num_bytes` from the image at the positions the stepper yields.
pub fn read_bytes(
    raster: &Raster,
    stepper: &mut Stepper,
    num_bytes: usize,
    strategy: Strategy,
    workers: usize,
) -> Result<Vec<u8>, StegoError> {
    if strategy == Strategy::Dct {
        return read_bytes_dct(raster, stepper, num_bytes, workers);
    }

    let mut out = vec![0u8; num_bytes];
    for i in 0..num_bytes * 8 {
        let (x, y) = stepper.position()?;
        let value = raster.pixel(x, y)[stepper.channel()];
        if get_bit_u8(value, stepper.bit_offset()) != 0 {
            out[i / 8] = set_bit_u8(out[i / 8], i % 8);
        }
        stepper.step()?;
    }
    Ok(out)
}

/// LSB matching: leave the channel untouched when its target bit already
/// matches, otherwise move the whole value by +-1 (chosen at random, with
/// a saturating clamp at the range ends) so the bit flips without the
/// histogram signature of plain overwriting. Only defined for bit offset 0;
/// higher offsets fall back to replacement.
fn match_bit(value: u8, bit_offset: usize, bit: u8, rng: &mut impl Rng) -> u8 {
    if bit_offset != 0 {
        return write_bit_u8(value, bit_offset, bit);
    }
    if value & 1 == bit {
        return value;
    }
    if value == 0 {
        return 1;
    }
    if value == u8::MAX {
        return 254;
    }
    if rng.gen::<bool>() {
        value + 1
    } else {
        value - 1
    }
}

fn gather_block(raster: &Raster, bx: usize, by: usize) -> [u8; 64] {
    let (base_x, base_y) = (bx * 8, by * 8);
    let mut samples = [0u8; 64];
    for dy in 0..8 {
        for dx in 0..8 {
            samples[dy * 8 + dx] = raster.pixel(base_x + dx, base_y + dy)[BLUE];
        }
    }
    samples
}

fn scatter_block(raster: &mut Raster, bx: usize, by: usize, samples: &[u8; 64]) {
    let (base_x, base_y) = (bx * 8, by * 8);
    for dy in 0..8 {
        for dx in 0..8 {
            raster.pixel_mut(base_x + dx, base_y + dy)[BLUE] = samples[dy * 8 + dx];
        }
    }
}

fn write_bytes_dct(
    raster: &mut Raster,
    stepper: &mut Stepper,
    data: &[u8],
    workers: usize,
) -> Result<(), StegoError> {
    // The stepper alone defines the bit-to-block assignment.
    let mut jobs = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for bit_idx in 0..8 {
            let (bx, by) = stepper.position()?;
            jobs.push((bx, by, get_bit_u8(byte, bit_idx)));
            stepper.step()?;
        }
    }

    // Blocks are independent; transform them in parallel against the
    // read-only image, then write the disjoint regions back.
    let shared: &Raster = raster;
    let embedded = build_pool(workers).install(|| {
        jobs.par_iter()
            .map(|&(bx, by, bit)| {
                let mut samples = gather_block(shared, bx, by);
                dct::embed_block(&mut samples, bit)?;
                Ok((bx, by, samples))
            })
            .collect::<Result<Vec<_>, StegoError>>()
    })?;

    for (bx, by, samples) in &embedded {
        scatter_block(raster, *bx, *by, samples);
    }
    Ok(())
}

fn read_bytes_dct(
    raster: &Raster,
    stepper: &mut Stepper,
    num_bytes: usize,
    workers: usize,
) -> Result<Vec<u8>, StegoError> {
    let mut positions = Vec::with_capacity(num_bytes * 8);
    for _ in 0..num_bytes * 8 {
        positions.push(stepper.position()?);
        stepper.step()?;
    }

    // Indexed map keeps the collected bits in iterator order.
    let decoded: Vec<u8> = build_pool(workers).install(|| {
        positions
            .par_iter()
            .map(|&(bx, by)| dct::decode_block(&gather_block(raster, bx, by)))
            .collect()
    });

    let mut out = vec![0u8; num_bytes];
    for (i, &bit) in decoded.iter().enumerate() {
        if bit != 0 {
            out[i / 8] = set_bit_u8(out[i / 8], i % 8);
        }
    }
    Ok(out)
}
