// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Pixel traversal policies.
//!
//! [`PixelIter`] yields the positions a stepper visits, in one of three
//! deterministic orders:
//!
//! - **Linear**: row-major pixel order.
//! - **Seeded**: the first [`HEADER_PIXELS`](crate::stego::HEADER_PIXELS)
//!   positions stay in row-major order (header and salt are always at known
//!   locations), the remaining positions are permuted by a Fisher-Yates
//!   shuffle keyed by the passphrase-derived seed.
//! - **Block**: 8x8 block coordinates for the DCT strategy. Block row 0 is
//!   reserved for the header, so traversal starts at block row 1.
//!
//! # Cross-platform portability
//!
//! The Fisher-Yates shuffle uses `u32` for `gen_range` (not `usize`) so the
//! permutation is identical on 32-bit and 64-bit targets; `usize` ranges
//! consume different amounts of PRNG entropy per step and would produce
//! completely different shuffles.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::stego::HEADER_PIXELS;

/// A deterministic traversal over pixel (or block) positions.
pub enum PixelIter {
    Linear(Linear),
    Seeded(Seeded),
    Block(Block),
}

impl PixelIter {
    /// Row-major traversal of every pixel.
    pub fn linear(width: usize, height: usize) -> Self {
        Self::Linear(Linear {
            width,
            total: width * height,
            index: 0,
        })
    }

    /// Header-prefix-preserving shuffled traversal.
    ///
    /// For a fixed `(width, height, seed)` the sequence is reproducible
    /// bit-exactly. Callers use [`PixelIter::linear`] for seed 0 so that
    /// header tooling can re-derive positions without key material.
    pub fn seeded(width: usize, height: usize, seed: i64) -> Self {
        let total = width * height;
        let mut order: Vec<u32> = (0..total as u32).collect();

        if total > HEADER_PIXELS + 1 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed as u64);
            let tail = &mut order[HEADER_PIXELS..];
            for i in (1..tail.len()).rev() {
                let j = rng.gen_range(0..=(i as u32)) as usize;
                tail.swap(i, j);
            }
        }

        Self::Seeded(Seeded {
            width,
            order,
            index: 0,
        })
    }

    /// 8x8 block traversal for DCT, skipping the header block row.
    pub fn blocks(width: usize, height: usize) -> Self {
        Self::Block(Block {
            blocks_wide: width / 8,
            blocks_tall: height / 8,
            bx: 0,
            by: 1,
        })
    }

    /// Next position: pixel `(x, y)` for Linear/Seeded, block `(bx, by)`
    /// for Block. `None` when the traversal is exhausted.
    pub fn next(&mut self) -> Option<(usize, usize)> {
        match self {
            Self::Linear(it) => {
                if it.index >= it.total {
                    return None;
                }
                let flat = it.index;
                it.index += 1;
                Some((flat % it.width, flat / it.width))
            }
            Self::Seeded(it) => {
                let flat = *it.order.get(it.index)? as usize;
                it.index += 1;
                Some((flat % it.width, flat / it.width))
            }
            Self::Block(it) => {
                if it.blocks_wide == 0 || it.by >= it.blocks_tall {
                    return None;
                }
                let pos = (it.bx, it.by);
                it.bx += 1;
                if it.bx >= it.blocks_wide {
                    it.bx = 0;
                    it.by += 1;
                }
                Some(pos)
            }
        }
    }
}

pub struct Linear {
    width: usize,
    total: usize,
    index: usize,
}

pub struct Seeded {
    width: usize,
    order: Vec<u32>,
    index: usize,
}

pub struct Block {
    blocks_wide: usize,
    blocks_tall: usize,
    bx: usize,
    by: usize,
}
