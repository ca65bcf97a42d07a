// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Embedding capacity estimation.

use crate::stego::bits::num_bits_available;
use crate::stego::header::length_field_bits;
use crate::stego::{Strategy, HEADER_PIXELS};

/// Maximum number of bits an image of the given geometry can carry with the
/// given settings. For the LSB strategies this is the raw channel-bit count;
/// DCT carries one bit per usable 8x8 block, with the first block row
/// reserved for the header.
pub fn capacity(
    width: usize,
    height: usize,
    channels: usize,
    bits_per_channel: usize,
    strategy: Strategy,
) -> usize {
    if strategy == Strategy::Dct {
        let blocks_wide = width / 8;
        let blocks_tall = height / 8;
        if blocks_tall <= 1 {
            return 0;
        }
        return blocks_wide * (blocks_tall - 1);
    }
    num_bits_available(width, height, channels, bits_per_channel)
}

/// Upper bound on the *body* bit count a reveal may accept: raw capacity
/// minus the header reservation and the length field. Used to reject
/// forged length fields before allocating anything.
pub fn body_capacity(
    width: usize,
    height: usize,
    channels: usize,
    bits_per_channel: usize,
    strategy: Strategy,
) -> usize {
    let raw = capacity(width, height, channels, bits_per_channel, strategy);
    if strategy == Strategy::Dct {
        return raw;
    }
    raw.saturating_sub(HEADER_PIXELS * channels * bits_per_channel)
        .saturating_sub(length_field_bits(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dct_capacity_reserves_header_row() {
        assert_eq!(capacity(100, 100, 3, 1, Strategy::Dct), 132);
        assert_eq!(capacity(64, 64, 1, 1, Strategy::Dct), 8 * 7);
        // A single block row is entirely reserved.
        assert_eq!(capacity(64, 15, 1, 1, Strategy::Dct), 0);
        assert_eq!(capacity(64, 8, 1, 1, Strategy::Dct), 0);
    }

    #[test]
    fn lsb_capacity_is_raw_channel_bits() {
        assert_eq!(capacity(100, 100, 3, 2, Strategy::Lsb), 60_000);
        assert_eq!(capacity(100, 100, 4, 8, Strategy::LsbMatching), 320_000);
    }

    #[test]
    fn capacity_monotone() {
        let base = capacity(100, 100, 2, 3, Strategy::Lsb);
        assert!(capacity(101, 100, 2, 3, Strategy::Lsb) >= base);
        assert!(capacity(100, 101, 2, 3, Strategy::Lsb) >= base);
        assert!(capacity(100, 100, 3, 3, Strategy::Lsb) >= base);
        assert!(capacity(100, 100, 2, 4, Strategy::Lsb) >= base);
    }

    #[test]
    fn body_capacity_subtracts_reservations() {
        // 100x99 at 2 bits x 3 channels: raw 59400, header 35*3*2=210, L=19.
        assert_eq!(
            body_capacity(100, 99, 3, 2, Strategy::Lsb),
            59_400 - 210 - 19
        );
        // DCT body capacity equals raw block capacity.
        assert_eq!(body_capacity(100, 100, 1, 1, Strategy::Dct), 132);
    }

    #[test]
    fn body_capacity_never_underflows() {
        // 5x5 = 25 pixels: smaller than the 35-pixel header reservation.
        assert_eq!(body_capacity(5, 5, 4, 8, Strategy::Lsb), 0);
    }
}
