// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Channel/bit cursor over a pixel traversal.
//!
//! A [`Stepper`] composes a [`PixelIter`] with the embedding settings
//! `(bits_per_channel, num_channels)` and tracks the current
//! `(position, channel, bit_offset)` target. [`Stepper::step`] advances one
//! bit; the channel wraps into the next pixel, the pixel wraps into the next
//! iterator position. After the traversal is exhausted the stepper holds no
//! valid target and any further access fails with
//! [`StegoError::IteratorExhausted`].
//!
//! For the DCT strategy the stepper runs with one channel and one bit per
//! channel, and its positions are 8x8 *block* coordinates.

use crate::stego::error::StegoError;
use crate::stego::iter::PixelIter;

/// Cursor pointing at one bit of one channel of one pixel (or block).
pub struct Stepper {
    iter: PixelIter,
    pos: Option<(usize, usize)>,
    channel: usize,
    bit_offset: usize,
    bits_per_channel: usize,
    num_channels: usize,
}

impl Stepper {
    /// Wrap an iterator with the given embedding settings. The cursor starts
    /// at the iterator's first position, channel 0, bit offset 0.
    pub fn new(mut iter: PixelIter, bits_per_channel: usize, num_channels: usize) -> Self {
        let pos = iter.next();
        Self {
            iter,
            pos,
            channel: 0,
            bit_offset: 0,
            bits_per_channel,
            num_channels,
        }
    }

    /// Stepper over pixels: seeded traversal when `seed != 0`, linear
    /// otherwise. An empty passphrase derives seed 0, so unkeyed images
    /// always use the linear order.
    pub fn for_image(
        width: usize,
        height: usize,
        bits_per_channel: usize,
        num_channels: usize,
        seed: i64,
    ) -> Self {
        let iter = if seed != 0 {
            PixelIter::seeded(width, height, seed)
        } else {
            PixelIter::linear(width, height)
        };
        Self::new(iter, bits_per_channel, num_channels)
    }

    /// Stepper over 8x8 DCT blocks: one bit per block, header block row
    /// excluded by the iterator.
    pub fn for_blocks(width: usize, height: usize) -> Self {
        Self::new(PixelIter::blocks(width, height), 1, 1)
    }

    /// Current position, or [`StegoError::IteratorExhausted`] once the
    /// traversal has run out.
    pub fn position(&self) -> Result<(usize, usize), StegoError> {
        self.pos.ok_or(StegoError::IteratorExhausted)
    }

    /// Channel index of the current target.
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Bit index within the current channel.
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Advance one bit. Exhausting the traversal on this step is not an
    /// error; only stepping *from* an exhausted cursor fails. This lets a
    /// payload that exactly fills the carrier embed cleanly.
    pub fn step(&mut self) -> Result<(), StegoError> {
        if self.pos.is_none() {
            return Err(StegoError::IteratorExhausted);
        }
        self.bit_offset += 1;
        if self.bit_offset >= self.bits_per_channel {
            self.bit_offset = 0;
            self.channel += 1;
            if self.channel >= self.num_channels {
                self.channel = 0;
                self.pos = self.iter.next();
            }
        }
        Ok(())
    }

    /// Advance to the next iterator position, resetting channel and bit
    /// offset. Used to reserve the header pixels.
    pub fn skip_pixel(&mut self) -> Result<(), StegoError> {
        if self.pos.is_none() {
            return Err(StegoError::IteratorExhausted);
        }
        self.pos = self.iter.next();
        self.channel = 0;
        self.bit_offset = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_bits_then_channels_then_pixels() {
        let mut s = Stepper::for_image(4, 4, 2, 3, 0);
        assert_eq!(s.position().unwrap(), (0, 0));
        assert_eq!((s.channel(), s.bit_offset()), (0, 0));

        s.step().unwrap();
        assert_eq!((s.channel(), s.bit_offset()), (0, 1));

        s.step().unwrap();
        assert_eq!((s.channel(), s.bit_offset()), (1, 0));

        // Finish channels 1 and 2 of pixel 0: 4 more bits.
        for _ in 0..4 {
            s.step().unwrap();
        }
        assert_eq!(s.position().unwrap(), (1, 0));
        assert_eq!((s.channel(), s.bit_offset()), (0, 0));
    }

    #[test]
    fn skip_pixel_resets_cursor() {
        let mut s = Stepper::for_image(4, 4, 3, 2, 0);
        s.step().unwrap();
        s.step().unwrap();
        s.skip_pixel().unwrap();
        assert_eq!(s.position().unwrap(), (1, 0));
        assert_eq!((s.channel(), s.bit_offset()), (0, 0));
    }

    #[test]
    fn exact_capacity_does_not_err() {
        // 2x2 pixels, 1 channel, 1 bit -> exactly 4 bits.
        let mut s = Stepper::for_image(2, 2, 1, 1, 0);
        for _ in 0..4 {
            s.position().unwrap();
            s.step().unwrap();
        }
        // All 4 bits written; the cursor is exhausted only now.
        assert!(matches!(s.position(), Err(StegoError::IteratorExhausted)));
        assert!(matches!(s.step(), Err(StegoError::IteratorExhausted)));
    }

    #[test]
    fn skip_past_end_errs() {
        let mut s = Stepper::for_image(2, 1, 1, 4, 0);
        s.skip_pixel().unwrap();
        s.skip_pixel().unwrap();
        assert!(matches!(s.skip_pixel(), Err(StegoError::IteratorExhausted)));
    }

    #[test]
    fn block_stepper_one_bit_per_block() {
        let mut s = Stepper::for_blocks(32, 24);
        // 4 blocks wide, block rows 1..3 -> 8 blocks -> 8 bits.
        for i in 0..8 {
            let (bx, by) = s.position().unwrap();
            assert_eq!((bx, by), (i % 4, 1 + i / 4));
            s.step().unwrap();
        }
        assert!(s.position().is_err());
    }

    #[test]
    fn seeded_stepper_header_positions_linear() {
        let mut s = Stepper::for_image(10, 10, 1, 4, 77);
        for i in 0..crate::stego::HEADER_PIXELS {
            assert_eq!(s.position().unwrap(), (i % 10, i / 10));
            s.skip_pixel().unwrap();
        }
    }
}
