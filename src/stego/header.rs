// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Stego container header codec.
//!
//! The header occupies the first 35 pixels in linear row-major order,
//! always at bit 0 of every channel, regardless of strategy or seed — it
//! must be readable without the passphrase, and the DCT body never touches
//! it because blocks start at block row 1:
//!
//! ```text
//! pixel 0      4-bit bits-per-channel (bit 0 of each channel)
//! pixel 1      4-bit channel count
//! pixel 2      strategy (bits 0-1), compression flag (bit 2), bit 3 reserved
//! pixels 3-34  128-bit salt
//! ```
//!
//! Immediately after the prelude, `L = ceil(log2(W*H*4*8))` bits carry the
//! total body bit count, written through a stepper shaped like the reveal
//! stepper (so body and length writes land on disjoint positions). The
//! header is written *after* the body: input can stream with unknown size,
//! and the length measured during embedding is patched in at the end.

use crate::stego::bits::{ceil_log2, get_bit, get_bit_u8, num_bits_available, set_bit, write_bit_u8};
use crate::stego::crypto::SALT_LEN;
use crate::stego::error::StegoError;
use crate::stego::raster::Raster;
use crate::stego::stepper::Stepper;
use crate::stego::{Strategy, HEADER_PIXELS};

/// Decoded header fields.
#[derive(Debug, Clone)]
pub struct Header {
    pub bits_per_channel: usize,
    pub num_channels: usize,
    pub strategy: Strategy,
    pub compressed: bool,
    pub salt: [u8; SALT_LEN],
}

/// Width of the body-length field for an image of the given dimensions.
///
/// Sized to address every bit the image could conceivably hold, so both
/// sides derive the same fixed width without any negotiation.
pub fn length_field_bits(width: usize, height: usize) -> usize {
    ceil_log2(num_bits_available(width, height, 4, 8))
}

/// Overwrite the header prelude and the body-length field.
///
/// The prelude is written with direct pixel access at the linear positions;
/// a fresh reveal-shape stepper is advanced in lock-step so the length bits
/// land exactly where the reveal side will look for them.
pub fn write_header(
    raster: &mut Raster,
    header: &Header,
    total_body_bits: usize,
    seed: i64,
) -> Result<(), StegoError> {
    let (width, height) = (raster.width(), raster.height());
    let mut stepper = Stepper::for_image(
        width,
        height,
        header.bits_per_channel,
        header.num_channels,
        seed,
    );

    // Pixel 0: bits per channel.
    for i in 0..4 {
        let pix = raster.data_mut();
        pix[i] = write_bit_u8(pix[i], 0, get_bit(header.bits_per_channel, i));
    }
    stepper.skip_pixel()?;

    // Pixel 1: channel count.
    for i in 4..8 {
        let pix = raster.data_mut();
        pix[i] = write_bit_u8(pix[i], 0, get_bit(header.num_channels, i - 4));
    }
    stepper.skip_pixel()?;

    // Pixel 2: strategy in bits 0-1, compression flag in bit 2.
    let mut flags = header.strategy.id();
    if header.compressed {
        flags |= 4;
    }
    for i in 8..12 {
        let pix = raster.data_mut();
        pix[i] = write_bit_u8(pix[i], 0, get_bit(flags, i - 8));
    }
    stepper.skip_pixel()?;

    // Pixels 3..34: the salt, one bit per channel.
    for i in 12..12 + SALT_LEN * 8 {
        let bit_index = i - 12;
        let bit = get_bit_u8(header.salt[bit_index / 8], bit_index % 8);
        let pix = raster.data_mut();
        pix[i] = write_bit_u8(pix[i], 0, bit);
        if i % 4 == 3 {
            stepper.skip_pixel()?;
        }
    }

    // Body bit count, LSB-first, through the stepper.
    for i in 0..length_field_bits(width, height) {
        let (x, y) = stepper.position()?;
        let channel = stepper.channel();
        let bit_offset = stepper.bit_offset();
        let pixel = raster.pixel_mut(x, y);
        pixel[channel] = write_bit_u8(pixel[channel], bit_offset, get_bit(total_body_bits, i));
        stepper.step()?;
    }
    Ok(())
}

/// Parse and validate the 35-pixel prelude.
///
/// # Errors
/// [`StegoError::ImageTooSmall`] when the image cannot hold the prelude,
/// [`StegoError::BadHeader`] on out-of-range fields or an unknown strategy.
pub fn parse_header(raster: &Raster) -> Result<Header, StegoError> {
    if raster.num_pixels() < HEADER_PIXELS {
        return Err(StegoError::ImageTooSmall);
    }
    let pix = raster.data();

    let mut bits_per_channel = 0usize;
    for i in 0..4 {
        if get_bit_u8(pix[i], 0) != 0 {
            bits_per_channel = set_bit(bits_per_channel, i);
        }
    }

    let mut num_channels = 0usize;
    for i in 4..8 {
        if get_bit_u8(pix[i], 0) != 0 {
            num_channels = set_bit(num_channels, i - 4);
        }
    }

    let mut flags = 0usize;
    for i in 8..12 {
        if get_bit_u8(pix[i], 0) != 0 {
            flags = set_bit(flags, i - 8);
        }
    }
    let compressed = flags & 4 != 0;
    let strategy = Strategy::from_id(flags & 3).ok_or(StegoError::BadHeader)?;

    if !(1..=4).contains(&num_channels) {
        return Err(StegoError::BadHeader);
    }
    if !(1..=8).contains(&bits_per_channel) {
        return Err(StegoError::BadHeader);
    }

    let mut salt = [0u8; SALT_LEN];
    for i in 12..12 + SALT_LEN * 8 {
        let bit_index = i - 12;
        if get_bit_u8(pix[i], 0) != 0 {
            salt[bit_index / 8] |= 1 << (bit_index % 8);
        }
    }

    Ok(Header {
        bits_per_channel,
        num_channels,
        strategy,
        compressed,
        salt,
    })
}

/// Read the body-length field. Returns the total body bit count and the
/// stepper, positioned at the first body bit (for the LSB strategies the
/// body continues through this same stepper).
pub fn read_length_field(
    raster: &Raster,
    header: &Header,
    seed: i64,
) -> Result<(usize, Stepper), StegoError> {
    let (width, height) = (raster.width(), raster.height());
    let mut stepper = Stepper::for_image(
        width,
        height,
        header.bits_per_channel,
        header.num_channels,
        seed,
    );
    for _ in 0..HEADER_PIXELS {
        stepper.skip_pixel()?;
    }

    let mut total_bits = 0usize;
    for i in 0..length_field_bits(width, height) {
        let (x, y) = stepper.position()?;
        let value = raster.pixel(x, y)[stepper.channel()];
        if get_bit_u8(value, stepper.bit_offset()) != 0 {
            total_bits = set_bit(total_bits, i);
        }
        stepper.step()?;
    }
    Ok((total_bits, stepper))
}
