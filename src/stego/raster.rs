// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! In-memory RGBA raster.
//!
//! [`Raster`] is the mutable pixel buffer the whole pipeline operates on:
//! non-premultiplied RGBA with 8-bit channels, stored flat in row-major
//! order. Any format the `image` crate can decode is accepted as a cover;
//! output is always PNG so the embedded bits survive round-tripping.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::stego::error::StegoError;

/// Number of channels per pixel (RGBA).
pub const CHANNELS: usize = 4;

/// An owned RGBA8 pixel buffer with rectangular bounds.
#[derive(Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pix: Vec<u8>,
}

impl Raster {
    /// Create a raster of the given dimensions, all channels zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pix: vec![0u8; width * height * CHANNELS],
        }
    }

    /// Decode the image at `path` and copy it into a fresh RGBA buffer.
    pub fn load(path: &Path) -> Result<Self, StegoError> {
        let img = image::open(path)?;
        Ok(Self::from_dynamic(&img))
    }

    /// Copy any decoded image into a non-premultiplied RGBA buffer.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        Self {
            width,
            height,
            pix: rgba.into_raw(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }

    /// The four channel values of the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = self.offset(x, y);
        &self.pix[offset..offset + CHANNELS]
    }

    /// Mutable access to the four channel values of the pixel at (x, y).
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let offset = self.offset(x, y);
        &mut self.pix[offset..offset + CHANNELS]
    }

    /// Flat channel data in row-major RGBA order.
    pub fn data(&self) -> &[u8] {
        &self.pix
    }

    /// Mutable flat channel data. The header codec writes its fixed prelude
    /// through this, at linear pixel positions.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.pix
    }

    /// Encode the buffer as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), StegoError> {
        let img = RgbaImage::from_raw(self.width as u32, self.height as u32, self.pix.clone())
            .expect("pixel buffer matches dimensions");
        img.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width, "x {x} >= {}", self.width);
        debug_assert!(y < self.height, "y {y} >= {}", self.height);
        (y * self.width + x) * CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zeroed() {
        let r = Raster::new(3, 2);
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 2);
        assert_eq!(r.num_pixels(), 6);
        assert!(r.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_access() {
        let mut r = Raster::new(4, 4);
        r.pixel_mut(2, 1).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(r.pixel(2, 1), &[1, 2, 3, 4]);
        // Row-major layout: pixel (2,1) starts at (1*4+2)*4 = 24.
        assert_eq!(&r.data()[24..28], &[1, 2, 3, 4]);
        // Neighbours untouched.
        assert_eq!(r.pixel(1, 1), &[0, 0, 0, 0]);
        assert_eq!(r.pixel(3, 1), &[0, 0, 0, 0]);
    }

    #[test]
    fn png_roundtrip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");

        let mut r = Raster::new(7, 5);
        for (i, b) in r.data_mut().iter_mut().enumerate() {
            *b = (i * 37 % 256) as u8;
        }
        r.save_png(&path).unwrap();

        let back = Raster::load(&path).unwrap();
        assert_eq!(back.width(), 7);
        assert_eq!(back.height(), 5);
        assert_eq!(back.data(), r.data());
    }
}
