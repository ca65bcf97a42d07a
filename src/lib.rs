// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! # phasmpix
//!
//! Pixel-domain steganography engine for hiding arbitrary payloads inside
//! lossless raster images. Three embedding strategies (LSB replacement,
//! LSB matching, mid-frequency DCT), passphrase (PBKDF2 + AES-256-GCM) or
//! hybrid RSA-OAEP encryption, optional zlib compression and per-chunk
//! Reed-Solomon framing.
//!
//! The companion CLI lives in `src/main.rs`; everything it does goes
//! through this library surface.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use phasmpix::{conceal, reveal, ConcealRequest, RevealRequest, PayloadSource, Strategy};
//!
//! let outcome = conceal(&ConcealRequest {
//!     image_path: "photo.png".into(),
//!     output_path: Some("stego.png".into()),
//!     source: PayloadSource::Message("secret message".into()),
//!     passphrase: Some("passphrase".into()),
//!     public_key_path: None,
//!     strategy: Strategy::Lsb,
//!     bits_per_channel: 1,
//!     num_channels: 3,
//!     workers: 0,
//!     compress: true,
//!     dry_run: false,
//! })?;
//!
//! let mut plaintext = Vec::new();
//! reveal(
//!     &RevealRequest {
//!         image_path: "stego.png".into(),
//!         passphrase: Some("passphrase".into()),
//!         private_key_path: None,
//!         workers: 0,
//!     },
//!     &mut plaintext,
//! )?;
//! ```

pub mod stego;

pub use stego::{
    analyze, capacity, conceal, inspect, reveal, verify, AnalysisReport, AnalyzeRequest,
    ConcealOutcome, ConcealRequest, ImageInfo, PayloadSource, RevealReport, RevealRequest,
    StegoError, Strategy, VerifyReport, VerifyRequest, CHUNK_SIZE, HEADER_PIXELS, MAX_CHUNK_SIZE,
};
