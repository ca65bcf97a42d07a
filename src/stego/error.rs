// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from image decoding through
//! encryption, Reed-Solomon framing and bit extraction.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// File or stream I/O failure.
    Io(std::io::Error),
    /// The cover image could not be decoded, or the output could not be encoded.
    Image(image::ImageError),
    /// The image has too few pixels for the header, or is too narrow for DCT.
    ImageTooSmall,
    /// Header fields are out of range, the strategy ID is unknown, or the
    /// declared body length is inconsistent with the image.
    BadHeader,
    /// The input exceeds the projected embedding capacity of the cover.
    CapacityExceeded,
    /// A stepper was advanced past the end of its pixel traversal.
    IteratorExhausted,
    /// A framed chunk declares a length above the decoding safety limit.
    ChunkTooLarge,
    /// Reed-Solomon verification failed after reconstruction, or the
    /// recovered length is inconsistent.
    RsCorrupt,
    /// AES-GCM tag mismatch or RSA-OAEP failure (wrong key or tampered data).
    DecryptionFailed,
    /// The embedded zlib stream is malformed.
    DecompressionFailed,
    /// A DCT block refused to accept a bit after all quantization retries.
    DctEmbedFailed,
    /// PEM parse failure, wrong key type, or key generation failure.
    KeyFormat,
    /// The two images passed to the analyzer have different dimensions.
    DimensionMismatch,
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Image(e) => write!(f, "invalid image: {e}"),
            Self::ImageTooSmall => write!(f, "image too small to hold the data"),
            Self::BadHeader => write!(f, "invalid stego header"),
            Self::CapacityExceeded => write!(f, "input exceeds the embedding capacity of this image"),
            Self::IteratorExhausted => write!(f, "more steps taken than pixels in the image"),
            Self::ChunkTooLarge => write!(f, "chunk length exceeds maximum allowed size"),
            Self::RsCorrupt => write!(f, "Reed-Solomon integrity check failed"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong passphrase or key?)"),
            Self::DecompressionFailed => write!(f, "decompression failed"),
            Self::DctEmbedFailed => write!(f, "failed to embed bit in DCT block after multiple attempts"),
            Self::KeyFormat => write!(f, "invalid RSA key (PEM parse failure or wrong key type)"),
            Self::DimensionMismatch => write!(f, "image dimensions do not match"),
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StegoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for StegoError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<reed_solomon_erasure::Error> for StegoError {
    fn from(_: reed_solomon_erasure::Error) -> Self {
        Self::RsCorrupt
    }
}
