// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Conceal / reveal / verify orchestration.
//!
//! Conceal streams the input in 1 MiB chunks through
//! `compress -> encrypt -> Reed-Solomon -> embed`, framing every chunk as
//! `[u32 length | rs(chunk)]` so the decoder can always find the next chunk
//! boundary and a corrupted chunk fails in isolation. The input size may be
//! unknown (stdin), so the body is embedded first and the header plus the
//! measured bit count are patched over the reserved pixels afterwards; the
//! output PNG is written once at the end.
//!
//! Reveal is the exact inverse; verify runs the same walk but stops after
//! the Reed-Solomon integrity check of every chunk, without decrypting.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::stego::bits::num_bits_available;
use crate::stego::error::StegoError;
use crate::stego::header::{self, Header};
use crate::stego::raster::Raster;
use crate::stego::stepper::Stepper;
use crate::stego::{capacity, crypto, ecc, embed, keys, progress, Strategy, HEADER_PIXELS};

/// Plaintext bytes framed per chunk.
pub const CHUNK_SIZE: usize = 1024 * 1024;
/// Decoding safety limit for a single framed chunk.
pub const MAX_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Where the payload comes from.
pub enum PayloadSource {
    /// An inline message.
    Message(String),
    /// A file on disk.
    File(PathBuf),
    /// The standard input stream (size unknown up front).
    Stdin,
}

impl PayloadSource {
    fn open(&self) -> Result<(Box<dyn Read>, Option<u64>), StegoError> {
        match self {
            Self::Message(m) => {
                let bytes = m.clone().into_bytes();
                let size = bytes.len() as u64;
                Ok((Box::new(io::Cursor::new(bytes)), Some(size)))
            }
            Self::File(path) => {
                let file = File::open(path)?;
                let size = file.metadata().ok().map(|m| m.len());
                Ok((Box::new(file), size))
            }
            Self::Stdin => Ok((Box::new(io::stdin()), None)),
        }
    }
}

/// Parameters for [`conceal`].
pub struct ConcealRequest {
    pub image_path: PathBuf,
    /// Defaults to `<image>.out` when absent.
    pub output_path: Option<PathBuf>,
    pub source: PayloadSource,
    pub passphrase: Option<String>,
    pub public_key_path: Option<PathBuf>,
    pub strategy: Strategy,
    pub bits_per_channel: usize,
    pub num_channels: usize,
    /// 0 = hardware parallelism.
    pub workers: usize,
    pub compress: bool,
    pub dry_run: bool,
}

/// Result of a conceal call.
pub enum ConcealOutcome {
    /// Capacity check only; nothing written.
    DryRun {
        available_bits: usize,
        estimated_bits: Option<usize>,
    },
    /// Stego image written.
    Written {
        output: PathBuf,
        body_bits: usize,
        width: usize,
        height: usize,
        available_bits: usize,
    },
}

/// Parameters for [`reveal`].
pub struct RevealRequest {
    pub image_path: PathBuf,
    pub passphrase: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub workers: usize,
}

/// Header metadata and byte counts from a successful reveal.
pub struct RevealReport {
    pub header: Header,
    pub body_bits: usize,
    pub bytes_written: u64,
}

/// Parameters for [`verify`].
pub struct VerifyRequest {
    pub image_path: PathBuf,
    /// Used only for seed derivation; chunks are not decrypted.
    pub passphrase: Option<String>,
    pub workers: usize,
}

/// Metadata returned by [`verify`] once every chunk passed its RS check.
pub struct VerifyReport {
    pub strategy: Strategy,
    pub message_bits: usize,
    pub num_channels: usize,
    pub bits_per_channel: usize,
}

/// Header metadata reported by [`inspect`].
pub struct ImageInfo {
    pub strategy: Strategy,
    pub channels: usize,
    pub bits_per_channel: usize,
    pub compressed: bool,
    /// Derived from the length field at seed-0 positions; garbage when a
    /// passphrase scrambled the LSB traversal.
    pub payload_bytes: usize,
}

enum Sealer {
    None,
    Key(Zeroizing<[u8; crypto::KEY_LEN]>),
    Rsa(RsaPublicKey),
}

enum Opener {
    None,
    Key(Zeroizing<[u8; crypto::KEY_LEN]>),
    Rsa(RsaPrivateKey),
}

/// Hide a payload inside a cover image and write the stego PNG.
pub fn conceal(req: &ConcealRequest) -> Result<ConcealOutcome, StegoError> {
    let mut raster = Raster::load(&req.image_path)?;
    let (width, height) = (raster.width(), raster.height());

    if width * height < HEADER_PIXELS {
        return Err(StegoError::ImageTooSmall);
    }
    if req.strategy == Strategy::Dct && width < 8 {
        return Err(StegoError::ImageTooSmall);
    }

    let passphrase = req.passphrase.as_deref().filter(|p| !p.is_empty());

    let salt = crypto::generate_salt();
    let seed = passphrase.map_or(0, |p| crypto::derive_seed(p, &salt));

    // DCT embeds one bit per block of the Blue channel; the header stepper
    // runs linearly so the length field can never collide with the blocks.
    let (bits_per_channel, num_channels, stepper_seed) = if req.strategy == Strategy::Dct {
        (1, 1, 0)
    } else {
        (req.bits_per_channel, req.num_channels, seed)
    };

    let length_bits = header::length_field_bits(width, height);
    if req.strategy == Strategy::Dct && HEADER_PIXELS + length_bits > width * 8 {
        // Header and length field must fit inside the reserved block row.
        return Err(StegoError::ImageTooSmall);
    }

    let available_bits = num_bits_available(width, height, num_channels, bits_per_channel);

    let (mut reader, input_size) = req.source.open()?;

    // Rough upper bound for RS + AEAD overhead; the embed loop is the
    // authoritative check.
    let estimated_bits = input_size.map(|n| n as usize * 8 * 3 / 2);

    if let Some(estimate) = estimated_bits {
        if estimate > available_bits {
            return Err(StegoError::CapacityExceeded);
        }
    }
    if req.dry_run {
        return Ok(ConcealOutcome::DryRun {
            available_bits,
            estimated_bits,
        });
    }

    // Reserve the header pixels and the length field before any body bit.
    let mut stepper = Stepper::for_image(width, height, bits_per_channel, num_channels, stepper_seed);
    for _ in 0..HEADER_PIXELS {
        stepper.skip_pixel().map_err(|_| StegoError::ImageTooSmall)?;
    }
    for _ in 0..length_bits {
        stepper.step().map_err(|_| StegoError::ImageTooSmall)?;
    }
    let mut body_stepper = if req.strategy == Strategy::Dct {
        Stepper::for_blocks(width, height)
    } else {
        stepper
    };

    let sealer = match (passphrase, &req.public_key_path) {
        (Some(p), _) => Sealer::Key(crypto::derive_key(p, &salt)),
        (None, Some(path)) => Sealer::Rsa(keys::load_public_key(path)?),
        (None, None) => Sealer::None,
    };

    progress::init(input_size.unwrap_or(0));

    let mut total_body_bits = 0usize;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        progress::check_cancelled()?;
        let n = read_chunk(&mut reader, &mut buffer)?;
        if n == 0 {
            break;
        }

        let mut chunk = buffer[..n].to_vec();
        if req.compress {
            chunk = compress_chunk(&chunk)?;
        }
        chunk = match &sealer {
            Sealer::None => chunk,
            Sealer::Key(key) => crypto::seal(&chunk, key),
            Sealer::Rsa(public_key) => crypto::seal_hybrid(&chunk, public_key)?,
        };
        let framed = ecc::rs_encode(&chunk)?;

        let length_prefix = (framed.len() as u32).to_be_bytes();
        embed::write_bytes(&mut raster, &mut body_stepper, &length_prefix, req.strategy, req.workers)
            .map_err(too_small_on_exhaustion)?;
        embed::write_bytes(&mut raster, &mut body_stepper, &framed, req.strategy, req.workers)
            .map_err(too_small_on_exhaustion)?;

        total_body_bits += 32 + framed.len() * 8;
        progress::advance(n as u64);
    }

    let hdr = Header {
        bits_per_channel,
        num_channels,
        strategy: req.strategy,
        compressed: req.compress,
        salt,
    };
    header::write_header(&mut raster, &hdr, total_body_bits, stepper_seed)?;

    let output = req
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&req.image_path));
    raster.save_png(&output)?;
    progress::finish();

    Ok(ConcealOutcome::Written {
        output,
        body_bits: total_body_bits,
        width,
        height,
        available_bits,
    })
}

/// Extract a concealed payload, writing the plaintext to `out`.
pub fn reveal(req: &RevealRequest, out: &mut dyn Write) -> Result<RevealReport, StegoError> {
    let raster = Raster::load(&req.image_path)?;
    let hdr = header::parse_header(&raster)?;
    let (width, height) = (raster.width(), raster.height());

    let passphrase = req.passphrase.as_deref().filter(|p| !p.is_empty());
    let seed = if hdr.strategy == Strategy::Dct {
        0
    } else {
        passphrase.map_or(0, |p| crypto::derive_seed(p, &hdr.salt))
    };

    let (body_bits, stepper) = header::read_length_field(&raster, &hdr, seed)?;
    validate_body_bits(body_bits, width, height, &hdr)?;

    let mut body_stepper = if hdr.strategy == Strategy::Dct {
        Stepper::for_blocks(width, height)
    } else {
        stepper
    };

    let opener = match (passphrase, &req.private_key_path) {
        (Some(p), _) => Opener::Key(crypto::derive_key(p, &hdr.salt)),
        (None, Some(path)) => Opener::Rsa(keys::load_private_key(path)?),
        (None, None) => Opener::None,
    };

    progress::init(body_bits as u64);

    let mut bits_read = 0usize;
    let mut bytes_written = 0u64;
    while bits_read < body_bits {
        progress::check_cancelled()?;

        let framed = read_framed_chunk(&raster, &mut body_stepper, &hdr, req.workers, &mut bits_read)?;
        let recovered = ecc::rs_decode(&framed)?;

        let decrypted = match &opener {
            Opener::None => recovered,
            Opener::Key(key) => crypto::open(&recovered, key)?,
            Opener::Rsa(private_key) => crypto::open_hybrid(&recovered, private_key)?,
        };
        let plain = if hdr.compressed {
            decompress_chunk(&decrypted)?
        } else {
            decrypted
        };

        out.write_all(&plain)?;
        bytes_written += plain.len() as u64;
        progress::advance((32 + framed.len() * 8) as u64);
    }
    progress::finish();

    Ok(RevealReport {
        header: hdr,
        body_bits,
        bytes_written,
    })
}

/// Walk every framed chunk and check its Reed-Solomon integrity, without
/// decrypting. A passphrase, when given, only drives seed derivation.
pub fn verify(req: &VerifyRequest) -> Result<VerifyReport, StegoError> {
    let raster = Raster::load(&req.image_path)?;
    let hdr = header::parse_header(&raster)?;
    let (width, height) = (raster.width(), raster.height());

    let passphrase = req.passphrase.as_deref().filter(|p| !p.is_empty());
    let seed = if hdr.strategy == Strategy::Dct {
        0
    } else {
        passphrase.map_or(0, |p| crypto::derive_seed(p, &hdr.salt))
    };

    let (body_bits, stepper) = header::read_length_field(&raster, &hdr, seed)?;
    validate_body_bits(body_bits, width, height, &hdr)?;

    let mut body_stepper = if hdr.strategy == Strategy::Dct {
        Stepper::for_blocks(width, height)
    } else {
        stepper
    };

    progress::init(body_bits as u64);

    let mut bits_read = 0usize;
    while bits_read < body_bits {
        progress::check_cancelled()?;
        let framed = read_framed_chunk(&raster, &mut body_stepper, &hdr, req.workers, &mut bits_read)?;
        ecc::rs_decode(&framed)?;
        progress::advance((32 + framed.len() * 8) as u64);
    }
    progress::finish();

    Ok(VerifyReport {
        strategy: hdr.strategy,
        message_bits: body_bits,
        num_channels: hdr.num_channels,
        bits_per_channel: hdr.bits_per_channel,
    })
}

/// Read the header metadata of a stego image.
///
/// The length field is read at seed-0 positions: accurate for unkeyed and
/// DCT images, garbage for passphrase-concealed LSB images.
pub fn inspect(image_path: &Path) -> Result<ImageInfo, StegoError> {
    let raster = Raster::load(image_path)?;
    let hdr = header::parse_header(&raster)?;
    let (payload_bits, _) = header::read_length_field(&raster, &hdr, 0)?;

    Ok(ImageInfo {
        strategy: hdr.strategy,
        channels: hdr.num_channels,
        bits_per_channel: hdr.bits_per_channel,
        compressed: hdr.compressed,
        payload_bytes: payload_bits / 8,
    })
}

fn validate_body_bits(
    body_bits: usize,
    width: usize,
    height: usize,
    hdr: &Header,
) -> Result<(), StegoError> {
    if body_bits == 0 || body_bits % 8 != 0 {
        return Err(StegoError::BadHeader);
    }
    let cap = capacity::body_capacity(
        width,
        height,
        hdr.num_channels,
        hdr.bits_per_channel,
        hdr.strategy,
    );
    if body_bits > cap {
        return Err(StegoError::BadHeader);
    }
    Ok(())
}

/// Read one `[u32 length | payload]` frame through the body stepper.
fn read_framed_chunk(
    raster: &Raster,
    stepper: &mut Stepper,
    hdr: &Header,
    workers: usize,
    bits_read: &mut usize,
) -> Result<Vec<u8>, StegoError> {
    let length_prefix = embed::read_bytes(raster, stepper, 4, hdr.strategy, workers)?;
    *bits_read += 32;

    let chunk_len =
        u32::from_be_bytes([length_prefix[0], length_prefix[1], length_prefix[2], length_prefix[3]])
            as usize;
    if chunk_len > MAX_CHUNK_SIZE {
        return Err(StegoError::ChunkTooLarge);
    }

    let framed = embed::read_bytes(raster, stepper, chunk_len, hdr.strategy, workers)?;
    *bits_read += chunk_len * 8;
    Ok(framed)
}

fn too_small_on_exhaustion(err: StegoError) -> StegoError {
    match err {
        StegoError::IteratorExhausted => StegoError::ImageTooSmall,
        other => other,
    }
}

fn default_output_path(image_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.out", image_path.display()))
}

/// Fill `buf` from `reader`, short only at end of stream.
fn read_chunk(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn compress_chunk(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn decompress_chunk(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|_| StegoError::DecompressionFailed)?;
    Ok(out)
}
