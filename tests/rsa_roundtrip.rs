// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Hybrid RSA-OAEP + AES round-trip tests.

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tempfile::TempDir;

use phasmpix::stego::keys::generate_keypair;
use phasmpix::stego::raster::Raster;
use phasmpix::{
    conceal, reveal, ConcealRequest, PayloadSource, RevealRequest, StegoError, Strategy,
};

fn make_cover(dir: &Path, name: &str, width: usize, height: usize, seed: u64) -> PathBuf {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut raster = Raster::new(width, height);
    for px in raster.data_mut().chunks_mut(4) {
        px[0] = rng.gen();
        px[1] = rng.gen();
        px[2] = rng.gen();
        px[3] = 255;
    }
    let path = dir.join(name);
    raster.save_png(&path).unwrap();
    path
}

fn reveal_to_vec(req: &RevealRequest) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::new();
    reveal(req, &mut out)?;
    Ok(out)
}

#[test]
fn rsa_dct_compressed_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (private_pem, public_pem) = generate_keypair(2048, dir.path()).unwrap();

    // A document-like payload: structured header plus repetitive body.
    let mut payload = b"%PDF-1.4\n".to_vec();
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    for _ in 0..16 {
        payload.extend_from_slice(b"0 obj << /Type /Page >> endobj\n");
        payload.push(rng.gen());
    }
    let payload_path = dir.path().join("document.pdf");
    std::fs::write(&payload_path, &payload).unwrap();

    let cover = make_cover(dir.path(), "cover.png", 1040, 1040, 21);
    let stego = dir.path().join("stego.png");

    conceal(&ConcealRequest {
        image_path: cover,
        output_path: Some(stego.clone()),
        source: PayloadSource::File(payload_path),
        passphrase: None,
        public_key_path: Some(public_pem),
        strategy: Strategy::Dct,
        bits_per_channel: 1,
        num_channels: 1,
        workers: 0,
        compress: true,
        dry_run: false,
    })
    .unwrap();

    let out = reveal_to_vec(&RevealRequest {
        image_path: stego,
        passphrase: None,
        private_key_path: Some(private_pem),
        workers: 0,
    })
    .unwrap();
    assert_eq!(out, payload, "payload must survive byte-for-byte");
}

#[test]
fn rsa_lsb_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (private_pem, public_pem) = generate_keypair(2048, dir.path()).unwrap();
    let cover = make_cover(dir.path(), "cover.png", 128, 128, 22);
    let stego = dir.path().join("stego.png");

    conceal(&ConcealRequest {
        image_path: cover,
        output_path: Some(stego.clone()),
        source: PayloadSource::Message("for your eyes only".into()),
        passphrase: None,
        public_key_path: Some(public_pem),
        strategy: Strategy::Lsb,
        bits_per_channel: 2,
        num_channels: 3,
        workers: 1,
        compress: false,
        dry_run: false,
    })
    .unwrap();

    let out = reveal_to_vec(&RevealRequest {
        image_path: stego,
        passphrase: None,
        private_key_path: Some(private_pem),
        workers: 1,
    })
    .unwrap();
    assert_eq!(out, b"for your eyes only");
}

#[test]
fn rsa_wrong_private_key_fails() {
    let dir = TempDir::new().unwrap();
    let keys_a = dir.path().join("a");
    let keys_b = dir.path().join("b");
    std::fs::create_dir_all(&keys_a).unwrap();
    std::fs::create_dir_all(&keys_b).unwrap();
    let (_, public_a) = generate_keypair(2048, &keys_a).unwrap();
    let (private_b, _) = generate_keypair(2048, &keys_b).unwrap();

    let cover = make_cover(dir.path(), "cover.png", 128, 128, 23);
    let stego = dir.path().join("stego.png");

    conceal(&ConcealRequest {
        image_path: cover,
        output_path: Some(stego.clone()),
        source: PayloadSource::Message("mismatched keys".into()),
        passphrase: None,
        public_key_path: Some(public_a),
        strategy: Strategy::Lsb,
        bits_per_channel: 1,
        num_channels: 3,
        workers: 1,
        compress: true,
        dry_run: false,
    })
    .unwrap();

    let result = reveal_to_vec(&RevealRequest {
        image_path: stego,
        passphrase: None,
        private_key_path: Some(private_b),
        workers: 1,
    });
    assert!(matches!(result, Err(StegoError::DecryptionFailed)));
}
