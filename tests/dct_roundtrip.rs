// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Round-trip integration tests for the DCT strategy.

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tempfile::TempDir;

use phasmpix::{
    conceal, inspect, reveal, ConcealRequest, PayloadSource, RevealRequest, StegoError, Strategy,
};
use phasmpix::stego::raster::Raster;

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

fn dct_request(cover: &Path, output: &Path) -> ConcealRequest {
    ConcealRequest {
        image_path: cover.to_path_buf(),
        output_path: Some(output.to_path_buf()),
        source: PayloadSource::Message(String::new()),
        passphrase: None,
        public_key_path: None,
        strategy: Strategy::Dct,
        // Forced to 1/1 by the pipeline; deliberately wrong here to prove it.
        bits_per_channel: 4,
        num_channels: 3,
        workers: 0,
        compress: true,
        dry_run: false,
    }
}

fn reveal_to_vec(req: &RevealRequest) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::new();
    reveal(req, &mut out)?;
    Ok(out)
}

#[test]
fn dct_roundtrip_noise_cover() {
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 200, 200, 11);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("DCT Test".into());
    conceal(&req).unwrap();

    let out = reveal_to_vec(&RevealRequest {
        image_path: stego,
        passphrase: None,
        private_key_path: None,
        workers: 0,
    })
    .unwrap();
    assert_eq!(out, b"DCT Test");
}

#[test]
fn dct_roundtrip_with_passphrase() {
    // Encryption applies even though DCT always traverses blocks linearly.
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 320, 320, 12);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("frequency domain".into());
    req.passphrase = Some("dct-pass".into());
    conceal(&req).unwrap();

    let out = reveal_to_vec(&RevealRequest {
        image_path: stego.clone(),
        passphrase: Some("dct-pass".into()),
        private_key_path: None,
        workers: 0,
    })
    .unwrap();
    assert_eq!(out, b"frequency domain");

    let wrong = reveal_to_vec(&RevealRequest {
        image_path: stego,
        passphrase: Some("not-it".into()),
        private_key_path: None,
        workers: 0,
    });
    assert!(wrong.is_err());
}

#[test]
fn dct_header_forced_to_single_bit_single_channel() {
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 200, 200, 13);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("DCT Test".into());
    conceal(&req).unwrap();

    let info = inspect(&stego).unwrap();
    assert_eq!(info.strategy, Strategy::Dct);
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_channel, 1);
    assert!(info.compressed);
}

#[test]
fn dct_only_touches_blue_outside_header() {
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 200, 200, 14);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("DCT Test".into());
    conceal(&req).unwrap();

    let before = Raster::load(&cover).unwrap();
    let after = Raster::load(&stego).unwrap();
    // Below the first block row only Blue may change.
    for y in 8..200 {
        for x in 0..200 {
            let a = before.pixel(x, y);
            let b = after.pixel(x, y);
            assert_eq!(a[0], b[0], "red changed at ({x},{y})");
            assert_eq!(a[1], b[1], "green changed at ({x},{y})");
            assert_eq!(a[3], b[3], "alpha changed at ({x},{y})");
        }
    }
}

#[test]
fn dct_capacity_exhaustion_fails_cleanly() {
    // 64x64 gives 8*7 = 56 block bits; a multi-hundred-byte body cannot fit.
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 64, 64, 15);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("way too big for fifty-six blocks".into());
    let err = conceal(&req);
    assert!(matches!(err, Err(StegoError::ImageTooSmall)));
    assert!(!stego.exists(), "no partial output on failure");
}

#[test]
fn dct_narrow_image_rejected() {
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 7, 300, 16);
    let stego = dir.path().join("stego.png");

    let mut req = dct_request(&cover, &stego);
    req.source = PayloadSource::Message("x".into());
    assert!(matches!(conceal(&req), Err(StegoError::ImageTooSmall)));
}

#[test]
fn dct_worker_counts_agree() {
    // The bit order is defined by the block iterator, not the pool size.
    let dir = TempDir::new().unwrap();
    let cover = make_cover(dir.path(), "cover.png", 240, 240, 17);

    let mut outputs = Vec::new();
    for workers in [1usize, 4] {
        let stego = dir.path().join(format!("stego_{workers}.png"));
        let mut req = dct_request(&cover, &stego);
        req.source = PayloadSource::Message("parallel determinism".into());
        req.workers = workers;
        conceal(&req).unwrap();

        let out = reveal_to_vec(&RevealRequest {
            image_path: stego,
            passphrase: None,
            private_key_path: None,
            workers,
        })
        .unwrap();
        outputs.push(out);
    }
    assert_eq!(outputs[0], b"parallel determinism");
    assert_eq!(outputs[0], outputs[1]);
}
