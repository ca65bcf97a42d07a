// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Reed-Solomon shard framing around each payload chunk.
//!
//! Every chunk is wrapped as `[u64 length | data]`, split into 4 equal data
//! shards (zero-padded at the end) and extended with 2 parity shards, all
//! concatenated. Decoding splits the region back into 6 equal shards,
//! verifies the parity, runs one reconstruction attempt on failure, and
//! re-verifies; the length prefix then recovers the exact original range.

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::stego::error::StegoError;

/// Number of data shards per chunk.
pub const DATA_SHARDS: usize = 4;
/// Number of parity shards per chunk.
pub const PARITY_SHARDS: usize = 2;

const TOTAL_SHARDS: usize = DATA_SHARDS + PARITY_SHARDS;
const LENGTH_PREFIX: usize = 8;

fn codec() -> ReedSolomon {
    ReedSolomon::new(DATA_SHARDS, PARITY_SHARDS).expect("valid shard counts")
}

/// Wrap `data` in the Reed-Solomon shard frame.
pub fn rs_encode(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut payload = Vec::with_capacity(LENGTH_PREFIX + data.len());
    payload.extend_from_slice(&(data.len() as u64).to_be_bytes());
    payload.extend_from_slice(data);

    // Equal-length shards, last one zero-padded.
    let shard_len = (payload.len() + DATA_SHARDS - 1) / DATA_SHARDS;
    let mut shards: Vec<Vec<u8>> = Vec::with_capacity(TOTAL_SHARDS);
    for i in 0..DATA_SHARDS {
        let start = (i * shard_len).min(payload.len());
        let end = ((i + 1) * shard_len).min(payload.len());
        let mut shard = payload[start..end].to_vec();
        shard.resize(shard_len, 0);
        shards.push(shard);
    }
    for _ in 0..PARITY_SHARDS {
        shards.push(vec![0u8; shard_len]);
    }

    codec().encode(&mut shards)?;

    let mut out = Vec::with_capacity(TOTAL_SHARDS * shard_len);
    for shard in &shards {
        out.extend_from_slice(shard);
    }
    Ok(out)
}

/// Unwrap a Reed-Solomon shard frame back to the original chunk bytes.
///
/// # Errors
/// [`StegoError::RsCorrupt`] when the region length is not a shard
/// multiple, parity still fails after reconstruction, or the recovered
/// length prefix is inconsistent.
pub fn rs_decode(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    if data.is_empty() || data.len() % TOTAL_SHARDS != 0 {
        return Err(StegoError::RsCorrupt);
    }
    let shard_len = data.len() / TOTAL_SHARDS;
    let mut shards: Vec<Vec<u8>> = data
        .chunks_exact(shard_len)
        .map(<[u8]>::to_vec)
        .collect();

    let rs = codec();
    if !rs.verify(&shards)? {
        // One automatic repair attempt; a second verification failure is fatal.
        let mut candidates: Vec<Option<Vec<u8>>> = shards.into_iter().map(Some).collect();
        rs.reconstruct(&mut candidates)?;
        shards = candidates
            .into_iter()
            .map(|s| s.ok_or(StegoError::RsCorrupt))
            .collect::<Result<_, _>>()?;
        if !rs.verify(&shards)? {
            return Err(StegoError::RsCorrupt);
        }
    }

    let mut joined = Vec::with_capacity(DATA_SHARDS * shard_len);
    for shard in shards.iter().take(DATA_SHARDS) {
        joined.extend_from_slice(shard);
    }

    if joined.len() < LENGTH_PREFIX {
        return Err(StegoError::RsCorrupt);
    }
    let mut prefix = [0u8; LENGTH_PREFIX];
    prefix.copy_from_slice(&joined[..LENGTH_PREFIX]);
    let length = u64::from_be_bytes(prefix) as usize;
    if length > joined.len() - LENGTH_PREFIX {
        return Err(StegoError::RsCorrupt);
    }

    Ok(joined[LENGTH_PREFIX..LENGTH_PREFIX + length].to_vec())
}

/// Encoded length for a chunk of `data_len` bytes. Used by capacity
/// estimates and tests.
pub fn rs_encoded_len(data_len: usize) -> usize {
    let payload = LENGTH_PREFIX + data_len;
    let shard_len = (payload + DATA_SHARDS - 1) / DATA_SHARDS;
    TOTAL_SHARDS * shard_len
}
