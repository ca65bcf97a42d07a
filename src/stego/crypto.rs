// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Cryptographic primitives for payload encryption.
//!
//! Key derivation is PBKDF2-HMAC-SHA256 over the passphrase and the random
//! header salt. One derivation serves two purposes:
//!
//! - bytes 0..32 are the AES-256-GCM payload key;
//! - bytes 0..8, read big-endian, become the pixel-permutation seed, so the
//!   traversal order is as secret as the key. An empty passphrase yields
//!   seed 0 (plain linear traversal, no encryption).
//!
//! Payload chunks are sealed with AES-256-GCM: a fresh random 12-byte nonce
//! per chunk, prepended to the ciphertext; the 16-byte tag is appended by
//! the AEAD. Hybrid mode seals with a fresh one-shot AES key and wraps that
//! key with RSA-OAEP(SHA-256):
//!
//! ```text
//! [4 bytes ] wrapped key length (big-endian u32)
//! [K bytes ] RSA-OAEP wrapped AES key
//! [N bytes ] nonce || AES-GCM ciphertext (tag included)
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// Header salt length in bytes (128 bits embedded in the prelude).
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Derive the AES-256 key from a passphrase and the header salt.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut *key);
    key
}

/// Derive the traversal seed: the first 8 key bytes as a big-endian u64,
/// reinterpreted as i64. An empty passphrase always maps to seed 0 so the
/// linear order applies.
pub fn derive_seed(passphrase: &str, salt: &[u8]) -> i64 {
    if passphrase.is_empty() {
        return 0;
    }
    let key = derive_key(passphrase, salt);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&key[..8]);
    u64::from_be_bytes(prefix) as i64
}

/// Generate a fresh 128-bit header salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Seal one chunk with AES-256-GCM. Output is `nonce || ciphertext || tag`,
/// i.e. plaintext length + 28 bytes.
pub fn seal(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Vec<u8> {
    let cipher = Aes256Gcm::new_from_slice(key).expect("valid key length");

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .expect("AES-GCM encrypt should not fail");

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    out
}

/// Open one chunk sealed by [`seal`].
///
/// Returns [`StegoError::DecryptionFailed`] on tag mismatch (wrong key or
/// tampered data) or a truncated input.
pub fn open(data: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>, StegoError> {
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let cipher = Aes256Gcm::new_from_slice(key).expect("valid key length");
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::DecryptionFailed)
}

/// Seal one chunk for an RSA recipient: fresh AES-256 key, GCM seal as in
/// [`seal`], key wrapped with RSA-OAEP(SHA-256). The wrapped key length is
/// carried explicitly because it varies with the RSA modulus (2048 / 4096).
pub fn seal_hybrid(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>, StegoError> {
    let mut aes_key = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(&mut *aes_key);

    let wrapped = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &aes_key[..])
        .map_err(|_| StegoError::KeyFormat)?;

    let sealed = seal(plaintext, &aes_key);

    let mut out = Vec::with_capacity(4 + wrapped.len() + sealed.len());
    out.extend_from_slice(&(wrapped.len() as u32).to_be_bytes());
    out.extend_from_slice(&wrapped);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Open one chunk produced by [`seal_hybrid`] with the matching private key.
pub fn open_hybrid(data: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>, StegoError> {
    if data.len() < 4 {
        return Err(StegoError::DecryptionFailed);
    }
    let wrapped_len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < 4 + wrapped_len {
        return Err(StegoError::DecryptionFailed);
    }

    let wrapped = &data[4..4 + wrapped_len];
    let sealed = &data[4 + wrapped_len..];

    let aes_key = Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| StegoError::DecryptionFailed)?,
    );
    if aes_key.len() != KEY_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&aes_key);

    open(sealed, &key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key("mypass", &salt);
        let b = derive_key("mypass", &salt);
        assert_eq!(*a, *b);
    }

    #[test]
    fn derive_key_differs_by_salt_and_passphrase() {
        let a = derive_key("pass", &[0u8; SALT_LEN]);
        let b = derive_key("pass", &[1u8; SALT_LEN]);
        let c = derive_key("other", &[0u8; SALT_LEN]);
        assert_ne!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn empty_passphrase_seed_is_zero() {
        assert_eq!(derive_seed("", &[9u8; SALT_LEN]), 0);
    }

    #[test]
    fn seed_matches_key_prefix() {
        let salt = [3u8; SALT_LEN];
        let key = derive_key("secret", &salt);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&key[..8]);
        assert_eq!(derive_seed("secret", &salt), u64::from_be_bytes(prefix) as i64);
        assert_ne!(derive_seed("secret", &salt), 0);
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = derive_key("pass", &[1u8; SALT_LEN]);
        let msg = b"Hello, steganography!";
        let sealed = seal(msg, &key);
        assert_eq!(sealed.len(), msg.len() + NONCE_LEN + TAG_LEN);
        let opened = open(&sealed, &key).unwrap();
        assert_eq!(opened, msg);
    }

    #[test]
    fn wrong_key_fails() {
        let key = derive_key("correct", &[1u8; SALT_LEN]);
        let other = derive_key("wrong", &[1u8; SALT_LEN]);
        let sealed = seal(b"secret message", &key);
        assert!(matches!(
            open(&sealed, &other),
            Err(StegoError::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let key = derive_key("pass", &[1u8; SALT_LEN]);
        assert!(matches!(
            open(&[0u8; 10], &key),
            Err(StegoError::DecryptionFailed)
        ));
    }

    #[test]
    fn sealing_twice_differs() {
        let key = derive_key("pass", &[1u8; SALT_LEN]);
        let a = seal(b"same message", &key);
        let b = seal(b"same message", &key);
        assert_ne!(a, b, "fresh nonce per chunk");
    }

    #[test]
    fn hybrid_roundtrip() {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let public_key = RsaPublicKey::from(&private_key);

        let msg = b"hybrid payload";
        let sealed = seal_hybrid(msg, &public_key).unwrap();
        // 4-byte length + 256-byte wrapped key for RSA-2048.
        assert_eq!(
            sealed.len(),
            4 + 256 + msg.len() + NONCE_LEN + TAG_LEN
        );
        let opened = open_hybrid(&sealed, &private_key).unwrap();
        assert_eq!(opened, msg);
    }

    #[test]
    fn hybrid_wrong_key_fails() {
        let right = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let wrong = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let sealed = seal_hybrid(b"payload", &RsaPublicKey::from(&right)).unwrap();
        assert!(matches!(
            open_hybrid(&sealed, &wrong),
            Err(StegoError::DecryptionFailed)
        ));
    }
}
