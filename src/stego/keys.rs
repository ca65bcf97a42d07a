// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! RSA key pair generation and PEM file handling.
//!
//! The private key is written as PKCS#1 PEM with file mode 0600; the public
//! key as SPKI PEM. The output directory must already exist.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::stego::error::StegoError;

/// File name of the generated private key.
pub const PRIVATE_KEY_FILE: &str = "private.pem";
/// File name of the generated public key.
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Generate an RSA key pair and write `private.pem` / `public.pem` into
/// `out_dir`. Returns the two paths.
///
/// # Errors
/// - [`StegoError::Io`] if `out_dir` does not exist or a file write fails.
/// - [`StegoError::KeyFormat`] if key generation or PEM encoding fails.
pub fn generate_keypair(bits: usize, out_dir: &Path) -> Result<(PathBuf, PathBuf), StegoError> {
    if !out_dir.is_dir() {
        return Err(StegoError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("output directory does not exist: {}", out_dir.display()),
        )));
    }

    let private_key = RsaPrivateKey::new(&mut OsRng, bits).map_err(|_| StegoError::KeyFormat)?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_path = out_dir.join(PRIVATE_KEY_FILE);
    let private_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|_| StegoError::KeyFormat)?;
    fs::write(&private_path, private_pem.as_bytes())?;
    restrict_permissions(&private_path)?;

    let public_path = out_dir.join(PUBLIC_KEY_FILE);
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|_| StegoError::KeyFormat)?;
    fs::write(&public_path, public_pem.as_bytes())?;

    Ok((private_path, public_path))
}

/// Load a recipient's public key from an SPKI PEM file.
pub fn load_public_key(path: &Path) -> Result<RsaPublicKey, StegoError> {
    let pem = fs::read_to_string(path)?;
    RsaPublicKey::from_public_key_pem(&pem).map_err(|_| StegoError::KeyFormat)
}

/// Load a private key from a PKCS#1 PEM file.
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey, StegoError> {
    let pem = fs::read_to_string(path)?;
    RsaPrivateKey::from_pkcs1_pem(&pem).map_err(|_| StegoError::KeyFormat)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StegoError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StegoError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let (private_path, public_path) = generate_keypair(2048, dir.path()).unwrap();

        let private_key = load_private_key(&private_path).unwrap();
        let public_key = load_public_key(&public_path).unwrap();
        assert_eq!(RsaPublicKey::from(&private_key), public_key);
    }

    #[test]
    #[cfg(unix)]
    fn private_key_mode_is_0600() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let (private_path, _) = generate_keypair(2048, dir.path()).unwrap();
        let mode = fs::metadata(&private_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn missing_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            generate_keypair(2048, &missing),
            Err(StegoError::Io(_))
        ));
    }

    #[test]
    fn wrong_key_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pem");
        fs::write(&path, "-----BEGIN GARBAGE-----\nAAAA\n-----END GARBAGE-----\n").unwrap();
        assert!(matches!(load_public_key(&path), Err(StegoError::KeyFormat)));
        assert!(matches!(load_private_key(&path), Err(StegoError::KeyFormat)));
    }

    #[test]
    fn public_pem_rejected_as_private() {
        let dir = tempfile::tempdir().unwrap();
        let (_, public_path) = generate_keypair(2048, dir.path()).unwrap();
        assert!(matches!(
            load_private_key(&public_path),
            Err(StegoError::KeyFormat)
        ));
    }
}
