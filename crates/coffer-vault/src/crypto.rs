// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use coffer_core::CofferError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, CofferError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| CofferError::Vault("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Generate a random 96-bit nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], CofferError> {
    let mut nonce = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce)
        .map_err(|_| CofferError::Vault("failed to generate random nonce".to_string()))?;
    Ok(nonce)
}

/// Encrypt `plaintext` under `key` with the given nonce.
///
/// Callers must never reuse a nonce with the same key; [`seal`] handles this
/// for the common case.
pub fn seal_with_nonce(
    key: &[u8; 32],
    nonce: [u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CofferError> {
    let key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
        .map_err(|_| CofferError::Vault("AES-256-GCM encryption failed".to_string()))?;
    Ok(in_out)
}

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), CofferError> {
    let nonce = generate_nonce()?;
    let ciphertext = seal_with_nonce(key, nonce, plaintext)?;
    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the 16-byte tag appended by [`seal`]. A wrong
/// key and tampered data are indistinguishable: both yield
/// [`CofferError::Decryption`].
pub fn open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CofferError> {
    let key = aead_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(*nonce), Aad::empty(), &mut in_out)
        .map_err(|_| CofferError::Decryption)?;
    Ok(plaintext.to_vec())
}

/// Seal and encode as Base64 of `nonce ‖ ciphertext`.
///
/// Used for data sealed under an already-derived session key (verifier and
/// per-record storage), where no salt needs to travel with the blob.
pub fn seal_to_base64(key: &[u8; 32], plaintext: &[u8]) -> Result<String, CofferError> {
    let (ciphertext, nonce) = seal(key, plaintext)?;
    let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    buf.extend_from_slice(&nonce);
    buf.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(buf))
}

/// Reverse of [`seal_to_base64`]. Every failure is [`CofferError::Decryption`].
pub fn open_from_base64(key: &[u8; 32], sealed: &str) -> Result<Vec<u8>, CofferError> {
    let bytes = STANDARD
        .decode(sealed.trim())
        .map_err(|_| CofferError::Decryption)?;
    if bytes.len() < NONCE_LEN + TAG_LEN {
        return Err(CofferError::Decryption);
    }
    let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
    let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| CofferError::Decryption)?;
    open(key, &nonce, ciphertext)
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
#[cfg(test)]
pub(crate) fn generate_random_key() -> Result<[u8; 32], CofferError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| CofferError::Vault("failed to generate random key".to_string()))?;
    Ok(key)
}
