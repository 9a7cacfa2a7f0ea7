// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a passphrase.
//!
//! Derives the 32-byte AES-256-GCM key. The derivation is deterministic for
//! a given passphrase, salt and iteration count, which is what lets a stored
//! verifier confirm a passphrase without storing it.

use std::num::NonZeroU32;

use coffer_core::CofferError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Iteration count used when nothing else is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from `passphrase` using PBKDF2-HMAC-SHA256.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CofferError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| CofferError::Vault("PBKDF2 iteration count must be non-zero".to_string()))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        output.as_mut(),
    );
    Ok(output)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CofferError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| CofferError::Vault("failed to generate random salt".to_string()))?;
    Ok(salt)
}
