// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Coffer workspace.

use thiserror::Error;

/// Message carried by every decryption failure.
///
/// Wrong passphrase, truncated input, tag mismatch and garbage after
/// decryption all collapse into this one string.
pub const DECRYPTION_FAILED: &str = "decryption failed: wrong password or corrupted file";

/// The primary error type used across all Coffer crates.
#[derive(Debug, Error)]
pub enum CofferError {
    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Key derivation, sealing and vault lifecycle errors.
    #[error("vault error: {0}")]
    Vault(String),

    /// The operation needs an unlocked vault.
    #[error("vault is locked")]
    VaultLocked,

    /// Any failure to recover plaintext from an envelope.
    #[error("{}", DECRYPTION_FAILED)]
    Decryption,

    /// Password generator could not satisfy its options.
    #[error("generator error: {0}")]
    Generator(String),

    /// Import/export worker failures.
    #[error("transfer error: {0}")]
    Transfer(String),

    /// A record with the given id does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CofferError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CofferError::Storage {
            source: Box::new(err),
        }
    }
}
