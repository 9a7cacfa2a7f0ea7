// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the vault, its backends and the transfer workers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Backend-assigned identifier of a stored password record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

/// Lifecycle state of a vault session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    /// No verifier exists yet; the vault has never been set up.
    Uninitialized,
    /// A verifier exists but no key is held in memory.
    Locked,
    /// Key derived and archive materialized in memory.
    Unlocked,
}

/// How each password record is persisted in the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Entry JSON sealed with the session key.
    #[default]
    Encrypted,
    /// Entry JSON stored as-is.
    Plaintext,
}

/// Per-user vault metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Base64 of the 16-byte PBKDF2 salt, created once per vault.
    pub salt: Option<String>,
    /// Sealed known plaintext used to check a passphrase.
    pub password_verifier: Option<String>,
}

/// A raw row from the passwords table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    /// Sealed or plaintext entry JSON, depending on [`StorageMode`].
    pub data: String,
    /// RFC 3339 insertion time.
    pub created_at: String,
}
