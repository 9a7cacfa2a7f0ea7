// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault session lifecycle: uninitialized, locked, unlocked.
//!
//! The archive and the derived key only exist while the session is
//! unlocked. Locking zeroizes the key and drops every decrypted entry.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use coffer_config::model::VaultConfig;
use coffer_core::{CofferError, StorageMode, VaultBackend, VaultStatus};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::archive::{Archive, PasswordEntry};
use crate::kdf::{self, SALT_LEN};
use crate::record;
use crate::verifier;

/// The per-user vault state.
///
/// Debug output omits the key.
pub struct VaultSession {
    status: VaultStatus,
    key: Option<Zeroizing<[u8; 32]>>,
    archive: Archive,
    search_query: String,
    iterations: u32,
    mode: StorageMode,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("status", &self.status)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("entries", &self.archive.len())
            .field("iterations", &self.iterations)
            .field("mode", &self.mode)
            .finish()
    }
}

impl VaultSession {
    /// A fresh session. Its status stays `Uninitialized` until
    /// [`check_status`](Self::check_status) has consulted the backend.
    pub fn new(iterations: u32, mode: StorageMode) -> Self {
        Self {
            status: VaultStatus::Uninitialized,
            key: None,
            archive: Archive::new(),
            search_query: String::new(),
            iterations,
            mode,
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.kdf_iterations, config.storage_mode)
    }

    pub fn status(&self) -> VaultStatus {
        self.status
    }

    pub fn is_unlocked(&self) -> bool {
        self.status == VaultStatus::Unlocked
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.mode
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Read the profile and decide between `Uninitialized` and `Locked`.
    ///
    /// Creates and persists a salt when the profile has none. An unlocked
    /// session is left as it is.
    pub async fn check_status<B>(&mut self, backend: &B) -> Result<VaultStatus, CofferError>
    where
        B: VaultBackend + ?Sized,
    {
        ensure_salt(backend).await?;
        if self.is_unlocked() {
            return Ok(self.status);
        }

        let profile = backend.load_profile().await?;
        self.status = if profile.password_verifier.is_some() {
            VaultStatus::Locked
        } else {
            VaultStatus::Uninitialized
        };
        debug!(status = %self.status, "vault status checked");
        Ok(self.status)
    }

    /// Set the master passphrase of a new vault and unlock it.
    ///
    /// Any failure locks the session.
    pub async fn initialize<B>(
        &mut self,
        backend: &B,
        passphrase: &SecretString,
    ) -> Result<(), CofferError>
    where
        B: VaultBackend + ?Sized,
    {
        match self.create_key(backend, passphrase).await {
            Ok(key) => {
                self.key = Some(key);
                self.archive = Archive::new();
                self.search_query.clear();
                self.status = VaultStatus::Unlocked;
                info!("vault created");
                Ok(())
            }
            Err(e) => {
                self.lock();
                warn!(error = %e, "vault initialization failed");
                Err(e)
            }
        }
    }

    async fn create_key<B>(
        &self,
        backend: &B,
        passphrase: &SecretString,
    ) -> Result<Zeroizing<[u8; 32]>, CofferError>
    where
        B: VaultBackend + ?Sized,
    {
        let profile = backend.load_profile().await?;
        if profile.password_verifier.is_some() {
            return Err(CofferError::Vault("vault is already initialized".to_string()));
        }
        if passphrase.expose_secret().is_empty() {
            return Err(CofferError::Vault("empty passphrase not allowed".to_string()));
        }

        let salt = ensure_salt(backend).await?;
        let key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, self.iterations)?;
        let sealed = verifier::create_verifier(&key)?;
        backend.save_verifier(&sealed).await?;
        Ok(key)
    }

    /// Derive the key, check it against the verifier and load the archive.
    ///
    /// A wrong passphrase yields [`CofferError::Decryption`]. Any failure
    /// locks the session, dropping a previously loaded archive and key.
    /// Records that fail to decode are skipped.
    pub async fn unlock<B>(
        &mut self,
        backend: &B,
        passphrase: &SecretString,
    ) -> Result<(), CofferError>
    where
        B: VaultBackend + ?Sized,
    {
        match self.open_archive(backend, passphrase).await {
            Ok((key, archive, total)) => {
                self.archive = archive;
                self.key = Some(key);
                self.status = VaultStatus::Unlocked;
                info!(
                    loaded = self.archive.len(),
                    skipped = total - self.archive.len(),
                    "vault unlocked"
                );
                Ok(())
            }
            Err(e) => {
                self.lock();
                warn!("vault unlock failed");
                Err(e)
            }
        }
    }

    async fn open_archive<B>(
        &mut self,
        backend: &B,
        passphrase: &SecretString,
    ) -> Result<(Zeroizing<[u8; 32]>, Archive, usize), CofferError>
    where
        B: VaultBackend + ?Sized,
    {
        let profile = backend.load_profile().await?;
        let Some(sealed_verifier) = profile.password_verifier else {
            self.status = VaultStatus::Uninitialized;
            return Err(CofferError::Vault("vault is not initialized".to_string()));
        };
        // A verifier exists, so a failure from here on leaves the vault locked.
        self.status = VaultStatus::Locked;
        let Some(encoded_salt) = profile.salt else {
            return Err(CofferError::Vault("profile has a verifier but no salt".to_string()));
        };
        let salt = decode_salt(&encoded_salt)?;

        let key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, self.iterations)?;
        verifier::check_verifier(&key, &sealed_verifier)?;

        let records = backend.list_records().await?;
        let total = records.len();
        let entries: Vec<PasswordEntry> = records
            .iter()
            .filter_map(|stored| match record::decode_record(stored, self.mode, &key) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(id = %stored.id, error = %e, "skipping undecodable record");
                    None
                }
            })
            .collect();

        Ok((key, Archive::from_entries(entries), total))
    }

    /// Zeroize the key and drop the archive.
    pub fn lock(&mut self) {
        // Dropping the Zeroizing wrapper wipes the key bytes.
        self.key = None;
        self.archive.clear();
        self.search_query.clear();
        if self.status == VaultStatus::Unlocked {
            self.status = VaultStatus::Locked;
            info!("vault locked");
        }
    }

    pub fn key(&self) -> Result<&[u8; 32], CofferError> {
        match (&self.key, self.status) {
            (Some(key), VaultStatus::Unlocked) => Ok(&**key),
            _ => Err(CofferError::VaultLocked),
        }
    }

    pub fn archive(&self) -> Result<&Archive, CofferError> {
        if self.is_unlocked() {
            Ok(&self.archive)
        } else {
            Err(CofferError::VaultLocked)
        }
    }

    pub fn archive_mut(&mut self) -> Result<&mut Archive, CofferError> {
        if self.is_unlocked() {
            Ok(&mut self.archive)
        } else {
            Err(CofferError::VaultLocked)
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }
}

/// Load the profile salt, creating and saving one if it is missing.
async fn ensure_salt<B>(backend: &B) -> Result<[u8; SALT_LEN], CofferError>
where
    B: VaultBackend + ?Sized,
{
    let profile = backend.load_profile().await?;
    if let Some(encoded) = profile.salt {
        return decode_salt(&encoded);
    }

    let salt = kdf::generate_salt()?;
    backend.save_salt(&STANDARD.encode(salt)).await?;
    debug!("generated new profile salt");
    Ok(salt)
}

fn decode_salt(encoded: &str) -> Result<[u8; SALT_LEN], CofferError> {
    STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| <[u8; SALT_LEN]>::try_from(bytes.as_slice()).ok())
        .ok_or_else(|| CofferError::Vault("profile salt is not 16 Base64-encoded bytes".to_string()))
}
