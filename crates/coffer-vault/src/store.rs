// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password store with optimistic local updates.
//!
//! Each mutation is applied to the in-memory archive before the backend
//! call. If the backend rejects it, the archive is restored to its
//! pre-mutation snapshot and the backend error is returned.

use chrono::Utc;
use coffer_core::{CofferError, RecordId, StorageMode, VaultBackend, VaultStatus};
use secrecy::SecretString;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::archive::PasswordEntry;
use crate::optimistic::Optimistic;
use crate::record;
use crate::session::VaultSession;
use crate::strength;

/// Prefix of ids given to entries that the backend has not confirmed yet.
pub const PENDING_ID_PREFIX: &str = "pending-";

/// A vault session bound to its backend.
#[derive(Debug)]
pub struct PasswordStore<B: VaultBackend> {
    backend: B,
    session: VaultSession,
}

impl<B: VaultBackend> PasswordStore<B> {
    pub fn new(backend: B, session: VaultSession) -> Self {
        Self { backend, session }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    pub async fn check_status(&mut self) -> Result<VaultStatus, CofferError> {
        self.session.check_status(&self.backend).await
    }

    pub async fn initialize(&mut self, passphrase: &SecretString) -> Result<(), CofferError> {
        self.session.initialize(&self.backend, passphrase).await
    }

    pub async fn unlock(&mut self, passphrase: &SecretString) -> Result<(), CofferError> {
        self.session.unlock(&self.backend, passphrase).await
    }

    pub fn lock(&mut self) {
        self.session.lock();
    }

    /// Every entry, newest first.
    pub fn entries(&self) -> Result<&[PasswordEntry], CofferError> {
        Ok(self.session.archive()?.entries())
    }

    pub fn get(&self, id: &RecordId) -> Result<&PasswordEntry, CofferError> {
        self.session
            .archive()?
            .get(id)
            .ok_or_else(|| CofferError::NotFound(id.to_string()))
    }

    /// Entries matching `query`, which also becomes the session's search query.
    pub fn filtered(&mut self, query: &str) -> Result<Vec<&PasswordEntry>, CofferError> {
        self.session.archive()?;
        self.session.set_search_query(query);
        Ok(self.session.archive()?.search(query))
    }

    /// Save a new entry, returning its backend id.
    pub async fn save(&mut self, mut entry: PasswordEntry) -> Result<RecordId, CofferError> {
        let (key, mode) = self.key_and_mode()?;
        let data = record::encode_entry(&entry, mode, &key)?;

        let provisional = RecordId(format!("{PENDING_ID_PREFIX}{}", uuid::Uuid::new_v4()));
        entry.id = Some(provisional.clone());

        let archive = self.session.archive_mut()?;
        let (pending, ()) = Optimistic::apply(archive.entries_mut(), |v| v.insert(0, entry));

        match self.backend.insert_record(&data).await {
            Ok(id) => {
                pending.commit();
                if let Some(saved) = archive.get_mut(&provisional) {
                    saved.id = Some(id.clone());
                }
                debug!(%id, "entry saved");
                Ok(id)
            }
            Err(e) => {
                pending.rollback(archive.entries_mut());
                warn!(error = %e, "save rejected by backend, rolled back");
                Err(e)
            }
        }
    }

    /// Delete an entry. On failure it reappears at its original position.
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), CofferError> {
        let archive = self.session.archive_mut()?;
        let index = archive
            .position(id)
            .ok_or_else(|| CofferError::NotFound(id.to_string()))?;
        let (pending, _removed) = Optimistic::apply(archive.entries_mut(), |v| v.remove(index));

        match self.backend.delete_record(id).await {
            Ok(()) => {
                pending.commit();
                debug!(%id, "entry deleted");
                Ok(())
            }
            Err(e) => {
                pending.rollback(archive.entries_mut());
                warn!(%id, error = %e, "delete rejected by backend, rolled back");
                Err(e)
            }
        }
    }

    /// Replace an entry's password, appending the old one to its history.
    pub async fn update_password(
        &mut self,
        id: &RecordId,
        new_password: &str,
    ) -> Result<(), CofferError> {
        if new_password.is_empty() {
            return Err(CofferError::Vault("password must not be empty".to_string()));
        }
        let (key, mode) = self.key_and_mode()?;
        let score = strength::score(new_password);

        let archive = self.session.archive_mut()?;
        let index = archive
            .position(id)
            .ok_or_else(|| CofferError::NotFound(id.to_string()))?;
        let (pending, updated) = Optimistic::apply(archive.entries_mut(), |v| {
            v[index].rotate_password(new_password, score, Utc::now());
            v[index].clone()
        });

        let result = match record::encode_entry(&updated, mode, &key) {
            Ok(data) => self.backend.update_record(id, &data).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                pending.commit();
                debug!(%id, history = updated.history.len(), "password rotated");
                Ok(())
            }
            Err(e) => {
                pending.rollback(archive.entries_mut());
                warn!(%id, error = %e, "password update rejected, rolled back");
                Err(e)
            }
        }
    }

    /// Save a batch of entries. Either every entry is stored or none is.
    ///
    /// Returns the number of entries imported.
    pub async fn import(&mut self, entries: Vec<PasswordEntry>) -> Result<usize, CofferError> {
        if let Some(bad) = entries.iter().position(|e| !e.is_complete()) {
            return Err(CofferError::Transfer(format!(
                "entry {} is missing a platform or password",
                bad + 1
            )));
        }
        let (key, mode) = self.key_and_mode()?;
        let encoded: Vec<String> = entries
            .iter()
            .map(|e| record::encode_entry(e, mode, &key))
            .collect::<Result<_, _>>()?;

        let provisional: Vec<RecordId> = entries
            .iter()
            .map(|_| RecordId(format!("{PENDING_ID_PREFIX}{}", uuid::Uuid::new_v4())))
            .collect();
        let staged: Vec<PasswordEntry> = entries
            .into_iter()
            .zip(&provisional)
            .map(|(mut e, id)| {
                e.id = Some(id.clone());
                e
            })
            .collect();
        let count = staged.len();

        let archive = self.session.archive_mut()?;
        let (pending, ()) = Optimistic::apply(archive.entries_mut(), |v| {
            v.splice(0..0, staged).for_each(drop);
        });

        let mut stored = Vec::with_capacity(count);
        for data in &encoded {
            match self.backend.insert_record(data).await {
                Ok(id) => stored.push(id),
                Err(e) => {
                    pending.rollback(archive.entries_mut());
                    for id in &stored {
                        if let Err(cleanup) = self.backend.delete_record(id).await {
                            warn!(%id, error = %cleanup, "failed to remove partially imported record");
                        }
                    }
                    warn!(error = %e, imported = stored.len(), "import rejected, rolled back batch");
                    return Err(e);
                }
            }
        }

        pending.commit();
        for (temp, id) in provisional.iter().zip(stored) {
            if let Some(entry) = archive.get_mut(temp) {
                entry.id = Some(id);
            }
        }
        debug!(count, "entries imported");
        Ok(count)
    }

    fn key_and_mode(&self) -> Result<(Zeroizing<[u8; 32]>, StorageMode), CofferError> {
        Ok((Zeroizing::new(*self.session.key()?), self.session.storage_mode()))
    }
}
