// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for profile and password record persistence.

use async_trait::async_trait;

use crate::error::CofferError;
use crate::types::{Profile, RecordId, StoredRecord};

/// Persistence for one user's vault: a profile row and a set of records.
///
/// Implementations only move opaque strings around. Encryption happens
/// before data reaches the backend.
#[async_trait]
pub trait VaultBackend: Send + Sync {
    /// Load the profile, creating an empty one if none exists.
    async fn load_profile(&self) -> Result<Profile, CofferError>;

    /// Persist the vault salt. Called once, when the profile has none.
    async fn save_salt(&self, salt: &str) -> Result<(), CofferError>;

    /// Persist the sealed verifier.
    async fn save_verifier(&self, verifier: &str) -> Result<(), CofferError>;

    /// List every stored record.
    ///
    /// Order is backend-defined. The SQLite backend returns newest first;
    /// callers that need an order sort by entry timestamps.
    async fn list_records(&self) -> Result<Vec<StoredRecord>, CofferError>;

    /// Insert a record and return its backend id.
    async fn insert_record(&self, data: &str) -> Result<RecordId, CofferError>;

    /// Replace the data of an existing record.
    async fn update_record(&self, id: &RecordId, data: &str) -> Result<(), CofferError>;

    /// Delete a record. Deleting a missing id is an error.
    async fn delete_record(&self, id: &RecordId) -> Result<(), CofferError>;
}
