// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between [`PasswordEntry`] and the `data` column of a stored record.

use coffer_core::{CofferError, StorageMode, StoredRecord};

use crate::archive::PasswordEntry;
use crate::crypto;

/// Encode an entry for storage. The id is never stored inside the payload.
pub fn encode_entry(
    entry: &PasswordEntry,
    mode: StorageMode,
    key: &[u8; 32],
) -> Result<String, CofferError> {
    let json = serde_json::to_string(&entry.without_id())
        .map_err(|e| CofferError::Internal(format!("failed to serialize entry: {e}")))?;
    match mode {
        StorageMode::Encrypted => crypto::seal_to_base64(key, json.as_bytes()),
        StorageMode::Plaintext => Ok(json),
    }
}

/// Decode a stored record, attaching the backend id.
pub fn decode_record(
    record: &StoredRecord,
    mode: StorageMode,
    key: &[u8; 32],
) -> Result<PasswordEntry, CofferError> {
    let json = match mode {
        StorageMode::Encrypted => crypto::open_from_base64(key, &record.data)?,
        StorageMode::Plaintext => record.data.as_bytes().to_vec(),
    };
    let mut entry: PasswordEntry = serde_json::from_slice(&json)
        .map_err(|e| CofferError::Vault(format!("record {} is malformed: {e}", record.id)))?;
    entry.id = Some(record.id.clone());
    Ok(entry)
}
