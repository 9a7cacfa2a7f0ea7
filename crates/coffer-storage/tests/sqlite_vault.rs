// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault lifecycle over an on-disk SQLite file.

use coffer_config::model::StorageConfig;
use coffer_core::{StorageMode, VaultBackend, VaultStatus};
use coffer_storage::{Database, SqliteBackend};
use coffer_vault::{PasswordEntry, PasswordStore, VaultSession};
use secrecy::SecretString;
use tempfile::tempdir;

fn passphrase() -> SecretString {
    SecretString::from("tr0ub4dor&3".to_string())
}

#[tokio::test]
async fn vault_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("coffer.db").to_string_lossy().into_owned(),
    };

    let backend = SqliteBackend::open(&config, "alice").await.unwrap();
    let mut store = PasswordStore::new(backend, VaultSession::new(1_000, StorageMode::Encrypted));
    assert_eq!(store.check_status().await.unwrap(), VaultStatus::Uninitialized);
    store.initialize(&passphrase()).await.unwrap();
    let id = store
        .save(PasswordEntry::new("github", "work", "hunter2").with_notes("2fa on"))
        .await
        .unwrap();
    store.update_password(&id, "hunter3").await.unwrap();
    drop(store);

    let backend = SqliteBackend::open(&config, "alice").await.unwrap();
    let raw = backend.list_records().await.unwrap();
    assert!(!raw[0].data.contains("hunter"), "records must be sealed at rest");

    let mut store = PasswordStore::new(backend, VaultSession::new(1_000, StorageMode::Encrypted));
    assert_eq!(store.check_status().await.unwrap(), VaultStatus::Locked);
    store.unlock(&passphrase()).await.unwrap();

    let entry = store.get(&id).unwrap();
    assert_eq!(entry.password, "hunter3");
    assert_eq!(entry.history[0].password, "hunter2");
    assert_eq!(entry.notes.as_deref(), Some("2fa on"));
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let db = Database::open_in_memory().await.unwrap();
    let alice = SqliteBackend::new(db.clone(), "alice");
    let bob = SqliteBackend::new(db, "bob");

    alice.save_salt("a-salt").await.unwrap();
    let id = alice.insert_record("alice-data").await.unwrap();

    assert!(bob.load_profile().await.unwrap().salt.is_none());
    assert!(bob.list_records().await.unwrap().is_empty());
    assert!(bob.delete_record(&id).await.is_err());
    assert_eq!(alice.list_records().await.unwrap().len(), 1);
}
