// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer export` and `coffer import` command implementations.
//!
//! Encrypted files use `COFFER_EXPORT_KEY` when it is set, otherwise the
//! master password.

use std::path::Path;

use coffer_config::CofferConfig;
use coffer_core::{CofferError, VaultBackend};
use coffer_transfer::{ExportFormat, WorkerHandle, WorkerOptions, spawn_worker};
use coffer_vault::PasswordStore;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::entries::open_unlocked;

/// Environment variable with a separate password for encrypted files.
pub const EXPORT_KEY_ENV_VAR: &str = "COFFER_EXPORT_KEY";

fn file_key(master: &SecretString) -> String {
    std::env::var(EXPORT_KEY_ENV_VAR)
        .ok()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| master.expose_secret().to_string())
}

pub async fn run_export(
    config: &CofferConfig,
    format: ExportFormat,
    out: &Path,
) -> Result<(), CofferError> {
    let (store, master) = open_unlocked(config).await?;
    let mut worker = spawn_worker(WorkerOptions::from_config(config));
    let key = (format == ExportFormat::Encrypted).then(|| file_key(&master));

    let content = export_store(&mut worker, &store, format, key).await?;
    worker.shutdown().await;

    tokio::fs::write(out, content)
        .await
        .map_err(|e| CofferError::Transfer(format!("failed to write {}: {e}", out.display())))?;
    let count = store.entries()?.len();
    info!(path = %out.display(), %format, count, "vault exported");
    println!("exported {count} entries to {}", out.display());
    Ok(())
}

pub async fn run_import(config: &CofferConfig, file: &Path) -> Result<(), CofferError> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| CofferError::Transfer(format!("failed to read {}: {e}", file.display())))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (mut store, master) = open_unlocked(config).await?;
    let mut worker = spawn_worker(WorkerOptions::from_config(config));
    let count = import_into_store(&mut worker, &mut store, &file_name, content, file_key(&master)).await?;
    worker.shutdown().await;

    println!("imported {count} entries from {}", file.display());
    Ok(())
}

/// Export every entry of an unlocked store through the worker.
pub async fn export_store<B: VaultBackend>(
    worker: &mut WorkerHandle,
    store: &PasswordStore<B>,
    format: ExportFormat,
    key: Option<String>,
) -> Result<String, CofferError> {
    let entries = store.entries()?.to_vec();
    worker.export(entries, format, key).await
}

/// Parse a file through the worker and save its entries as one batch.
pub async fn import_into_store<B: VaultBackend>(
    worker: &mut WorkerHandle,
    store: &mut PasswordStore<B>,
    file_name: &str,
    content: String,
    key: String,
) -> Result<usize, CofferError> {
    let entries = worker.import(file_name, content, Some(key)).await?;
    store.import(entries).await
}
