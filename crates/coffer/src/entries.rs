// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle and entry commands: init, status, list, add, remove, rotate.

use clap::Args;
use coffer_config::CofferConfig;
use coffer_config::model::GeneratorConfig;
use coffer_core::{CofferError, RecordId, VaultBackend, VaultStatus};
use coffer_storage::SqliteBackend;
use coffer_vault::generator::{self, GeneratorOptions};
use coffer_vault::{PasswordEntry, PasswordStore, VaultSession, prompt, strength};
use secrecy::SecretString;

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    #[arg(long)]
    pub platform: String,
    #[arg(long, default_value = "")]
    pub label: String,
    #[arg(long)]
    pub notes: Option<String>,
    /// Generated from the `[generator]` settings when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

/// Open the configured database for the configured user.
pub async fn open_store(config: &CofferConfig) -> Result<PasswordStore<SqliteBackend>, CofferError> {
    let backend = SqliteBackend::open(&config.storage, &config.general.user_id).await?;
    Ok(PasswordStore::new(backend, VaultSession::from_config(&config.vault)))
}

/// Open the store and unlock it with the master passphrase.
///
/// Returns the passphrase too, for commands that reuse it.
pub async fn open_unlocked(
    config: &CofferConfig,
) -> Result<(PasswordStore<SqliteBackend>, SecretString), CofferError> {
    let mut store = open_store(config).await?;
    ensure_initialized(&mut store).await?;
    let passphrase = prompt::read_passphrase()?;
    store.unlock(&passphrase).await?;
    Ok((store, passphrase))
}

async fn ensure_initialized<B: VaultBackend>(store: &mut PasswordStore<B>) -> Result<(), CofferError> {
    if store.check_status().await? == VaultStatus::Uninitialized {
        return Err(CofferError::Vault(
            "vault is not initialized; run `coffer init` first".to_string(),
        ));
    }
    Ok(())
}

pub async fn run_init(config: &CofferConfig) -> Result<(), CofferError> {
    let mut store = open_store(config).await?;
    if store.check_status().await? != VaultStatus::Uninitialized {
        return Err(CofferError::Vault("vault is already initialized".to_string()));
    }
    let passphrase = prompt::read_new_passphrase()?;
    store.initialize(&passphrase).await?;
    println!("vault created for user `{}`", config.general.user_id);
    Ok(())
}

pub async fn run_status(config: &CofferConfig) -> Result<(), CofferError> {
    let mut store = open_store(config).await?;
    let status = store.check_status().await?;
    println!("user:     {}", config.general.user_id);
    println!("status:   {status}");
    println!("database: {}", config.storage.database_path);
    println!("storage:  {}", store.session().storage_mode());
    Ok(())
}

pub async fn run_list(config: &CofferConfig, query: Option<&str>, show: bool) -> Result<(), CofferError> {
    let (mut store, _) = open_unlocked(config).await?;
    for line in list_lines(&mut store, query.unwrap_or(""), show)? {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_add(config: &CofferConfig, args: &AddArgs) -> Result<(), CofferError> {
    let (mut store, _) = open_unlocked(config).await?;
    let (id, generated) = add_entry(&mut store, args, &config.generator).await?;
    println!("added {id}");
    if let Some(password) = generated {
        println!("generated password: {password}");
    }
    Ok(())
}

pub async fn run_remove(config: &CofferConfig, id: &str) -> Result<(), CofferError> {
    let (mut store, _) = open_unlocked(config).await?;
    store.delete(&RecordId::from(id)).await?;
    println!("removed {id}");
    Ok(())
}

pub async fn run_rotate(
    config: &CofferConfig,
    id: &str,
    password: Option<&str>,
) -> Result<(), CofferError> {
    let (mut store, _) = open_unlocked(config).await?;
    let generated = rotate_entry(&mut store, &RecordId::from(id), password, &config.generator).await?;
    println!("rotated {id}");
    if let Some(password) = generated {
        println!("new password: {password}");
    }
    Ok(())
}

/// One tab-separated line per matching entry.
pub fn list_lines<B: VaultBackend>(
    store: &mut PasswordStore<B>,
    query: &str,
    show: bool,
) -> Result<Vec<String>, CofferError> {
    Ok(store
        .filtered(query)?
        .into_iter()
        .map(|e| {
            let id = e.id.as_ref().map(ToString::to_string).unwrap_or_default();
            let mut line = format!("{id}\t{}\t{}\t{}/4", e.platform, e.label, e.strength);
            if show {
                line.push('\t');
                line.push_str(&e.password);
            }
            line
        })
        .collect())
}

/// Save a new entry. Returns its id and the password if one was generated.
pub async fn add_entry<B: VaultBackend>(
    store: &mut PasswordStore<B>,
    args: &AddArgs,
    generator_config: &GeneratorConfig,
) -> Result<(RecordId, Option<String>), CofferError> {
    if args.platform.trim().is_empty() {
        return Err(CofferError::Vault("platform must not be empty".to_string()));
    }
    let (password, generated) = password_or_generate(args.password.as_deref(), generator_config)?;
    let mut entry = PasswordEntry::new(args.platform.trim(), args.label.trim(), password.clone())
        .with_strength(strength::score(&password));
    entry.notes = args.notes.clone().filter(|n| !n.is_empty());

    let id = store.save(entry).await?;
    Ok((id, generated.then_some(password)))
}

/// Rotate an entry's password. Returns the password if one was generated.
pub async fn rotate_entry<B: VaultBackend>(
    store: &mut PasswordStore<B>,
    id: &RecordId,
    password: Option<&str>,
    generator_config: &GeneratorConfig,
) -> Result<Option<String>, CofferError> {
    let (password, generated) = password_or_generate(password, generator_config)?;
    store.update_password(id, &password).await?;
    Ok(generated.then_some(password))
}

fn password_or_generate(
    given: Option<&str>,
    config: &GeneratorConfig,
) -> Result<(String, bool), CofferError> {
    match given {
        Some(p) if !p.is_empty() => Ok((p.to_string(), false)),
        _ => Ok((generator::generate(&GeneratorOptions::from(config))?, true)),
    }
}
