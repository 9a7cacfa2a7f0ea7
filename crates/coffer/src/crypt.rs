// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer encrypt` / `coffer decrypt`: passphrase envelopes over stdin/stdout.

use std::io::Read;

use coffer_config::CofferConfig;
use coffer_core::CofferError;
use coffer_vault::{decrypt_data, encrypt_data, prompt};
use secrecy::{ExposeSecret, SecretString};

fn read_stdin() -> Result<String, CofferError> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| CofferError::Internal(format!("failed to read stdin: {e}")))?;
    Ok(input)
}

pub fn run_encrypt(config: &CofferConfig) -> Result<(), CofferError> {
    let plaintext = read_stdin()?;
    let passphrase = prompt::read_passphrase()?;
    println!("{}", seal_input(&plaintext, &passphrase, config.vault.kdf_iterations)?);
    Ok(())
}

pub fn run_decrypt(config: &CofferConfig) -> Result<(), CofferError> {
    let envelope = read_stdin()?;
    let passphrase = prompt::read_passphrase()?;
    print!("{}", open_input(&envelope, &passphrase, config.vault.kdf_iterations)?);
    Ok(())
}

/// Seal piped text as-is, trailing newline included.
fn seal_input(
    plaintext: &str,
    passphrase: &SecretString,
    iterations: u32,
) -> Result<String, CofferError> {
    encrypt_data(plaintext, passphrase.expose_secret(), iterations)
}

/// Open an envelope read from a pipe, ignoring surrounding whitespace.
fn open_input(
    envelope: &str,
    passphrase: &SecretString,
    iterations: u32,
) -> Result<String, CofferError> {
    decrypt_data(envelope.trim(), passphrase.expose_secret(), iterations)
}
