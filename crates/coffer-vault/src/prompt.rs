// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase acquisition from `COFFER_VAULT_KEY` or the terminal.

use std::io::IsTerminal;

use coffer_core::CofferError;
use secrecy::SecretString;

/// Environment variable holding the master passphrase for non-interactive use.
pub const VAULT_KEY_ENV_VAR: &str = "COFFER_VAULT_KEY";

const NO_PASSPHRASE: &str =
    "no passphrase provided; set COFFER_VAULT_KEY or run from an interactive terminal";

fn from_env() -> Option<SecretString> {
    std::env::var(VAULT_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

fn read_line(prompt: &str) -> Result<String, CofferError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| CofferError::Vault(format!("failed to read passphrase: {e}")))
}

/// Whether a passphrase prompt can reach the user.
///
/// rpassword reads from the controlling terminal, so piped stdin is fine as
/// long as stdin or stderr is still attached to a terminal.
fn interactive() -> bool {
    std::io::stdin().is_terminal() || std::io::stderr().is_terminal()
}

/// Read the master passphrase, preferring `COFFER_VAULT_KEY`.
pub fn read_passphrase() -> Result<SecretString, CofferError> {
    passphrase(interactive())
}

/// Read a new master passphrase, asking twice on a terminal.
pub fn read_new_passphrase() -> Result<SecretString, CofferError> {
    new_passphrase(interactive())
}

fn passphrase(interactive: bool) -> Result<SecretString, CofferError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !interactive {
        return Err(CofferError::Vault(NO_PASSPHRASE.to_string()));
    }

    let passphrase = read_line("Master password: ")?;
    if passphrase.is_empty() {
        return Err(CofferError::Vault("empty passphrase not allowed".to_string()));
    }
    Ok(SecretString::from(passphrase))
}

fn new_passphrase(interactive: bool) -> Result<SecretString, CofferError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !interactive {
        return Err(CofferError::Vault(NO_PASSPHRASE.to_string()));
    }

    let first = read_line("New master password: ")?;
    let second = read_line("Confirm master password: ")?;
    if first != second {
        return Err(CofferError::Vault("passphrases do not match".to_string()));
    }
    if first.is_empty() {
        return Err(CofferError::Vault("empty passphrase not allowed".to_string()));
    }
    Ok(SecretString::from(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn passphrase_comes_from_env() {
        // SAFETY: env mutation is serialized across tests.
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "from-env") };
        let result = read_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-env");
    }

    #[test]
    #[serial]
    fn env_wins_without_a_terminal() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "piped") };
        let result = passphrase(false);
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "piped");
    }

    #[test]
    #[serial]
    fn new_passphrase_from_env_skips_confirmation() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "fresh") };
        let result = read_new_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn empty_env_without_terminal_fails() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "") };
        let first = passphrase(false);
        let second = new_passphrase(false);
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(matches!(first, Err(CofferError::Vault(m)) if m == NO_PASSPHRASE));
        assert!(matches!(second, Err(CofferError::Vault(m)) if m == NO_PASSPHRASE));
    }
}
