// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Coffer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use coffer_core::StorageMode;
use serde::{Deserialize, Serialize};

/// Top-level Coffer configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CofferConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Key derivation and record storage mode.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Default password generator options.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Import/export worker settings.
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Owner of the vault rows in the storage backend.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            user_id: default_user_id(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_id() -> String {
    "local".to_string()
}

/// Vault key derivation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// How password records are persisted.
    #[serde(default)]
    pub storage_mode: StorageMode,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            storage_mode: StorageMode::default(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

/// Password generator defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Generated password length in characters.
    #[serde(default = "default_length")]
    pub length: usize,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default = "default_true")]
    pub uppercase: bool,

    #[serde(default = "default_true")]
    pub digits: bool,

    #[serde(default = "default_true")]
    pub symbols: bool,

    /// Drop visually similar characters (`i l 1 O 0`).
    #[serde(default = "default_true")]
    pub exclude_similar: bool,

    /// Extra characters never to emit.
    #[serde(default)]
    pub exclude: String,

    /// Guarantee at least one character from each enabled class.
    #[serde(default = "default_true")]
    pub require_each_class: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            exclude_similar: true,
            exclude: String::new(),
            require_each_class: true,
        }
    }
}

fn default_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("coffer").join("coffer.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("coffer.db"))
        .to_string_lossy()
        .into_owned()
}

/// Import/export worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransferConfig {
    /// Capacity of the request and event channels of each worker.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CofferConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert_eq!(config.vault.storage_mode, StorageMode::Encrypted);
        assert_eq!(config.generator.length, 16);
        assert!(config.generator.exclude_similar);
        assert!(config.generator.require_each_class);
        assert_eq!(config.transfer.channel_capacity, 16);
        assert!(config.storage.database_path.ends_with("coffer.db"));
    }

    #[test]
    fn storage_mode_parses_lowercase() {
        let config: CofferConfig = toml::from_str(
            r#"
[vault]
storage_mode = "plaintext"
"#,
        )
        .unwrap();
        assert_eq!(config.vault.storage_mode, StorageMode::Plaintext);
    }

    #[test]
    fn partial_generator_section_keeps_other_defaults() {
        let config: CofferConfig = toml::from_str(
            r#"
[generator]
length = 24
symbols = false
"#,
        )
        .unwrap();
        assert_eq!(config.generator.length, 24);
        assert!(!config.generator.symbols);
        assert!(config.generator.lowercase);
        assert!(config.generator.exclude.is_empty());
    }
}
