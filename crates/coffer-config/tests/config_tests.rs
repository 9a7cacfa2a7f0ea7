// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Coffer configuration system.

use coffer_config::diagnostic::ConfigError;
use coffer_config::{load_and_validate_str, load_config_from_str};
use coffer_core::StorageMode;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_coffer_config() {
    let toml = r#"
[general]
log_level = "debug"
user_id = "alice"

[vault]
kdf_iterations = 200000
storage_mode = "plaintext"

[generator]
length = 20
symbols = false
exclude_similar = false
exclude = "{}"
require_each_class = false

[storage]
database_path = "/tmp/coffer-test.db"

[transfer]
channel_capacity = 4
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.user_id, "alice");
    assert_eq!(config.vault.kdf_iterations, 200_000);
    assert_eq!(config.vault.storage_mode, StorageMode::Plaintext);
    assert_eq!(config.generator.length, 20);
    assert!(!config.generator.symbols);
    assert!(!config.generator.exclude_similar);
    assert_eq!(config.generator.exclude, "{}");
    assert!(!config.generator.require_each_class);
    assert_eq!(config.storage.database_path, "/tmp/coffer-test.db");
    assert_eq!(config.transfer.channel_capacity, 4);
}

/// Unknown field in [vault] produces an error naming the key.
#[test]
fn unknown_field_in_vault_produces_error() {
    let toml = r#"
[vault]
kdf_iteratons = 100000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("kdf_iteratons"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[shop]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Wrong type becomes an InvalidType diagnostic.
#[test]
fn wrong_type_reports_invalid_type() {
    let toml = r#"
[generator]
length = "long"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("length")))
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_runs_after_parse() {
    let toml = r#"
[vault]
kdf_iterations = 10
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations")))
    );
}

/// Empty input yields the defaults.
#[test]
fn empty_toml_gives_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.vault.kdf_iterations, 100_000);
    assert_eq!(config.generator.length, 16);
}
