// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express, such as the
//! KDF iteration floor and generator class coverage.

use crate::diagnostic::ConfigError;
use crate::model::CofferConfig;

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;

/// Accepted generator length range.
pub const GENERATOR_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=256;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &CofferConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.general.log_level.as_str()) {
        fail(format!(
            "general.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.general.log_level
        ));
    }

    if config.general.user_id.trim().is_empty() {
        fail("general.user_id must not be empty".to_string());
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        fail(format!(
            "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }

    let generator = &config.generator;
    if !GENERATOR_LENGTH_RANGE.contains(&generator.length) {
        fail(format!(
            "generator.length must be between {} and {}, got {}",
            GENERATOR_LENGTH_RANGE.start(),
            GENERATOR_LENGTH_RANGE.end(),
            generator.length
        ));
    }

    if !(generator.lowercase || generator.uppercase || generator.digits || generator.symbols) {
        fail("generator must enable at least one character class".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.transfer.channel_capacity == 0 {
        fail("transfer.channel_capacity must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = CofferConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn low_kdf_iterations_fails_validation() {
        let mut config = CofferConfig::default();
        config.vault.kdf_iterations = 1_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "kdf_iterations"));
    }

    #[test]
    fn all_classes_disabled_fails_validation() {
        let mut config = CofferConfig::default();
        config.generator.lowercase = false;
        config.generator.uppercase = false;
        config.generator.digits = false;
        config.generator.symbols = false;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at least one character class"));
    }

    #[test]
    fn out_of_range_length_fails_validation() {
        let mut config = CofferConfig::default();
        config.generator.length = 2;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "generator.length"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = CofferConfig::default();
        config.general.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log_level"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = CofferConfig::default();
        config.storage.database_path = "  ".to_string();
        config.transfer.channel_capacity = 0;
        config.vault.kdf_iterations = 1;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
