// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./coffer.toml` > `~/.config/coffer/coffer.toml` > `/etc/coffer/coffer.toml`
//! with environment variable overrides via `COFFER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CofferConfig;

/// Sections whose keys may be overridden from the environment.
const SECTIONS: &[&str] = &["general", "vault", "generator", "storage", "transfer"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/coffer/coffer.toml` (system-wide)
/// 3. `~/.config/coffer/coffer.toml` (user XDG config)
/// 4. `./coffer.toml` (local directory)
/// 5. `COFFER_*` environment variables
pub fn load_config() -> Result<CofferConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CofferConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CofferConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CofferConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CofferConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CofferConfig::default()))
        .merge(Toml::file("/etc/coffer/coffer.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("coffer/coffer.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("coffer.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `COFFER_VAULT_KDF_ITERATIONS` must map to
/// `vault.kdf_iterations`, not `vault.kdf.iterations`.
fn env_provider() -> Env {
    // COFFER_VAULT_KEY carries the passphrase, never configuration.
    Env::prefixed("COFFER_")
        .ignore(&["vault_key"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name onto a dotted config path.
fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
