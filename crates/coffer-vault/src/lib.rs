// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password vault core for Coffer.
//!
//! A master passphrase is stretched with PBKDF2-HMAC-SHA256 into an
//! AES-256-GCM key. The key checks a sealed verifier on unlock, seals each
//! stored record in encrypted mode, and never leaves memory. Exported
//! archives use self-contained passphrase envelopes instead.

pub mod archive;
pub mod crypto;
pub mod envelope;
pub mod generator;
pub mod kdf;
pub mod optimistic;
pub mod prompt;
pub mod record;
pub mod session;
pub mod store;
pub mod strength;
pub mod verifier;

pub use archive::{Archive, HistoryEntry, PasswordEntry};
pub use envelope::{decrypt_data, decrypt_json, encrypt_data, encrypt_json};
pub use generator::{GeneratorOptions, generate};
pub use optimistic::Optimistic;
pub use prompt::{read_new_passphrase, read_passphrase};
pub use session::VaultSession;
pub use store::PasswordStore;
pub use strength::{StrengthReport, estimate};
