// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Coffer.
//!
//! Provides the error type, the record and profile types shared by every
//! crate, and the [`VaultBackend`] trait that storage implementations
//! fulfil.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CofferError, DECRYPTION_FAILED};
pub use traits::VaultBackend;
pub use types::{Profile, RecordId, StorageMode, StoredRecord, VaultStatus};
