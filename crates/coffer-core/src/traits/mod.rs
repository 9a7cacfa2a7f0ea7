// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions.
//!
//! Backends use `#[async_trait]` for dynamic dispatch compatibility.

pub mod backend;

pub use backend::VaultBackend;
