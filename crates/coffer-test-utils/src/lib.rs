// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Coffer integration tests.
//!
//! - [`MockBackend`] - in-memory `VaultBackend` with switchable failures

pub mod mock_backend;

pub use mock_backend::MockBackend;
