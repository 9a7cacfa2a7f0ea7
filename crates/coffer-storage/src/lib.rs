// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Coffer.
//!
//! One file holds the `profiles` and `passwords` tables for any number of
//! users. All statements run on tokio-rusqlite's single background thread.

pub mod backend;
pub mod database;

pub use backend::SqliteBackend;
pub use database::Database;
