// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup and schema creation.

use coffer_core::CofferError;
use tracing::debug;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS profiles (
        id                TEXT PRIMARY KEY,
        salt              TEXT,
        password_verifier TEXT
    );
    CREATE TABLE IF NOT EXISTS passwords (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id        TEXT NOT NULL,
        encrypted_data TEXT NOT NULL,
        created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
    CREATE INDEX IF NOT EXISTS idx_passwords_user ON passwords (user_id, created_at);
";

/// A handle to the vault database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// Missing parent directories are created.
    pub async fn open(path: &str) -> Result<Self, CofferError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(CofferError::storage)?;
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(CofferError::storage)?;
        let db = Self { conn };
        db.init(true).await?;
        debug!(path, "vault database opened");
        Ok(db)
    }

    /// An in-memory database, mostly for tests.
    pub async fn open_in_memory() -> Result<Self, CofferError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(CofferError::storage)?;
        let db = Self { conn };
        db.init(false).await?;
        Ok(db)
    }

    async fn init(&self, wal: bool) -> Result<(), CofferError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal {
                    let _mode: String =
                        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                }
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CofferError {
    CofferError::storage(e)
}
