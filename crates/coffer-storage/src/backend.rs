// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`VaultBackend`], scoped to one user.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use coffer_config::model::StorageConfig;
use coffer_core::{CofferError, Profile, RecordId, StoredRecord, VaultBackend};

use crate::database::{Database, map_tr_err};

/// Vault backend over the `profiles` and `passwords` tables.
///
/// Every query is filtered by `user_id`, so one database can hold several
/// independent vaults.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
    user_id: String,
}

impl SqliteBackend {
    pub fn new(db: Database, user_id: impl Into<String>) -> Self {
        Self {
            db,
            user_id: user_id.into(),
        }
    }

    /// Open the configured database file for `user_id`.
    pub async fn open(config: &StorageConfig, user_id: &str) -> Result<Self, CofferError> {
        let db = Database::open(&config.database_path).await?;
        Ok(Self::new(db, user_id))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Upsert one profile column. `column` is always a literal from this module.
    async fn set_profile_column(&self, column: &'static str, value: &str) -> Result<(), CofferError> {
        let user_id = self.user_id.clone();
        let value = value.to_string();
        let sql = format!(
            "INSERT INTO profiles (id, {column}) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET {column} = excluded.{column}"
        );
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(&sql, params![user_id, value])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl VaultBackend for SqliteBackend {
    async fn load_profile(&self) -> Result<Profile, CofferError> {
        let user_id = self.user_id.clone();
        let profile = self
            .db
            .connection()
            .call(move |conn| -> Result<Option<Profile>, rusqlite::Error> {
                conn.query_row(
                    "SELECT salt, password_verifier FROM profiles WHERE id = ?1",
                    params![user_id],
                    |row| {
                        Ok(Profile {
                            salt: row.get(0)?,
                            password_verifier: row.get(1)?,
                        })
                    },
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)?;
        Ok(profile.unwrap_or_default())
    }

    async fn save_salt(&self, salt: &str) -> Result<(), CofferError> {
        self.set_profile_column("salt", salt).await
    }

    async fn save_verifier(&self, verifier: &str) -> Result<(), CofferError> {
        self.set_profile_column("password_verifier", verifier).await
    }

    async fn list_records(&self) -> Result<Vec<StoredRecord>, CofferError> {
        let user_id = self.user_id.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<StoredRecord>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, encrypted_data, created_at FROM passwords
                     WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC",
                )?;
                let rows = stmt.query_map(params![user_id], |row| {
                    let id: i64 = row.get(0)?;
                    Ok(StoredRecord {
                        id: RecordId(id.to_string()),
                        data: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn insert_record(&self, data: &str) -> Result<RecordId, CofferError> {
        let user_id = self.user_id.clone();
        let data = data.to_string();
        let id = self
            .db
            .connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO passwords (user_id, encrypted_data) VALUES (?1, ?2)",
                    params![user_id, data],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(id, "record inserted");
        Ok(RecordId(id.to_string()))
    }

    async fn update_record(&self, id: &RecordId, data: &str) -> Result<(), CofferError> {
        let rowid = parse_id(id)?;
        let user_id = self.user_id.clone();
        let data = data.to_string();
        let changed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "UPDATE passwords SET encrypted_data = ?1 WHERE id = ?2 AND user_id = ?3",
                    params![data, rowid, user_id],
                )
            })
            .await
            .map_err(map_tr_err)?;
        if changed == 0 {
            return Err(CofferError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_record(&self, id: &RecordId) -> Result<(), CofferError> {
        let rowid = parse_id(id)?;
        let user_id = self.user_id.clone();
        let changed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "DELETE FROM passwords WHERE id = ?1 AND user_id = ?2",
                    params![rowid, user_id],
                )
            })
            .await
            .map_err(map_tr_err)?;
        if changed == 0 {
            return Err(CofferError::NotFound(id.to_string()));
        }
        debug!(%id, "record deleted");
        Ok(())
    }
}

fn parse_id(id: &RecordId) -> Result<i64, CofferError> {
    id.0.parse()
        .map_err(|_| CofferError::NotFound(id.to_string()))
}
