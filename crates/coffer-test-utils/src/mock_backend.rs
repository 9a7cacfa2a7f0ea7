// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vault backend for deterministic tests.
//!
//! `MockBackend` keeps one profile and a list of records behind a mutex.
//! Failures can be switched on for every mutating call, or scheduled for
//! inserts after a number of successes, to exercise rollback paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use coffer_core::{CofferError, Profile, RecordId, StoredRecord, VaultBackend};

#[derive(Debug, Default)]
struct State {
    profile: Profile,
    records: Vec<StoredRecord>,
    next_id: u64,
}

/// A cloneable in-memory backend. Clones share state.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
    failing: Arc<AtomicBool>,
    /// Inserts still allowed before inserts start failing; `usize::MAX` disables.
    inserts_left: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            failing: Arc::new(AtomicBool::new(false)),
            inserts_left: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    /// Make every mutating call fail (or succeed again).
    ///
    /// Turning failures off also clears any insert schedule.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
        if !failing {
            self.inserts_left.store(usize::MAX, Ordering::SeqCst);
        }
    }

    /// Let `n` more inserts succeed, then fail every insert.
    pub fn fail_inserts_after(&self, n: usize) {
        self.inserts_left.store(n, Ordering::SeqCst);
    }

    pub async fn record_count(&self) -> usize {
        self.state.lock().await.records.len()
    }

    fn check(&self, op: &str) -> Result<(), CofferError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected(op));
        }
        Ok(())
    }

    fn check_insert(&self) -> Result<(), CofferError> {
        self.check("insert_record")?;
        let left = self.inserts_left.load(Ordering::SeqCst);
        if left == usize::MAX {
            return Ok(());
        }
        if left == 0 {
            return Err(injected("insert_record"));
        }
        self.inserts_left.store(left - 1, Ordering::SeqCst);
        Ok(())
    }
}

fn injected(op: &str) -> CofferError {
    CofferError::storage(std::io::Error::other(format!("injected failure in {op}")))
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VaultBackend for MockBackend {
    async fn load_profile(&self) -> Result<Profile, CofferError> {
        Ok(self.state.lock().await.profile.clone())
    }

    async fn save_salt(&self, salt: &str) -> Result<(), CofferError> {
        self.check("save_salt")?;
        self.state.lock().await.profile.salt = Some(salt.to_string());
        Ok(())
    }

    async fn save_verifier(&self, verifier: &str) -> Result<(), CofferError> {
        self.check("save_verifier")?;
        self.state.lock().await.profile.password_verifier = Some(verifier.to_string());
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<StoredRecord>, CofferError> {
        Ok(self.state.lock().await.records.clone())
    }

    async fn insert_record(&self, data: &str) -> Result<RecordId, CofferError> {
        self.check_insert()?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = RecordId(state.next_id.to_string());
        state.records.push(StoredRecord {
            id: id.clone(),
            data: data.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(id)
    }

    async fn update_record(&self, id: &RecordId, data: &str) -> Result<(), CofferError> {
        self.check("update_record")?;
        let mut state = self.state.lock().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| CofferError::NotFound(id.to_string()))?;
        record.data = data.to_string();
        Ok(())
    }

    async fn delete_record(&self, id: &RecordId) -> Result<(), CofferError> {
        self.check("delete_record")?;
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|r| r.id != *id);
        if state.records.len() == before {
            return Err(CofferError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let backend = MockBackend::new();
        assert_eq!(backend.insert_record("a").await.unwrap().0, "1");
        assert_eq!(backend.insert_record("b").await.unwrap().0, "2");
        assert_eq!(backend.record_count().await, 2);
    }

    #[tokio::test]
    async fn failing_switch_rejects_mutations_only() {
        let backend = MockBackend::new();
        backend.insert_record("a").await.unwrap();
        backend.set_failing(true);

        assert!(backend.insert_record("b").await.is_err());
        assert!(backend.delete_record(&RecordId::from("1")).await.is_err());
        assert_eq!(backend.list_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_schedule_fails_after_n() {
        let backend = MockBackend::new();
        backend.fail_inserts_after(1);
        assert!(backend.insert_record("a").await.is_ok());
        assert!(backend.insert_record("b").await.is_err());
        // Deletes still work.
        backend.delete_record(&RecordId::from("1")).await.unwrap();

        backend.set_failing(false);
        assert!(backend.insert_record("c").await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let a = MockBackend::new();
        let b = a.clone();
        a.save_salt("c2FsdA==").await.unwrap();
        assert_eq!(b.load_profile().await.unwrap().salt.as_deref(), Some("c2FsdA=="));
    }
}
