// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The password archive: entries ordered newest first, each with an
//! append-only history of the passwords it replaced.

use chrono::{DateTime, Utc};
use coffer_core::RecordId;
use serde::{Deserialize, Serialize};

/// A password that was replaced, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub password: String,
    pub changed_at: DateTime<Utc>,
}

/// One stored credential.
///
/// Field names serialize in camelCase so files exported by the web client
/// (`createdAt`, `updatedAt`) load unchanged. Only `platform` and `password`
/// are required by importers; everything else has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordEntry {
    /// Backend id. Absent until the entry has been saved, and stripped from exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub password: String,
    /// Strength score, 0 (weakest) to 4.
    #[serde(default)]
    pub strength: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl PasswordEntry {
    /// A fresh, unsaved entry created now.
    pub fn new(
        platform: impl Into<String>,
        label: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            platform: platform.into(),
            label: label.into(),
            password: password.into(),
            strength: 0,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
            history: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_strength(mut self, strength: u8) -> Self {
        self.strength = strength.min(4);
        self
    }

    /// Replace the password, pushing the old one onto the history.
    ///
    /// History is only ever appended to.
    pub fn rotate_password(&mut self, new_password: impl Into<String>, strength: u8, at: DateTime<Utc>) {
        let old = std::mem::replace(&mut self.password, new_password.into());
        self.history.push(HistoryEntry {
            password: old,
            changed_at: at,
        });
        self.strength = strength.min(4);
        self.updated_at = Some(at);
    }

    /// Whether both required fields are present.
    pub fn is_complete(&self) -> bool {
        !self.platform.trim().is_empty() && !self.password.is_empty()
    }

    /// Case-insensitive substring match over platform, label and notes.
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.platform.to_lowercase().contains(needle)
            || self.label.to_lowercase().contains(needle)
            || self
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(needle))
    }

    /// Copy of this entry without its backend id.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

/// Ordered collection of entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<PasswordEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an archive, sorting by creation time, newest first.
    pub fn from_entries(mut entries: Vec<PasswordEntry>) -> Self {
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { entries }
    }

    pub fn entries(&self) -> &[PasswordEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PasswordEntry> {
        self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<PasswordEntry> {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Index of the entry with `id`.
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id.as_ref() == Some(id))
    }

    pub fn get(&self, id: &RecordId) -> Option<&PasswordEntry> {
        self.position(id).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: &RecordId) -> Option<&mut PasswordEntry> {
        let index = self.position(id)?;
        self.entries.get_mut(index)
    }

    /// Insert at the front (newest position).
    pub fn push_front(&mut self, entry: PasswordEntry) {
        self.entries.insert(0, entry);
    }

    /// Entries whose platform, label or notes contain `query`, ignoring case.
    ///
    /// An empty query returns every entry.
    pub fn search(&self, query: &str) -> Vec<&PasswordEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(&needle)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(id: &str, platform: &str, age_minutes: i64) -> PasswordEntry {
        let mut e = PasswordEntry::new(platform, format!("{platform} login"), "pw");
        e.id = Some(RecordId::from(id));
        e.created_at = Utc::now() - Duration::minutes(age_minutes);
        e
    }

    #[test]
    fn from_entries_sorts_newest_first() {
        let archive = Archive::from_entries(vec![
            entry("1", "old", 30),
            entry("2", "new", 1),
            entry("3", "mid", 10),
        ]);
        let platforms: Vec<_> = archive.entries().iter().map(|e| e.platform.as_str()).collect();
        assert_eq!(platforms, vec!["new", "mid", "old"]);
    }

    #[test]
    fn search_is_case_insensitive_over_platform_label_notes() {
        let mut archive = Archive::new();
        archive.push_front(entry("1", "GitHub", 1));
        archive.push_front(entry("2", "bank", 2).with_notes("Joint ACCOUNT"));
        archive.push_front(entry("3", "mail", 3));

        assert_eq!(archive.search("github").len(), 1);
        assert_eq!(archive.search("account")[0].platform, "bank");
        assert_eq!(archive.search("LOGIN").len(), 3);
        assert_eq!(archive.search("  ").len(), 3);
        assert!(archive.search("nothing").is_empty());
    }

    #[test]
    fn rotate_password_appends_history() {
        let mut e = PasswordEntry::new("site", "me", "first");
        let t1 = Utc::now();
        e.rotate_password("second", 2, t1);
        e.rotate_password("third", 3, t1 + Duration::seconds(5));

        assert_eq!(e.password, "third");
        assert_eq!(e.history.len(), 2);
        assert_eq!(e.history[0].password, "first");
        assert_eq!(e.history[1].password, "second");
        assert_eq!(e.updated_at, Some(t1 + Duration::seconds(5)));
    }

    #[test]
    fn deserializes_web_client_json() {
        let json = r#"{
            "platform": "github",
            "label": "work",
            "password": "s3cret",
            "notes": "2fa on",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "history": [{"password": "old", "changedAt": "2024-02-01T10:00:00Z"}]
        }"#;
        let e: PasswordEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.platform, "github");
        assert_eq!(e.history.len(), 1);
        assert!(e.id.is_none());
        assert!(e.is_complete());
    }

    #[test]
    fn missing_required_fields_default_to_empty() {
        let e: PasswordEntry = serde_json::from_str(r#"{"label":"x"}"#).unwrap();
        assert!(!e.is_complete());
    }

    #[test]
    fn serialization_skips_absent_id() {
        let e = entry("9", "site", 0).without_id();
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
