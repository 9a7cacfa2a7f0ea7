// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worker message protocol.
//!
//! Requests serialize as `{"type": "EXPORT_DATA" | "IMPORT_DATA", "payload": ...}`
//! and events as `{"status": "success" | "error" | "progress", "payload": ...}`.

use coffer_vault::PasswordEntry;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Progress message sent when an import starts parsing.
pub const PROGRESS_PARSING: &str = "parsing data";

/// Progress message sent before an encrypted import is decrypted.
pub const PROGRESS_DECRYPTING: &str = "decrypting file";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    ExportData(ExportRequest),
    ImportData(ImportRequest),
}

/// Export file formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Plain,
    Encrypted,
    Csv,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub data: Vec<PasswordEntry>,
    pub format: ExportFormat,
    /// Passphrase for the `encrypted` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl std::fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportRequest")
            .field("entries", &self.data.len())
            .field("format", &self.format)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub file_content: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decryption_key: Option<String>,
}

impl std::fmt::Debug for ImportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportRequest")
            .field("file_name", &self.file_name)
            .field("bytes", &self.file_content.len())
            .field("decryption_key", &self.decryption_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum WorkerEvent {
    Success(SuccessPayload),
    Error(String),
    Progress(String),
}

impl WorkerEvent {
    /// Success and error end a task; progress does not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Progress(_))
    }
}

/// Result of a finished task: file content for exports, entries for imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuccessPayload {
    Exported(String),
    Imported(Vec<PasswordEntry>),
}

/// Wrapper object of an encrypted export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedFile {
    pub encrypted_data: String,
    #[serde(default)]
    pub hint: String,
}

/// Text of the `hint` field written into encrypted exports.
pub const ENCRYPTED_FILE_HINT: &str = "This is an encrypted vault file.";
