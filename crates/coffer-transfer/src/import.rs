// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse, decrypt and validate an import file.
//!
//! The outcome is all-or-nothing: either every record is valid and returned,
//! or the whole file is rejected with one error.

use std::path::Path;

use coffer_core::CofferError;
use coffer_vault::{PasswordEntry, decrypt_data};
use serde_json::Value;

use crate::protocol::{PROGRESS_DECRYPTING, PROGRESS_PARSING};

pub const UNSUPPORTED_FILE: &str = "unsupported file type; choose a .json or .csv file";
pub const INVALID_JSON: &str = "invalid JSON file";
pub const KEY_REQUIRED: &str = "encrypted file, please provide a decryption password";
pub const MISSING_FIELDS: &str = "file is malformed or missing required fields (platform, password)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Csv,
}

impl FileKind {
    /// Detect the file kind from the extension of `file_name`.
    pub fn detect(file_name: &str) -> Result<Self, CofferError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if ext.eq_ignore_ascii_case("json") {
            Ok(FileKind::Json)
        } else if ext.eq_ignore_ascii_case("csv") {
            Ok(FileKind::Csv)
        } else {
            Err(transfer(UNSUPPORTED_FILE))
        }
    }
}

/// Turn an import file into entries.
///
/// `progress` is called with [`PROGRESS_PARSING`] first and with
/// [`PROGRESS_DECRYPTING`] before an encrypted payload is opened.
pub fn import_file(
    content: &str,
    file_name: &str,
    key: Option<&str>,
    iterations: u32,
    mut progress: impl FnMut(&str),
) -> Result<Vec<PasswordEntry>, CofferError> {
    let kind = FileKind::detect(file_name)?;
    progress(PROGRESS_PARSING);

    match kind {
        FileKind::Json => {
            let value = parse_json(content, key, iterations, &mut progress)?;
            entries_from_value(value)
        }
        FileKind::Csv => {
            let entries = parse_csv(content)?;
            if entries.iter().any(|e| !e.is_complete()) {
                return Err(transfer(MISSING_FIELDS));
            }
            Ok(entries)
        }
    }
}

fn parse_json(
    content: &str,
    key: Option<&str>,
    iterations: u32,
    progress: &mut impl FnMut(&str),
) -> Result<Value, CofferError> {
    let value: Value = serde_json::from_str(content).map_err(|_| transfer(INVALID_JSON))?;

    let Some(encrypted) = value.get("encryptedData") else {
        return Ok(value);
    };
    let encrypted = encrypted.as_str().ok_or(CofferError::Decryption)?;
    let key = key.filter(|k| !k.is_empty()).ok_or_else(|| transfer(KEY_REQUIRED))?;

    progress(PROGRESS_DECRYPTING);
    let plaintext = decrypt_data(encrypted, key, iterations)?;
    serde_json::from_str(&plaintext).map_err(|_| CofferError::Decryption)
}

/// Validate the generic JSON shape, then deserialize.
fn entries_from_value(value: Value) -> Result<Vec<PasswordEntry>, CofferError> {
    let Value::Array(items) = &value else {
        return Err(transfer(MISSING_FIELDS));
    };
    let has_text = |item: &Value, field: &str| {
        item.get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    if !items
        .iter()
        .all(|item| has_text(item, "platform") && has_text(item, "password"))
    {
        return Err(transfer(MISSING_FIELDS));
    }

    let mut entries: Vec<PasswordEntry> =
        serde_json::from_value(value).map_err(|e| transfer(format!("{MISSING_FIELDS}: {e}")))?;
    for e in &mut entries {
        e.id = None;
    }
    Ok(entries)
}

fn parse_csv(content: &str) -> Result<Vec<PasswordEntry>, CofferError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| transfer(format!("invalid CSV at record {}: {e}", line + 1)))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        // Secrets are kept byte-exact; only the descriptive columns are trimmed.
        let field = |i: usize| record.get(i).unwrap_or_default();
        let mut entry = PasswordEntry::new(
            field(0).trim().to_string(),
            field(1).trim().to_string(),
            field(2).to_string(),
        );
        let notes = field(3).to_string();
        if !notes.is_empty() {
            entry.notes = Some(notes);
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn transfer(message: impl Into<String>) -> CofferError {
    CofferError::Transfer(message.into())
}
