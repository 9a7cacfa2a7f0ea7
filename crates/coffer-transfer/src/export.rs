// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize an archive into an export file.

use coffer_core::CofferError;
use coffer_vault::{PasswordEntry, encrypt_data};

use crate::protocol::{ENCRYPTED_FILE_HINT, EncryptedFile, ExportFormat};

/// Column order of CSV files, both written and read.
pub const CSV_HEADER: [&str; 4] = ["platform", "label", "password", "notes"];

/// Produce the content of an export file.
///
/// Backend ids are stripped in every format. The `encrypted` format needs a
/// non-empty `key`.
pub fn export_entries(
    entries: &[PasswordEntry],
    format: ExportFormat,
    key: Option<&str>,
    iterations: u32,
) -> Result<String, CofferError> {
    let stripped: Vec<PasswordEntry> = entries.iter().map(PasswordEntry::without_id).collect();

    match format {
        ExportFormat::Plain => serde_json::to_string_pretty(&stripped).map_err(json_err),
        ExportFormat::Encrypted => {
            let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
                CofferError::Transfer("a password is required for encrypted export".to_string())
            })?;
            let json = serde_json::to_string(&stripped).map_err(json_err)?;
            let file = EncryptedFile {
                encrypted_data: encrypt_data(&json, key, iterations)?,
                hint: ENCRYPTED_FILE_HINT.to_string(),
            };
            serde_json::to_string(&file).map_err(json_err)
        }
        ExportFormat::Csv => to_csv(&stripped),
    }
}

fn to_csv(entries: &[PasswordEntry]) -> Result<String, CofferError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for e in entries {
        writer
            .write_record([
                e.platform.as_str(),
                e.label.as_str(),
                e.password.as_str(),
                e.notes.as_deref().unwrap_or(""),
            ])
            .map_err(csv_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CofferError::Transfer(format!("failed to finish CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CofferError::Internal(format!("CSV is not UTF-8: {e}")))
}

fn json_err(e: serde_json::Error) -> CofferError {
    CofferError::Internal(format!("failed to serialize export: {e}"))
}

fn csv_err(e: csv::Error) -> CofferError {
    CofferError::Transfer(format!("failed to write CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::RecordId;
    use coffer_vault::decrypt_data;

    const ITER: u32 = 1_000;

    fn sample() -> Vec<PasswordEntry> {
        let mut a = PasswordEntry::new("github", "work", "p@ss, \"quoted\"").with_notes("line1");
        a.id = Some(RecordId::from("41"));
        let mut b = PasswordEntry::new("bank", "", "1234");
        b.id = Some(RecordId::from("42"));
        vec![a, b]
    }

    #[test]
    fn plain_export_is_pretty_json_without_ids() {
        let out = export_entries(&sample(), ExportFormat::Plain, None, ITER).unwrap();
        assert!(out.contains("\n  "));
        assert!(!out.contains("\"id\""));
        let back: Vec<PasswordEntry> = serde_json::from_str(&out).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].platform, "github");
    }

    #[test]
    fn encrypted_export_wraps_envelope_with_hint() {
        let out = export_entries(&sample(), ExportFormat::Encrypted, Some("k3y"), ITER).unwrap();
        let file: EncryptedFile = serde_json::from_str(&out).unwrap();
        assert_eq!(file.hint, ENCRYPTED_FILE_HINT);
        assert!(!out.contains("github"));

        let json = decrypt_data(&file.encrypted_data, "k3y", ITER).unwrap();
        let back: Vec<PasswordEntry> = serde_json::from_str(&json).unwrap();
        assert!(back.iter().all(|e| e.id.is_none()));
    }

    #[test]
    fn encrypted_export_requires_key() {
        for key in [None, Some("")] {
            let err = export_entries(&sample(), ExportFormat::Encrypted, key, ITER).unwrap_err();
            assert!(matches!(err, CofferError::Transfer(_)));
        }
    }

    #[test]
    fn csv_export_quotes_fields() {
        let out = export_entries(&sample(), ExportFormat::Csv, None, ITER).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("platform,label,password,notes"));
        assert_eq!(lines.next(), Some(r#"github,work,"p@ss, ""quoted""",line1"#));
        assert_eq!(lines.next(), Some("bank,,1234,"));
    }
}
