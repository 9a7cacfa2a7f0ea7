// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase envelopes: `salt ‖ iv ‖ ciphertext`, Base64-encoded.
//!
//! Each call to [`encrypt_data`] draws a fresh salt and IV, so the same
//! plaintext never produces the same envelope twice. The key is re-derived
//! from the embedded salt on decryption.
//!
//! Every decryption failure, whatever its cause, surfaces as
//! [`CofferError::Decryption`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use coffer_core::CofferError;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::crypto::{self, NONCE_LEN, TAG_LEN};
use crate::kdf::{self, SALT_LEN};

/// Decoded envelope parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; NONCE_LEN],
    /// Ciphertext with the GCM tag appended.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize to bytes: salt ‖ iv ‖ ciphertext.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split raw bytes into their parts.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CofferError> {
        if bytes.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(CofferError::Decryption);
        }
        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(NONCE_LEN);
        Ok(Self {
            salt: salt.try_into().map_err(|_| CofferError::Decryption)?,
            iv: iv.try_into().map_err(|_| CofferError::Decryption)?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Base64 (standard alphabet, padded) of [`Envelope::to_bytes`].
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode a Base64 envelope.
    pub fn from_base64(encoded: &str) -> Result<Self, CofferError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CofferError::Decryption)?;
        Self::from_bytes(&bytes)
    }
}

/// Encrypt UTF-8 `plaintext` under `passphrase` into a Base64 envelope.
pub fn encrypt_data(plaintext: &str, passphrase: &str, iterations: u32) -> Result<String, CofferError> {
    let salt = kdf::generate_salt()?;
    let key = kdf::derive_key(passphrase.as_bytes(), &salt, iterations)?;
    let (ciphertext, iv) = crypto::seal(&key, plaintext.as_bytes())?;
    Ok(Envelope {
        salt,
        iv,
        ciphertext,
    }
    .to_base64())
}

/// Decrypt a Base64 envelope back into the original UTF-8 string.
pub fn decrypt_data(encoded: &str, passphrase: &str, iterations: u32) -> Result<String, CofferError> {
    let envelope = Envelope::from_base64(encoded)?;
    // A KDF parameter error here would otherwise leak as a distinct message.
    let key = kdf::derive_key(passphrase.as_bytes(), &envelope.salt, iterations)
        .map_err(|_| CofferError::Decryption)?;
    let plaintext = crypto::open(&key, &envelope.iv, &envelope.ciphertext)?;
    String::from_utf8(plaintext).map_err(|_| CofferError::Decryption)
}

/// Serialize `value` to JSON and encrypt it.
pub fn encrypt_json<T: Serialize + ?Sized>(
    value: &T,
    passphrase: &str,
    iterations: u32,
) -> Result<String, CofferError> {
    let json = serde_json::to_string(value)
        .map_err(|e| CofferError::Internal(format!("failed to serialize payload: {e}")))?;
    encrypt_data(&json, passphrase, iterations)
}

/// Decrypt an envelope and parse its JSON.
///
/// Plaintext that is not valid JSON for `T` is treated as a decryption
/// failure.
pub fn decrypt_json<T: DeserializeOwned>(
    encoded: &str,
    passphrase: &str,
    iterations: u32,
) -> Result<T, CofferError> {
    let json = decrypt_data(encoded, passphrase, iterations)?;
    serde_json::from_str(&json).map_err(|_| CofferError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::DECRYPTION_FAILED;

    const ITER: u32 = 1_000;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let json = r#"[{"platform":"github","password":"hunter2"}]"#;
        let blob = encrypt_data(json, "correct horse", ITER).unwrap();
        assert_eq!(decrypt_data(&blob, "correct horse", ITER).unwrap(), json);
    }

    #[test]
    fn encryption_is_not_deterministic() {
        let a = encrypt_data("same", "pw", ITER).unwrap();
        let b = encrypt_data("same", "pw", ITER).unwrap();
        assert_ne!(a, b);

        let ea = Envelope::from_base64(&a).unwrap();
        let eb = Envelope::from_base64(&b).unwrap();
        assert_ne!(ea.salt, eb.salt);
        assert_ne!(ea.iv, eb.iv);
    }

    #[test]
    fn wrong_passphrase_fails_with_generic_message_every_time() {
        let blob = encrypt_data("payload", "right", ITER).unwrap();
        for _ in 0..3 {
            let err = decrypt_data(&blob, "wrong", ITER).unwrap_err();
            assert_eq!(err.to_string(), DECRYPTION_FAILED);
        }
    }

    #[test]
    fn envelope_layout_is_salt_iv_ciphertext() {
        let blob = encrypt_data("abc", "pw", ITER).unwrap();
        let raw = STANDARD.decode(&blob).unwrap();
        assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + 3 + TAG_LEN);

        let envelope = Envelope::from_bytes(&raw).unwrap();
        assert_eq!(&raw[..SALT_LEN], &envelope.salt);
        assert_eq!(&raw[SALT_LEN..SALT_LEN + NONCE_LEN], &envelope.iv);
        assert_eq!(envelope.to_bytes(), raw);
    }

    #[test]
    fn truncated_envelope_is_decryption_error() {
        let blob = encrypt_data("abc", "pw", ITER).unwrap();
        let raw = STANDARD.decode(&blob).unwrap();
        let short = STANDARD.encode(&raw[..SALT_LEN + 4]);
        assert!(matches!(
            decrypt_data(&short, "pw", ITER),
            Err(CofferError::Decryption)
        ));
    }

    #[test]
    fn corrupted_byte_is_decryption_error() {
        let blob = encrypt_data("abc", "pw", ITER).unwrap();
        let mut raw = STANDARD.decode(&blob).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let corrupted = STANDARD.encode(&raw);
        assert!(matches!(
            decrypt_data(&corrupted, "pw", ITER),
            Err(CofferError::Decryption)
        ));
    }

    #[test]
    fn invalid_base64_is_decryption_error() {
        assert!(matches!(
            decrypt_data("%%%", "pw", ITER),
            Err(CofferError::Decryption)
        ));
    }

    #[test]
    fn json_helpers_roundtrip_and_reject_wrong_shape() {
        let blob = encrypt_json(&vec!["a", "b"], "pw", ITER).unwrap();
        let back: Vec<String> = decrypt_json(&blob, "pw", ITER).unwrap();
        assert_eq!(back, vec!["a", "b"]);

        let not_a_number: Result<u64, _> = decrypt_json(&blob, "pw", ITER);
        assert!(matches!(not_a_number, Err(CofferError::Decryption)));
    }

    #[test]
    fn empty_passphrase_works() {
        let blob = encrypt_data("x", "", ITER).unwrap();
        assert_eq!(decrypt_data(&blob, "", ITER).unwrap(), "x");
    }
}
