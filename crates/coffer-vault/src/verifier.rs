// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase verifier: a known plaintext sealed under the vault key.

use coffer_core::CofferError;
use serde::{Deserialize, Serialize};

use crate::crypto;

/// The known value stored inside the verifier.
pub const VERIFIER_TEXT: &str = "vault-check-ok";

#[derive(Debug, Serialize, Deserialize)]
struct VerifierPayload {
    verifier: String,
}

/// Seal `{"verifier":"vault-check-ok"}` under `key`.
pub fn create_verifier(key: &[u8; 32]) -> Result<String, CofferError> {
    let payload = serde_json::to_vec(&VerifierPayload {
        verifier: VERIFIER_TEXT.to_string(),
    })
    .map_err(|e| CofferError::Internal(format!("failed to serialize verifier: {e}")))?;
    crypto::seal_to_base64(key, &payload)
}

/// Check that `sealed` opens under `key` and holds the expected value.
///
/// Any mismatch is reported as [`CofferError::Decryption`].
pub fn check_verifier(key: &[u8; 32], sealed: &str) -> Result<(), CofferError> {
    let plaintext = crypto::open_from_base64(key, sealed)?;
    let payload: VerifierPayload =
        serde_json::from_slice(&plaintext).map_err(|_| CofferError::Decryption)?;
    if payload.verifier == VERIFIER_TEXT {
        Ok(())
    } else {
        Err(CofferError::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifier_checks_with_the_same_key() {
        let key = crypto::generate_random_key().unwrap();
        let sealed = create_verifier(&key).unwrap();
        check_verifier(&key, &sealed).unwrap();
    }

    #[test]
    fn verifier_rejects_another_key() {
        let key = crypto::generate_random_key().unwrap();
        let other = crypto::generate_random_key().unwrap();
        let sealed = create_verifier(&key).unwrap();
        assert!(matches!(
            check_verifier(&other, &sealed),
            Err(CofferError::Decryption)
        ));
    }

    #[test]
    fn verifier_rejects_wrong_known_value() {
        let key = crypto::generate_random_key().unwrap();
        let sealed = crypto::seal_to_base64(&key, br#"{"verifier":"nope"}"#).unwrap();
        assert!(matches!(
            check_verifier(&key, &sealed),
            Err(CofferError::Decryption)
        ));
    }
}
