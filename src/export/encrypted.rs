//! Encrypted export
//!
//! Wraps the JSON archive in a password-encrypted envelope:
//! `{encrypted: true, version, payload, kdf: {algo, salt, iterations},
//! cipher: {algo, iv}}`. A wrong password surfaces as `BadPassword`,
//! structural damage as `Malformed`.

use serde::{Deserialize, Serialize};

use crate::crypto::{decrypt, derive_key, encrypt, CipherText, KdfParams, CIPHER_ALGORITHM};
use crate::error::{DigibookError, DigibookResult};

use super::json::{ExportArchive, EXPORT_VERSION};

/// Cipher metadata carried in the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherSpec {
    /// Cipher identifier; only AES-GCM-256 is understood
    pub algo: String,
    /// Nonce, base64 encoded
    pub iv: String,
}

/// A password-encrypted export archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedArchive {
    /// Marker distinguishing encrypted exports from plain ones
    pub encrypted: bool,
    /// Export format version
    pub version: u32,
    /// Ciphertext of the JSON archive, base64 encoded
    pub payload: String,
    /// Key-derivation parameters
    pub kdf: KdfParams,
    /// Cipher parameters
    pub cipher: CipherSpec,
}

/// Encrypt an archive under a password
pub fn encrypt_archive(archive: &ExportArchive, password: &str) -> DigibookResult<EncryptedArchive> {
    let params = KdfParams::generate();
    let key = derive_key(password, &params)?;

    let plaintext = archive.to_json()?;
    let ct = encrypt(plaintext.as_bytes(), &key)?;

    Ok(EncryptedArchive {
        encrypted: true,
        version: EXPORT_VERSION,
        payload: ct.ciphertext,
        kdf: params,
        cipher: CipherSpec {
            algo: CIPHER_ALGORITHM.to_string(),
            iv: ct.iv,
        },
    })
}

/// Decrypt an envelope back into the archive it wraps
pub fn decrypt_archive(envelope: &EncryptedArchive, password: &str) -> DigibookResult<ExportArchive> {
    if !envelope.encrypted {
        return Err(DigibookError::Malformed(
            "Envelope is not marked as encrypted".into(),
        ));
    }
    if envelope.cipher.algo != CIPHER_ALGORITHM {
        return Err(DigibookError::Malformed(format!(
            "Unsupported cipher: {}",
            envelope.cipher.algo
        )));
    }

    let key = derive_key(password, &envelope.kdf)?;
    let plaintext = decrypt(
        &CipherText {
            iv: envelope.cipher.iv.clone(),
            ciphertext: envelope.payload.clone(),
        },
        &key,
    )?;

    let text = String::from_utf8(plaintext)
        .map_err(|e| DigibookError::Malformed(format!("Decrypted payload is not UTF-8: {}", e)))?;
    ExportArchive::from_json(&text)
}

/// Parse an envelope from JSON text
pub fn parse_envelope(text: &str) -> DigibookResult<EncryptedArchive> {
    serde_json::from_str(text)
        .map_err(|e| DigibookError::Malformed(format!("Not an encrypted export: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn archive() -> ExportArchive {
        ExportArchive::from_database(&Database::seeded())
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let original = archive();
        let envelope = encrypt_archive(&original, "hunter2hunter2").unwrap();

        assert!(envelope.encrypted);
        assert_eq!(envelope.kdf.algo, "PBKDF2-SHA256");
        assert_eq!(envelope.cipher.algo, "AES-GCM-256");

        let decrypted = decrypt_archive(&envelope, "hunter2hunter2").unwrap();
        assert_eq!(decrypted.categories, original.categories);
    }

    #[test]
    fn test_wrong_password_is_bad_password() {
        let envelope = encrypt_archive(&archive(), "right").unwrap();
        assert!(matches!(
            decrypt_archive(&envelope, "wrong"),
            Err(DigibookError::BadPassword)
        ));
    }

    #[test]
    fn test_tampered_payload_is_bad_password() {
        let mut envelope = encrypt_archive(&archive(), "pw").unwrap();
        // Flip a character inside the base64 payload
        let mut chars: Vec<char> = envelope.payload.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        envelope.payload = chars.into_iter().collect();

        let result = decrypt_archive(&envelope, "pw");
        assert!(matches!(
            result,
            Err(DigibookError::BadPassword) | Err(DigibookError::Malformed(_))
        ));
    }

    #[test]
    fn test_structural_damage_is_malformed() {
        assert!(matches!(
            parse_envelope("{\"encrypted\": \"yes\"}"),
            Err(DigibookError::Malformed(_))
        ));

        let mut envelope = encrypt_archive(&archive(), "pw").unwrap();
        envelope.cipher.algo = "ROT13".into();
        assert!(matches!(
            decrypt_archive(&envelope, "pw"),
            Err(DigibookError::Malformed(_))
        ));
    }

    #[test]
    fn test_envelope_serializes_with_contract_fields() {
        let envelope = encrypt_archive(&archive(), "pw").unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["encrypted"], true);
        assert!(value["kdf"]["salt"].is_string());
        assert!(value["kdf"]["iterations"].as_u64().unwrap() >= 100_000);
        assert!(value["cipher"]["iv"].is_string());
        assert!(value["payload"].is_string());
    }
}
