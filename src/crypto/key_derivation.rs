//! Key derivation using PBKDF2-SHA256
//!
//! Derives the AES-256 key for encrypted exports from the user's password.
//! The salt and iteration count travel with the export envelope so the
//! same key can be re-derived on import.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{DigibookError, DigibookResult};

/// KDF algorithm identifier written into export envelopes
pub const KDF_ALGORITHM: &str = "PBKDF2-SHA256";

/// Iterations used for new exports
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Smallest iteration count accepted when importing
pub const MIN_ITERATIONS: u32 = 100_000;

const SALT_SIZE: usize = 16;

/// Key-derivation parameters carried alongside encrypted payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Algorithm identifier; only PBKDF2-SHA256 is understood
    pub algo: String,
    /// Salt, base64 encoded
    pub salt: String,
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// Fresh parameters with a random salt and the default iteration count
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        Self {
            algo: KDF_ALGORITHM.to_string(),
            salt: BASE64.encode(salt),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// A derived AES-256 key; scrubbed from memory on drop
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive an encryption key from a password
pub fn derive_key(password: &str, params: &KdfParams) -> DigibookResult<DerivedKey> {
    if params.algo != KDF_ALGORITHM {
        return Err(DigibookError::Malformed(format!(
            "Unsupported KDF algorithm: {}",
            params.algo
        )));
    }
    if params.iterations < MIN_ITERATIONS {
        return Err(DigibookError::Malformed(format!(
            "KDF iteration count {} is below the minimum {}",
            params.iterations, MIN_ITERATIONS
        )));
    }

    let salt = BASE64
        .decode(&params.salt)
        .map_err(|e| DigibookError::Malformed(format!("Invalid KDF salt: {}", e)))?;

    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, params.iterations, &mut key);
    Ok(DerivedKey { key })
}
