//! AES-256-GCM encryption/decryption
//!
//! Authenticated encryption for exports. Each encryption generates a fresh
//! nonce. An authentication failure reads as a wrong password, which
//! callers must keep distinct from structural damage.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{DigibookError, DigibookResult};

use super::key_derivation::DerivedKey;

/// Cipher algorithm identifier written into export envelopes
pub const CIPHER_ALGORITHM: &str = "AES-GCM-256";

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Ciphertext with its nonce, both base64 encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherText {
    pub iv: String,
    pub ciphertext: String,
}

/// Encrypt plaintext under a derived key with a fresh random nonce
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> DigibookResult<CipherText> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| DigibookError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| DigibookError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(CipherText {
        iv: BASE64.encode(nonce_bytes),
        ciphertext: BASE64.encode(ciphertext),
    })
}

/// Decrypt a ciphertext under a derived key
///
/// Structural problems (bad base64, wrong nonce size) are `Malformed`;
/// an authentication failure is `BadPassword`.
pub fn decrypt(ct: &CipherText, key: &DerivedKey) -> DigibookResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| DigibookError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let nonce_bytes = BASE64
        .decode(&ct.iv)
        .map_err(|e| DigibookError::Malformed(format!("Invalid nonce encoding: {}", e)))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(DigibookError::Malformed(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = BASE64
        .decode(&ct.ciphertext)
        .map_err(|e| DigibookError::Malformed(format!("Invalid ciphertext encoding: {}", e)))?;

    cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| DigibookError::BadPassword)
}
