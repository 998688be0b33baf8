//! Cryptography for encrypted exports
//!
//! PBKDF2-SHA256 turns the user's password into an AES-256 key; AES-GCM
//! provides authenticated encryption of the export payload.

pub mod encryption;
pub mod key_derivation;

pub use encryption::{decrypt, encrypt, CipherText, CIPHER_ALGORITHM};
pub use key_derivation::{
    derive_key, DerivedKey, KdfParams, DEFAULT_ITERATIONS, KDF_ALGORITHM, MIN_ITERATIONS,
};
