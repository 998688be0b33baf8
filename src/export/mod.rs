//! Export formats
//!
//! JSON (the canonical archive), CSV (one file per collection), and the
//! password-encrypted envelope around the JSON archive.

pub mod csv;
pub mod encrypted;
pub mod json;

pub use csv::export_csv;
pub use encrypted::{
    decrypt_archive, encrypt_archive, parse_envelope, CipherSpec, EncryptedArchive,
};
pub use json::{ExportArchive, EXPORT_VERSION};
