//! Encryption layer for authseal.
//!
//! Protects individual values persisted by the identity platform using:
//! - HKDF-SHA256 for deterministic, purpose-labelled subkeys
//! - XSalsa20-Poly1305 (NaCl `secretbox`) for authenticated encryption
//! - A purpose tag sealed inside every ciphertext for domain separation
//!
//! # Architecture
//!
//! 1. **Root secret**: supplied by configuration as hex. Never stored by
//!    this crate.
//!
//! 2. **Field key**: derived from the root secret with [`KeyGenerator`].
//!    The derivation is stable forever, so restarting with the same secret
//!    always yields the same key.
//!
//! 3. **Message encryptor**: seals values with the newest key and opens them
//!    with any configured key, newest first.
//!
//! This allows:
//! - Rotating the root secret without re-encrypting stored data
//! - Using one key for many fields without cross-field ciphertext reuse
//! - Decryption errors that reveal nothing about why they failed

mod cipher;
pub mod config;
pub mod encryptor;
mod error;
mod key;
pub mod secret;

pub use cipher::{Cipher, TAG_SIZE};
pub use config::{EncryptorConfig, MIN_SECRET_LEN};
pub use encryptor::{DataEncryptor, MessageEncryptor, MessageEncryptorBuilder};
pub use error::{CryptoError, CryptoResult};
pub use key::{DerivedKey, Key, KeyGenerator, FIELD_ENCRYPTOR_LABEL, MAX_DERIVED_LENGTH};
pub use secret::SecretString;
